//! Battle assembly: who spawns where, what ends the battle, and what plays
//! before and after.

use crate::config::BattleConfig;
use crate::error::CoreError;
use crate::events::BattleEvent;
use crate::roster::UnitSpec;
use crate::status::StatusGate;
use crate::types::{Direction, Point};
use crate::victory::{DefeatAllEnemies, DefeatTarget};

use super::BattleFlow;

/// Pages of dialogue shown one at a time during a cut-scene.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub pages: Vec<String>,
}

/// The three cut-scenes a battle may carry. Absent scripts skip straight to
/// what follows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptBook {
    pub intro: Option<Script>,
    pub victory: Option<Script>,
    pub defeat: Option<Script>,
}

/// One unit to place during init. Position and facing may be left to the
/// battle's random source.
#[derive(Debug, Clone)]
pub struct SpawnSpec {
    pub unit: UnitSpec,
    pub position: Option<Point>,
    pub facing: Option<Direction>,
}

impl SpawnSpec {
    /// Spawns on a random free tile with a random facing.
    pub fn anywhere(unit: UnitSpec) -> Self {
        Self {
            unit,
            position: None,
            facing: None,
        }
    }

    pub fn at(unit: UnitSpec, position: Point, facing: Direction) -> Self {
        Self {
            unit,
            position: Some(position),
            facing: Some(facing),
        }
    }
}

/// How the heroes win. Their own defeat always loses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VictoryRule {
    /// Down every enemy unit.
    DefeatAllEnemies,
    /// Down the unit from one spawn slot. Its hit point floor is raised to
    /// `min_hp`, so "downed" may mean cowed rather than dead.
    DefeatTarget { spawn_index: usize, min_hp: i32 },
}

/// Everything `BattleFlow::new` needs beyond the board.
#[derive(Debug, Clone)]
pub struct BattleSetup {
    pub spawns: Vec<SpawnSpec>,
    pub victory: VictoryRule,
    pub scripts: ScriptBook,
    /// Experience split across the hero party on victory.
    pub experience_award: i32,
}

impl Default for BattleSetup {
    fn default() -> Self {
        Self {
            spawns: Vec::new(),
            victory: VictoryRule::DefeatAllEnemies,
            scripts: ScriptBook::default(),
            experience_award: BattleConfig::VICTORY_EXPERIENCE,
        }
    }
}

impl BattleSetup {
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// Init phase
// =============================================================================

impl BattleFlow {
    /// Places every unit, arms the victory condition, and registers the
    /// status gate with the scheduler. Explicit positions are validated
    /// against the board; omitted ones draw from the battle's random source.
    pub(super) fn initialize(&mut self, setup: BattleSetup) -> Result<(), CoreError> {
        const FACINGS: [Direction; 4] = [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ];

        self.scripts = setup.scripts;
        self.experience_award = setup.experience_award;

        let mut spawned = Vec::with_capacity(setup.spawns.len());
        for spawn in setup.spawns {
            let position = match spawn.position {
                Some(position) => {
                    if !self.board.contains(position) {
                        return Err(CoreError::OutOfBounds(position));
                    }
                    if !self.board.is_passable(position) {
                        return Err(CoreError::Impassable(position));
                    }
                    position
                }
                None => self.random_free_tile()?,
            };
            let facing = match spawn.facing {
                Some(facing) => facing,
                None => FACINGS[self.rng.range_i32(0, 3) as usize],
            };

            let name = spawn.unit.name.clone();
            let alliance = spawn.unit.alliance;
            let entity = self.roster.spawn(spawn.unit, position, facing)?;
            self.events.push(BattleEvent::UnitSpawned {
                entity,
                name,
                alliance,
                position,
            });
            spawned.push(entity);
        }

        self.scheduler.register_gate(StatusGate);

        match setup.victory {
            VictoryRule::DefeatAllEnemies => {
                self.victory = Box::new(DefeatAllEnemies);
            }
            VictoryRule::DefeatTarget { spawn_index, min_hp } => {
                let target = spawned
                    .get(spawn_index)
                    .copied()
                    .ok_or(CoreError::BadVictoryTarget(spawn_index))?;
                if let Some(unit) = self.roster.unit_mut(target) {
                    unit.set_min_hp(min_hp);
                }
                self.victory = Box::new(DefeatTarget::new(target));
            }
        }
        Ok(())
    }

    fn random_free_tile(&mut self) -> Result<Point, CoreError> {
        let free: Vec<Point> = self
            .board
            .tiles()
            .into_iter()
            .filter(|tile| {
                self.board.is_passable(*tile) && self.roster.occupant_at(*tile).is_none()
            })
            .collect();
        if free.is_empty() {
            return Err(CoreError::BoardFull);
        }
        let index = self.rng.range_i32(0, free.len() as i32 - 1) as usize;
        Ok(free[index])
    }
}
