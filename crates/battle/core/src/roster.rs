//! Combatants and the roster that owns them.
//!
//! A [`Unit`] bundles identity, board presence, stats, statuses, and learned
//! abilities. The [`Roster`] allocates ids at spawn time and answers the
//! occupancy questions targeting needs. Spawn order is preserved and is the
//! tie-break order everywhere turn order matters.

use crate::ability::{Ability, AbilityCatalog};
use crate::error::CoreError;
use crate::stats::{BaseStats, HookId, Modifier, StatChange, StatKind, StatStore};
use crate::status::{self, StatusKind, StatusList};
use crate::types::{Alliance, Direction, Driver, EntityId, Locomotion, Point};

// =============================================================================
// Blueprint
// =============================================================================

/// Everything needed to spawn a unit. Content assembles these from recipes;
/// tests build them directly.
#[derive(Debug, Clone)]
pub struct UnitSpec {
    pub name: String,
    pub alliance: Alliance,
    pub driver: Driver,
    pub locomotion: Locomotion,
    pub level: i32,
    /// Final stat line, already scaled to `level`.
    pub stats: BaseStats,
    pub attack: Ability,
    pub catalog: AbilityCatalog,
    /// Opaque tag an external planner may use to pick tactics.
    pub strategy: Option<String>,
}

impl UnitSpec {
    pub fn new(name: impl Into<String>, alliance: Alliance) -> Self {
        Self {
            name: name.into(),
            alliance,
            driver: Driver::Computer,
            locomotion: Locomotion::Walk,
            level: 1,
            stats: BaseStats::default(),
            attack: Ability::strike(),
            catalog: AbilityCatalog::default(),
            strategy: None,
        }
    }
}

// =============================================================================
// Unit
// =============================================================================

/// One combatant.
pub struct Unit {
    id: EntityId,
    name: String,
    alliance: Alliance,
    driver: Driver,
    locomotion: Locomotion,
    position: Point,
    facing: Direction,
    stats: StatStore,
    pub(crate) statuses: StatusList,
    attack: Ability,
    catalog: AbilityCatalog,
    strategy: Option<String>,
    min_hp: i32,
    hp_clamp: HookId,
}

impl Unit {
    fn from_spec(id: EntityId, spec: UnitSpec, position: Point, facing: Direction) -> Self {
        let mut stats = StatStore::from_base(&spec.stats, spec.level);
        let hp_clamp = register_hp_clamp(&mut stats, 0);
        stats.intercept(StatKind::Mp, |values, change| {
            change.add_modifier(Modifier::clamp(i32::MAX, 0, values.get(StatKind::MaxMp)));
        });
        Self {
            id,
            name: spec.name,
            alliance: spec.alliance,
            driver: spec.driver,
            locomotion: spec.locomotion,
            position,
            facing,
            stats,
            statuses: StatusList::new(),
            attack: spec.attack,
            catalog: spec.catalog,
            strategy: spec.strategy,
            min_hp: 0,
            hp_clamp,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alliance(&self) -> Alliance {
        self.alliance
    }

    pub fn driver(&self) -> Driver {
        self.driver
    }

    pub fn locomotion(&self) -> Locomotion {
        self.locomotion
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn set_facing(&mut self, facing: Direction) {
        self.facing = facing;
    }

    pub fn attack(&self) -> &Ability {
        &self.attack
    }

    pub fn catalog(&self) -> &AbilityCatalog {
        &self.catalog
    }

    pub fn strategy(&self) -> Option<&str> {
        self.strategy.as_deref()
    }

    pub fn stat(&self, kind: StatKind) -> i32 {
        self.stats.value(kind)
    }

    pub fn stats(&self) -> &StatStore {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut StatStore {
        &mut self.stats
    }

    /// Writes a stat through the store and runs the unit-level reactions:
    /// pool clamps follow their maximum, and hit points crossing the floor
    /// attach or clear the knock-out status.
    pub fn set_stat(
        &mut self,
        kind: StatKind,
        value: i32,
        allow_veto: bool,
    ) -> Option<StatChange> {
        let change = self.stats.set_value(kind, value, allow_veto)?;
        match kind {
            StatKind::Hp => status::react_to_hp(self),
            StatKind::MaxHp => {
                let hp = self.stats.value(StatKind::Hp);
                if hp > change.new {
                    self.set_stat(StatKind::Hp, change.new, true);
                }
            }
            StatKind::MaxMp => {
                let mp = self.stats.value(StatKind::Mp);
                if mp > change.new {
                    self.set_stat(StatKind::Mp, change.new, true);
                }
            }
            _ => {}
        }
        Some(change)
    }

    /// Hit point floor. A unit whose hit points sit at the floor counts as
    /// defeated even when the floor is above zero.
    pub fn min_hp(&self) -> i32 {
        self.min_hp
    }

    /// Raises or lowers the hit point floor and rebinds the clamp around it.
    pub fn set_min_hp(&mut self, min_hp: i32) {
        self.min_hp = min_hp;
        self.stats.remove_interceptor(self.hp_clamp);
        self.hp_clamp = register_hp_clamp(&mut self.stats, min_hp);
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.statuses.has(kind)
    }

    /// Attaches a status effect, refreshing the duration when it is already
    /// present. Returns true when the status is newly attached.
    pub fn attach_status(&mut self, kind: StatusKind, rounds: Option<u32>) -> bool {
        status::attach(self, kind, rounds)
    }

    /// Detaches a status effect. Returns true when it was present.
    pub fn detach_status(&mut self, kind: StatusKind) -> bool {
        status::detach(self, kind)
    }

    pub fn statuses(&self) -> &StatusList {
        &self.statuses
    }

    pub fn is_knocked_out(&self) -> bool {
        self.has_status(StatusKind::KnockOut)
    }

    /// Defeated units no longer count toward their party's survival.
    pub fn is_defeated(&self) -> bool {
        self.is_knocked_out() || self.stat(StatKind::Hp) <= self.min_hp
    }
}

fn register_hp_clamp(stats: &mut StatStore, min_hp: i32) -> HookId {
    stats.intercept(StatKind::Hp, move |values, change| {
        change.add_modifier(Modifier::clamp(
            i32::MAX,
            min_hp,
            values.get(StatKind::MaxHp),
        ));
    })
}

impl std::fmt::Debug for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unit")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("alliance", &self.alliance)
            .field("position", &self.position)
            .field("facing", &self.facing)
            .field("hp", &self.stat(StatKind::Hp))
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Roster
// =============================================================================

/// All combatants in a battle, in spawn order.
#[derive(Debug, Default)]
pub struct Roster {
    units: Vec<Unit>,
    next_id: u32,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a unit onto a free tile. The roster does not know the board;
    /// callers validate terrain before spawning.
    pub fn spawn(
        &mut self,
        spec: UnitSpec,
        position: Point,
        facing: Direction,
    ) -> Result<EntityId, CoreError> {
        if self.occupant_at(position).is_some() {
            return Err(CoreError::PositionOccupied(position));
        }
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.units.push(Unit::from_spec(id, spec, position, facing));
        Ok(id)
    }

    /// Removes a unit from play entirely.
    pub fn remove(&mut self, id: EntityId) -> Option<Unit> {
        let index = self.units.iter().position(|u| u.id == id)?;
        Some(self.units.remove(index))
    }

    pub fn unit(&self, id: EntityId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: EntityId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    /// Unit ids in spawn order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.units.iter().map(|u| u.id).collect()
    }

    /// Ids of every unit fighting for `alliance`, in spawn order.
    pub fn party(&self, alliance: Alliance) -> Vec<EntityId> {
        self.units
            .iter()
            .filter(|u| u.alliance == alliance)
            .map(|u| u.id)
            .collect()
    }

    pub fn occupant_at(&self, position: Point) -> Option<EntityId> {
        self.units
            .iter()
            .find(|u| u.position == position)
            .map(|u| u.id)
    }

    pub fn any_human(&self) -> bool {
        self.units.iter().any(|u| u.driver == Driver::Human)
    }

    /// Decrements round-limited statuses on every unit, detaching the ones
    /// that expired. Returns what was detached.
    pub fn tick_status_rounds(&mut self) -> Vec<(EntityId, StatusKind)> {
        let mut expired = Vec::new();
        for unit in &mut self.units {
            for kind in status::tick_rounds(unit) {
                expired.push((unit.id, kind));
            }
        }
        expired
    }
}
