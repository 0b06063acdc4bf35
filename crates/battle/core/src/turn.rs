//! Per-turn context: what the acting unit has done and still may do.

use crate::ability::Ability;
use crate::board::Board;
use crate::roster::{Roster, Unit};
use crate::types::{Direction, EntityId, Point};

/// Mutable record of the turn in progress. Created when the scheduler grants
/// a turn and discarded when the next one begins.
#[derive(Debug)]
pub struct Turn {
    pub actor: EntityId,
    pub moved: bool,
    pub acted: bool,
    /// Set once the unit acts after moving; the move can no longer be undone.
    pub lock_move: bool,
    /// Ability selected for the pending action, if any.
    pub ability: Option<Ability>,
    /// Tiles the confirmed ability will affect.
    pub targets: Vec<Point>,
    /// The computer driver's plan. Filled at most once per turn.
    pub plan: Option<Plan>,
    start_position: Point,
    start_facing: Direction,
}

impl Turn {
    pub fn new(unit: &Unit) -> Self {
        Self {
            actor: unit.id(),
            moved: false,
            acted: false,
            lock_move: false,
            ability: None,
            targets: Vec::new(),
            plan: None,
            start_position: unit.position(),
            start_facing: unit.facing(),
        }
    }

    pub fn start_position(&self) -> Point {
        self.start_position
    }

    pub fn start_facing(&self) -> Direction {
        self.start_facing
    }

    /// Puts the actor back where the turn started. Callers check
    /// `lock_move` first; undo after acting is not offered.
    pub fn undo_move(&mut self, unit: &mut Unit) {
        self.moved = false;
        unit.set_position(self.start_position);
        unit.set_facing(self.start_facing);
    }
}

// =============================================================================
// Plans
// =============================================================================

/// Which of the actor's abilities a plan wants to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityChoice {
    /// The unit's basic attack.
    Attack,
    /// An ability out of the unit's catalog.
    Learned { category: usize, index: usize },
}

/// A computer driver's complete intent for one turn.
#[derive(Debug, Clone, Copy)]
pub struct Plan {
    /// `None` plans no action this turn.
    pub ability: Option<AbilityChoice>,
    /// Where to move. The actor's own position plans no movement.
    pub move_to: Point,
    /// Tile to aim a cursor-targeted ability at.
    pub aim_at: Point,
    /// Facing for direction-oriented abilities.
    pub attack_facing: Direction,
}

/// Everything a planner may look at. Read-only by design; plans take effect
/// only through the flow.
pub struct PlanContext<'a> {
    pub actor: EntityId,
    pub roster: &'a Roster,
    pub board: &'a dyn Board,
}

/// Decides computer turns. `evaluate` is consulted exactly once per turn,
/// when the command phase first sees a computer driver; `end_facing` once
/// more after movement settles.
pub trait Planner: Send {
    fn evaluate(&mut self, ctx: PlanContext<'_>) -> Plan;

    fn end_facing(&mut self, ctx: PlanContext<'_>) -> Direction;
}
