//! Notifications the battle emits as it advances.
//!
//! The flow queues these during [`pump`](crate::flow::BattleFlow::pump) and
//! input handling; callers drain them and forward to whatever presentation or
//! transport they drive. Emitting is fire-and-forget, the simulation never
//! waits on a consumer.

use crate::flow::Phase;
use crate::menu::MenuEntry;
use crate::stats::StatChange;
use crate::status::StatusKind;
use crate::types::{Alliance, Direction, EntityId, Point};
use crate::victory::Victor;

/// One observable step of the battle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    PhaseEntered {
        phase: Phase,
    },
    RoundBegan {
        round: u32,
    },
    RoundEnded {
        round: u32,
    },
    TurnBegan {
        entity: EntityId,
    },
    TurnCompleted {
        entity: EntityId,
        moved: bool,
        acted: bool,
    },
    UnitSpawned {
        entity: EntityId,
        name: String,
        alliance: Alliance,
        position: Point,
    },
    CursorMoved {
        position: Point,
    },
    /// The free cursor stopped on a unit worth inspecting.
    StatPanelShown {
        entity: EntityId,
    },
    StatPanelHidden,
    TilesHighlighted {
        tiles: Vec<Point>,
        /// Subset of `tiles` holding a confirmable target.
        targets: Vec<Point>,
    },
    HighlightCleared,
    MenuShown {
        title: String,
        entries: Vec<MenuEntry>,
    },
    MenuSelection {
        title: String,
        index: usize,
    },
    MenuHidden,
    FacingChanged {
        entity: EntityId,
        facing: Direction,
    },
    UnitMoved {
        entity: EntityId,
        from: Point,
        to: Point,
    },
    MoveUndone {
        entity: EntityId,
        position: Point,
    },
    AbilityAnnounced {
        entity: EntityId,
        ability: String,
    },
    /// The actor confirmed an ability it could not pay for.
    AbilityFailed {
        entity: EntityId,
        ability: String,
    },
    /// Targeting preview for the focused target.
    TargetFocused {
        position: Point,
        chance: i32,
        amount: i32,
    },
    EffectApplied {
        entity: EntityId,
        change: StatChange,
        knocked_out: bool,
    },
    EffectMissed {
        entity: EntityId,
        chance: i32,
        roll: i32,
    },
    StatusAttached {
        entity: EntityId,
        status: StatusKind,
    },
    StatusDetached {
        entity: EntityId,
        status: StatusKind,
    },
    ScriptPageShown {
        page: String,
    },
    ScriptCompleted,
    ExperienceAwarded {
        entity: EntityId,
        amount: i32,
    },
    BattleEnded {
        victor: Victor,
    },
}
