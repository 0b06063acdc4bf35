//! Error types surfaced by core operations.
//!
//! Only programmer and configuration mistakes become errors here. Rejected
//! player intents (confirming an empty target list, moving out of range) are
//! handled as local no-ops by the requesting phase and never reach these
//! types; an exhausted scheduler round is likewise not an error.

use thiserror::Error;

use crate::types::{EntityId, Point};

/// Errors reported by battle-state operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An entity id with no unit in the roster.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    /// An ability reference that does not resolve on the acting unit.
    #[error("{actor} has no ability at category {category}, slot {index}")]
    UnknownAbility {
        actor: EntityId,
        category: usize,
        index: usize,
    },

    /// A position outside the board.
    #[error("position {0} is outside the board")]
    OutOfBounds(Point),

    /// A spawn position the board does not allow standing on.
    #[error("position {0} is not passable")]
    Impassable(Point),

    /// The roster cannot hold another unit at the requested position.
    #[error("position {0} is already occupied")]
    PositionOccupied(Point),

    /// Random placement ran out of free passable tiles.
    #[error("no free tile left to place a unit")]
    BoardFull,

    /// A victory rule referencing a spawn slot that was never filled.
    #[error("victory target references spawn slot {0}, which does not exist")]
    BadVictoryTarget(usize),
}
