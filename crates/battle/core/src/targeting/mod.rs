//! Board queries for movement, ability ranges, areas, and target selection.

mod movement;
mod ring;
mod shapes;

pub use movement::move_range;
pub use ring::TargetRing;
pub use shapes::{AreaShape, RangeShape};
