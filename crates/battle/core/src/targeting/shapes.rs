//! Range and area shapes an ability projects onto the board.

use crate::board::Board;
use crate::types::{Direction, Point};

/// Tiles an ability can be aimed at, measured from the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RangeShape {
    /// Every tile within a Manhattan radius of the actor, the actor's own
    /// tile included.
    Constant { radius: i32 },
    /// A straight line along the actor's facing, excluding the actor.
    Line { length: i32 },
    /// A widening wedge along the actor's facing: one tile at distance one,
    /// three at distance two, and so on.
    Cone { length: i32 },
    /// The actor's own tile only.
    SelfOnly,
    /// The entire board.
    Infinite,
}

impl RangeShape {
    /// Direction-oriented shapes are aimed by rotating the actor rather than
    /// by moving a cursor.
    pub fn direction_oriented(&self) -> bool {
        matches!(self, RangeShape::Line { .. } | RangeShape::Cone { .. })
    }

    /// Board tiles the shape covers from `origin` while facing `facing`.
    pub fn tiles(&self, board: &dyn Board, origin: Point, facing: Direction) -> Vec<Point> {
        match *self {
            RangeShape::Constant { radius } => manhattan_ball(board, origin, radius),
            RangeShape::Line { length } => {
                let normal = facing.normal();
                (1..=length)
                    .map(|step| origin + scaled(normal, step))
                    .filter(|p| board.contains(*p))
                    .collect()
            }
            RangeShape::Cone { length } => {
                let normal = facing.normal();
                let side = facing.perpendicular();
                let mut tiles = Vec::new();
                for step in 1..=length {
                    let center = origin + scaled(normal, step);
                    let half = step - 1;
                    for offset in -half..=half {
                        let tile = center + scaled(side, offset);
                        if board.contains(tile) {
                            tiles.push(tile);
                        }
                    }
                }
                tiles
            }
            RangeShape::SelfOnly => {
                if board.contains(origin) {
                    vec![origin]
                } else {
                    Vec::new()
                }
            }
            RangeShape::Infinite => board.tiles(),
        }
    }
}

/// Tiles actually affected once a target tile is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AreaShape {
    /// The chosen tile alone.
    Single,
    /// A Manhattan ball around the chosen tile.
    Burst { radius: i32 },
    /// Every tile the range covered. Pairs with direction-oriented ranges,
    /// where no single tile is ever chosen.
    Full,
}

impl AreaShape {
    /// Affected tiles for a selection at `selected`. `Full` re-projects the
    /// range from the actor instead of using the selection.
    pub fn tiles(
        &self,
        board: &dyn Board,
        range: &RangeShape,
        origin: Point,
        facing: Direction,
        selected: Point,
    ) -> Vec<Point> {
        match *self {
            AreaShape::Single => {
                if board.contains(selected) {
                    vec![selected]
                } else {
                    Vec::new()
                }
            }
            AreaShape::Burst { radius } => manhattan_ball(board, selected, radius),
            AreaShape::Full => range.tiles(board, origin, facing),
        }
    }
}

/// Tiles within `radius` Manhattan steps of `center`, nearest first.
pub(crate) fn manhattan_ball(board: &dyn Board, center: Point, radius: i32) -> Vec<Point> {
    let mut tiles = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx.abs() + dy.abs() <= radius {
                let tile = center + Point::new(dx, dy);
                if board.contains(tile) {
                    tiles.push(tile);
                }
            }
        }
    }
    tiles.sort_by_key(|p| (p.distance(center), p.y, p.x));
    tiles
}

fn scaled(normal: Point, by: i32) -> Point {
    Point::new(normal.x * by, normal.y * by)
}
