//! Identity and grid primitives shared across the battle core.

use std::fmt;
use std::ops::{Add, Sub};

use strum::Display;

// ============================================================================
// Identity
// ============================================================================

/// Unique identifier for a combatant within one battle.
///
/// Ids are allocated by the roster at spawn time and never reused for the
/// lifetime of the battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

// ============================================================================
// Grid
// ============================================================================

/// Integer board coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two positions.
    pub fn distance(self, other: Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// One cursor step toward `target`, moving both axes at once when both
    /// differ. Returns `target` unchanged once reached.
    pub fn step_toward(self, target: Point) -> Point {
        let mut next = self;
        if next.x < target.x {
            next.x += 1;
        }
        if next.x > target.x {
            next.x -= 1;
        }
        if next.y < target.y {
            next.y += 1;
        }
        if next.y > target.y {
            next.y -= 1;
        }
        next
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal facing of a unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Interprets a raw input delta as a facing. Vertical input wins over
    /// horizontal when both are present.
    pub fn of(delta: Point) -> Self {
        if delta.y > 0 {
            Direction::North
        } else if delta.x > 0 {
            Direction::East
        } else if delta.y < 0 {
            Direction::South
        } else {
            Direction::West
        }
    }

    /// Unit vector pointing along this facing.
    pub fn normal(self) -> Point {
        match self {
            Direction::North => Point::new(0, 1),
            Direction::East => Point::new(1, 0),
            Direction::South => Point::new(0, -1),
            Direction::West => Point::new(-1, 0),
        }
    }

    /// Facing that best matches travel from `from` to `to`; the dominant
    /// axis wins, horizontal on exact diagonals. Returns `None` when the
    /// positions coincide.
    pub fn between(from: Point, to: Point) -> Option<Self> {
        let delta = to - from;
        if delta.x == 0 && delta.y == 0 {
            return None;
        }
        if delta.y.abs() > delta.x.abs() {
            Some(if delta.y > 0 {
                Direction::North
            } else {
                Direction::South
            })
        } else {
            Some(if delta.x > 0 {
                Direction::East
            } else {
                Direction::West
            })
        }
    }

    /// Perpendicular unit vector, used to widen cone ranges.
    pub fn perpendicular(self) -> Point {
        let n = self.normal();
        Point::new(-n.y, n.x)
    }
}

/// Where an attacker stands relative to the defender's facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelativeFacing {
    Front,
    Side,
    Rear,
}

/// Classifies the attacker's position against the defender's facing by the
/// sign of the projection onto the facing normal.
pub fn relative_facing(attacker: Point, defender: Point, defender_facing: Direction) -> RelativeFacing {
    let normal = defender_facing.normal();
    let toward = attacker - defender;
    let dot = normal.x * toward.x + normal.y * toward.y;
    if dot > 0 {
        RelativeFacing::Front
    } else if dot == 0 {
        RelativeFacing::Side
    } else {
        RelativeFacing::Rear
    }
}

// ============================================================================
// Tags
// ============================================================================

/// Which side a unit fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alliance {
    Hero,
    Enemy,
}

impl Alliance {
    pub fn is_foe_of(self, other: Alliance) -> bool {
        self != other
    }
}

/// Who decides a unit's actions during its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Driver {
    Human,
    Computer,
}

/// How a unit traverses the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Locomotion {
    Walk,
    Fly,
    Teleport,
}

/// The three-way fire signal every phase understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireInput {
    Confirm,
    Cancel,
    Alternate,
}
