//! Terrain queries the battle consults while targeting and placing units.
//!
//! The board only answers questions about tiles. Occupancy is the roster's
//! concern; keeping the two apart lets tests swap in tiny fixed grids.

use crate::types::Point;

/// Read-only terrain oracle.
pub trait Board: Send {
    /// Whether the position exists on the board at all.
    fn contains(&self, position: Point) -> bool;

    /// Whether a unit may stand on the position. Impassable tiles still
    /// belong to the board and can be flown over.
    fn is_passable(&self, position: Point) -> bool;

    /// Every position on the board, in a stable order.
    fn tiles(&self) -> Vec<Point>;
}

/// Rectangular grid with an optional set of blocked tiles.
#[derive(Debug, Clone, Default)]
pub struct GridBoard {
    width: i32,
    height: i32,
    blocked: Vec<Point>,
}

impl GridBoard {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            blocked: Vec::new(),
        }
    }

    /// Marks tiles units cannot stand on. Positions outside the grid are
    /// ignored.
    pub fn with_obstacles(mut self, obstacles: impl IntoIterator<Item = Point>) -> Self {
        self.blocked = obstacles
            .into_iter()
            .filter(|p| self.contains(*p))
            .collect();
        self
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}

impl Board for GridBoard {
    fn contains(&self, position: Point) -> bool {
        (0..self.width).contains(&position.x) && (0..self.height).contains(&position.y)
    }

    fn is_passable(&self, position: Point) -> bool {
        self.contains(position) && !self.blocked.contains(&position)
    }

    fn tiles(&self) -> Vec<Point> {
        let mut tiles = Vec::with_capacity((self.width * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                tiles.push(Point::new(x, y));
            }
        }
        tiles
    }
}
