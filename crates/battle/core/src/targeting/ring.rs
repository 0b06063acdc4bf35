//! Closed ring over confirmed target positions.

use crate::types::Point;

/// Cycles a selection over the targets found in an ability's area. The ring
/// wraps in both directions; an empty ring has no selection.
#[derive(Debug, Clone, Default)]
pub struct TargetRing {
    targets: Vec<Point>,
    index: usize,
}

impl TargetRing {
    pub fn new(targets: Vec<Point>) -> Self {
        Self { targets, index: 0 }
    }

    pub fn clear(&mut self) {
        self.targets.clear();
        self.index = 0;
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn positions(&self) -> &[Point] {
        &self.targets
    }

    pub fn current(&self) -> Option<Point> {
        self.targets.get(self.index).copied()
    }

    /// Selects by raw index; any integer maps into the ring.
    pub fn select(&mut self, index: isize) {
        if self.targets.is_empty() {
            return;
        }
        self.index = index.rem_euclid(self.targets.len() as isize) as usize;
    }

    pub fn next(&mut self) {
        self.select(self.index as isize + 1);
    }

    pub fn previous(&mut self) {
        self.select(self.index as isize - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_symmetrically() {
        let mut ring = TargetRing::new(vec![
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(2, 0),
        ]);
        ring.previous();
        assert_eq!(ring.current(), Some(Point::new(2, 0)));
        ring.next();
        assert_eq!(ring.current(), Some(Point::new(0, 0)));
        ring.select(7);
        assert_eq!(ring.current(), Some(Point::new(1, 0)));
        ring.select(-4);
        assert_eq!(ring.current(), Some(Point::new(2, 0)));
    }

    #[test]
    fn empty_ring_has_no_selection() {
        let mut ring = TargetRing::default();
        ring.next();
        assert_eq!(ring.current(), None);
    }
}
