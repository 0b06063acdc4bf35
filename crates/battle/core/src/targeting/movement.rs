//! Reachable-tile computation for the three locomotion modes.

use std::collections::{HashSet, VecDeque};

use crate::board::Board;
use crate::roster::{Roster, Unit};
use crate::stats::StatKind;
use crate::types::{Direction, Locomotion, Point};

use super::shapes::manhattan_ball;

/// Tiles the unit may end its move on, in a stable discovery order. The
/// unit's own tile is never included; standing still is expressed by not
/// moving at all.
pub fn move_range(board: &dyn Board, roster: &Roster, unit: &Unit) -> Vec<Point> {
    let reach = unit.stat(StatKind::Mov).max(0);
    match unit.locomotion() {
        Locomotion::Walk => walk_range(board, roster, unit, reach),
        Locomotion::Fly => fly_range(board, roster, unit.position(), reach),
        Locomotion::Teleport => teleport_range(board, roster),
    }
}

/// Breadth-first expansion from the unit's tile. Paths may cross allies but
/// never foes or impassable tiles; no occupied tile is a valid destination.
fn walk_range(board: &dyn Board, roster: &Roster, unit: &Unit, reach: i32) -> Vec<Point> {
    const NEIGHBORS: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    let start = unit.position();
    let mut seen: HashSet<Point> = HashSet::from([start]);
    let mut frontier: VecDeque<(Point, i32)> = VecDeque::from([(start, 0)]);
    let mut reached = Vec::new();

    while let Some((tile, distance)) = frontier.pop_front() {
        if distance >= reach {
            continue;
        }
        for direction in NEIGHBORS {
            let next = tile + direction.normal();
            if seen.contains(&next) || !board.is_passable(next) {
                continue;
            }
            if let Some(occupant) = roster.occupant_at(next) {
                let blocked = roster
                    .unit(occupant)
                    .is_none_or(|other| other.alliance().is_foe_of(unit.alliance()));
                if blocked {
                    continue;
                }
            }
            seen.insert(next);
            reached.push(next);
            frontier.push_back((next, distance + 1));
        }
    }

    reached
        .into_iter()
        .filter(|tile| roster.occupant_at(*tile).is_none())
        .collect()
}

/// Straight-line reach that ignores terrain and occupants in between.
fn fly_range(board: &dyn Board, roster: &Roster, from: Point, reach: i32) -> Vec<Point> {
    manhattan_ball(board, from, reach)
        .into_iter()
        .filter(|tile| board.is_passable(*tile) && roster.occupant_at(*tile).is_none())
        .collect()
}

/// Any free, passable tile on the board.
fn teleport_range(board: &dyn Board, roster: &Roster) -> Vec<Point> {
    board
        .tiles()
        .into_iter()
        .filter(|tile| board.is_passable(*tile) && roster.occupant_at(*tile).is_none())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::GridBoard;
    use crate::roster::UnitSpec;
    use crate::stats::BaseStats;
    use crate::types::Alliance;

    fn walker(alliance: Alliance, mov: i32) -> UnitSpec {
        let mut spec = UnitSpec::new("walker", alliance);
        spec.stats = BaseStats {
            mov,
            ..BaseStats::default()
        };
        spec
    }

    #[test]
    fn walk_cannot_pass_foes_but_passes_allies() {
        let board = GridBoard::new(5, 1);
        let mut roster = Roster::new();
        let mover = roster
            .spawn(walker(Alliance::Hero, 3), Point::new(0, 0), Direction::East)
            .expect("spawn");
        roster
            .spawn(walker(Alliance::Hero, 0), Point::new(1, 0), Direction::East)
            .expect("spawn ally");

        let unit = roster.unit(mover).expect("unit");
        let range = move_range(&board, &roster, unit);
        // The ally's tile is crossed but not a destination.
        assert!(!range.contains(&Point::new(1, 0)));
        assert!(range.contains(&Point::new(2, 0)));
        assert!(range.contains(&Point::new(3, 0)));

        // Replace the ally with a foe: everything behind it is unreachable.
        let mut roster = Roster::new();
        let mover = roster
            .spawn(walker(Alliance::Hero, 3), Point::new(0, 0), Direction::East)
            .expect("spawn");
        roster
            .spawn(walker(Alliance::Enemy, 0), Point::new(1, 0), Direction::West)
            .expect("spawn foe");
        let unit = roster.unit(mover).expect("unit");
        let range = move_range(&board, &roster, unit);
        assert!(range.is_empty());
    }

    #[test]
    fn walk_respects_obstacles() {
        let board = GridBoard::new(3, 1).with_obstacles([Point::new(1, 0)]);
        let mut roster = Roster::new();
        let mover = roster
            .spawn(walker(Alliance::Hero, 2), Point::new(0, 0), Direction::East)
            .expect("spawn");
        let range = move_range(&board, &roster, roster.unit(mover).expect("unit"));
        assert!(range.is_empty());
    }

    #[test]
    fn fly_ignores_obstacles_but_lands_clear() {
        let board = GridBoard::new(3, 1).with_obstacles([Point::new(1, 0)]);
        let mut roster = Roster::new();
        let mut spec = walker(Alliance::Hero, 2);
        spec.locomotion = Locomotion::Fly;
        let mover = roster
            .spawn(spec, Point::new(0, 0), Direction::East)
            .expect("spawn");
        let range = move_range(&board, &roster, roster.unit(mover).expect("unit"));
        assert_eq!(range, vec![Point::new(2, 0)]);
    }

    #[test]
    fn teleport_reaches_any_free_tile() {
        let board = GridBoard::new(4, 1).with_obstacles([Point::new(2, 0)]);
        let mut roster = Roster::new();
        let mut spec = walker(Alliance::Hero, 1);
        spec.locomotion = Locomotion::Teleport;
        let mover = roster
            .spawn(spec, Point::new(0, 0), Direction::East)
            .expect("spawn");
        roster
            .spawn(walker(Alliance::Enemy, 0), Point::new(1, 0), Direction::West)
            .expect("spawn foe");
        let range = move_range(&board, &roster, roster.unit(mover).expect("unit"));
        assert_eq!(range, vec![Point::new(3, 0)]);
    }
}
