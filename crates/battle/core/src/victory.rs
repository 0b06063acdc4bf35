//! Win and loss conditions, checked after every completed action.

use crate::roster::Roster;
use crate::types::{Alliance, EntityId};

/// Which side has won, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Victor {
    #[default]
    Undecided,
    Hero,
    Enemy,
}

/// Decides the battle. The hero party losing every member is always a loss;
/// implementations add the win side.
pub trait VictoryCondition: Send {
    fn victor(&self, roster: &Roster) -> Victor;
}

fn party_defeated(roster: &Roster, alliance: Alliance) -> bool {
    roster
        .iter()
        .filter(|unit| unit.alliance() == alliance)
        .all(|unit| unit.is_defeated())
}

/// Heroes win once every enemy is down.
#[derive(Debug, Default)]
pub struct DefeatAllEnemies;

impl VictoryCondition for DefeatAllEnemies {
    fn victor(&self, roster: &Roster) -> Victor {
        if party_defeated(roster, Alliance::Hero) {
            Victor::Enemy
        } else if party_defeated(roster, Alliance::Enemy) {
            Victor::Hero
        } else {
            Victor::Undecided
        }
    }
}

/// Heroes win by downing one marked unit; the rest of its side can stand.
#[derive(Debug)]
pub struct DefeatTarget {
    target: EntityId,
}

impl DefeatTarget {
    pub fn new(target: EntityId) -> Self {
        Self { target }
    }
}

impl VictoryCondition for DefeatTarget {
    fn victor(&self, roster: &Roster) -> Victor {
        if party_defeated(roster, Alliance::Hero) {
            return Victor::Enemy;
        }
        match roster.unit(self.target) {
            Some(unit) if !unit.is_defeated() => Victor::Undecided,
            // Removed from the roster counts as defeated.
            _ => Victor::Hero,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::UnitSpec;
    use crate::stats::StatKind;
    use crate::types::{Direction, Point};

    fn roster_of(sides: &[Alliance]) -> (Roster, Vec<EntityId>) {
        let mut roster = Roster::new();
        let mut ids = Vec::new();
        for (i, &alliance) in sides.iter().enumerate() {
            let id = roster
                .spawn(
                    UnitSpec::new(format!("unit {i}"), alliance),
                    Point::new(i as i32, 0),
                    Direction::North,
                )
                .expect("spawn");
            ids.push(id);
        }
        (roster, ids)
    }

    fn down(roster: &mut Roster, id: EntityId) {
        let unit = roster.unit_mut(id).expect("unit");
        unit.set_stat(StatKind::Hp, 0, true);
    }

    #[test]
    fn defeat_all_enemies_tracks_both_sides() {
        let (mut roster, ids) =
            roster_of(&[Alliance::Hero, Alliance::Enemy, Alliance::Enemy]);
        let condition = DefeatAllEnemies;
        assert_eq!(condition.victor(&roster), Victor::Undecided);

        down(&mut roster, ids[1]);
        assert_eq!(condition.victor(&roster), Victor::Undecided);
        down(&mut roster, ids[2]);
        assert_eq!(condition.victor(&roster), Victor::Hero);
    }

    #[test]
    fn hero_wipe_loses_regardless_of_condition() {
        let (mut roster, ids) = roster_of(&[Alliance::Hero, Alliance::Enemy]);
        down(&mut roster, ids[0]);
        assert_eq!(DefeatAllEnemies.victor(&roster), Victor::Enemy);
        assert_eq!(DefeatTarget::new(ids[1]).victor(&roster), Victor::Enemy);
    }

    #[test]
    fn defeat_target_ignores_the_rest_of_the_side() {
        let (mut roster, ids) =
            roster_of(&[Alliance::Hero, Alliance::Enemy, Alliance::Enemy]);
        let condition = DefeatTarget::new(ids[1]);
        assert_eq!(condition.victor(&roster), Victor::Undecided);

        down(&mut roster, ids[1]);
        assert_eq!(condition.victor(&roster), Victor::Hero);
        assert_eq!(
            roster.unit(ids[2]).map(|u| u.is_defeated()),
            Some(false)
        );
    }
}
