//! Splits an experience award across a party, favoring its lower levels.

use crate::roster::Roster;
use crate::stats::StatKind;
use crate::types::EntityId;

const HIGH_WEIGHT: f32 = 1.5;
const LOW_WEIGHT: f32 = 0.5;

/// Experience one unit received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperienceAward {
    pub entity: EntityId,
    pub amount: i32,
}

/// Divides `amount` among `party` weighted against level: the lowest level
/// in the party weighs 1.5, the highest 0.5, the rest interpolated. Each
/// member's share floors, so the sum may fall short of `amount`.
pub fn award_experience(
    roster: &mut Roster,
    party: &[EntityId],
    amount: i32,
) -> Vec<ExperienceAward> {
    let levels: Vec<(EntityId, i32)> = party
        .iter()
        .filter_map(|&id| roster.unit(id).map(|u| (id, u.stat(StatKind::Lvl))))
        .collect();
    if levels.is_empty() {
        return Vec::new();
    }

    let min = levels.iter().map(|&(_, lvl)| lvl).min().unwrap_or(0);
    let max = levels.iter().map(|&(_, lvl)| lvl).max().unwrap_or(0);
    let weights: Vec<(EntityId, f32)> = levels
        .iter()
        .map(|&(id, lvl)| {
            // All members at the same level share evenly.
            let percent = if max == min {
                0.0
            } else {
                (lvl - min) as f32 / (max - min) as f32
            };
            (id, HIGH_WEIGHT + (LOW_WEIGHT - HIGH_WEIGHT) * percent)
        })
        .collect();
    let total: f32 = weights.iter().map(|&(_, w)| w).sum();

    let mut awards = Vec::with_capacity(weights.len());
    for (id, weight) in weights {
        let share = (weight / total * amount as f32).floor() as i32;
        if let Some(unit) = roster.unit_mut(id) {
            let exp = unit.stat(StatKind::Exp);
            unit.set_stat(StatKind::Exp, exp + share, true);
        }
        awards.push(ExperienceAward {
            entity: id,
            amount: share,
        });
    }
    awards
}
