//! Abilities: a targeting shape plus one or more effect groups.
//!
//! An ability carries no behavior of its own. The flow picks targets with the
//! shapes, the resolver rolls each group against each occupant, and the cost
//! is settled after the groups run. Everything here is plain data so content
//! files can describe abilities directly.

use crate::roster::Unit;
use crate::stats::StatKind;
use crate::status::StatusKind;
use crate::targeting::{AreaShape, RangeShape};
use crate::types::{RelativeFacing, relative_facing};

// =============================================================================
// Effect groups
// =============================================================================

/// Which occupants of the affected tiles a group applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetFilter {
    /// Living units on the actor's side, the actor included.
    Ally,
    /// Living units on the opposing side.
    Foe,
    /// The actor alone.
    Caster,
    /// Knocked-out units only (revival effects).
    KnockedOut,
    /// Any unit still standing.
    Any,
}

impl TargetFilter {
    pub fn matches(self, actor: &Unit, candidate: &Unit) -> bool {
        match self {
            TargetFilter::Ally => {
                actor.alliance() == candidate.alliance() && !candidate.is_knocked_out()
            }
            TargetFilter::Foe => {
                actor.alliance().is_foe_of(candidate.alliance()) && !candidate.is_knocked_out()
            }
            TargetFilter::Caster => actor.id() == candidate.id(),
            TargetFilter::KnockedOut => candidate.is_knocked_out(),
            TargetFilter::Any => !candidate.is_knocked_out(),
        }
    }
}

/// How a group decides whether it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitMethod {
    /// Physical contact. Checked against evasion, scaled by how squarely the
    /// attacker faces the defender.
    Melee,
    /// Magical contact. Checked against resistance, facing ignored.
    Spell,
    /// Always lands.
    Sure,
}

impl HitMethod {
    /// Hit chance in percent, 0..=100.
    pub fn chance(self, attacker: &Unit, defender: &Unit) -> i32 {
        match self {
            HitMethod::Melee => {
                let evade = defender.stat(StatKind::Evd);
                let evade = match relative_facing(
                    attacker.position(),
                    defender.position(),
                    defender.facing(),
                ) {
                    RelativeFacing::Front => evade,
                    RelativeFacing::Side => evade / 2,
                    RelativeFacing::Rear => evade / 4,
                };
                100 - evade.clamp(0, 100)
            }
            HitMethod::Spell => 100 - defender.stat(StatKind::Res).clamp(0, 100),
            HitMethod::Sure => 100,
        }
    }
}

/// What a group does to a unit it lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Negative hit point delta. Physical damage pits attack against defense,
    /// magical damage pits magic attack against magic defense.
    Damage { power: i32, magical: bool },
    /// Positive hit point delta scaled from the caster's magic attack.
    Heal { power: i32 },
    /// Attaches a status effect for a number of rounds, or indefinitely.
    Inflict {
        status: StatusKind,
        rounds: Option<u32>,
    },
}

/// One filter + hit check + effect. An ability applies every group to every
/// affected tile; groups whose filter rejects the occupant skip it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectGroup {
    pub filter: TargetFilter,
    pub hit: HitMethod,
    pub effect: EffectKind,
}

// =============================================================================
// Abilities
// =============================================================================

/// A named, targetable action.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub name: String,
    pub range: RangeShape,
    pub area: AreaShape,
    /// Mana spent when the ability is performed. `None` costs nothing.
    pub mana_cost: Option<i32>,
    pub groups: Vec<EffectGroup>,
}

impl Ability {
    /// The bare melee strike a unit falls back to when content gives it
    /// nothing better.
    pub fn strike() -> Self {
        Self {
            name: "Attack".to_string(),
            range: RangeShape::Constant { radius: 1 },
            area: AreaShape::Single,
            mana_cost: None,
            groups: vec![EffectGroup {
                filter: TargetFilter::Foe,
                hit: HitMethod::Melee,
                effect: EffectKind::Damage {
                    power: 50,
                    magical: false,
                },
            }],
        }
    }

    /// Whether the actor can pay for the ability right now.
    pub fn can_perform(&self, actor: &Unit) -> bool {
        match self.mana_cost {
            Some(cost) => actor.stat(StatKind::Mp) >= cost,
            None => true,
        }
    }

    /// Whether any effect group would accept this unit as a target.
    pub fn is_target(&self, actor: &Unit, candidate: &Unit) -> bool {
        self.groups
            .iter()
            .any(|group| group.filter.matches(actor, candidate))
    }

    /// First group whose filter accepts the candidate, used for previews.
    pub fn preview_group(&self, actor: &Unit, candidate: &Unit) -> Option<&EffectGroup> {
        self.groups
            .iter()
            .find(|group| group.filter.matches(actor, candidate))
    }
}

/// A unit's learned abilities, grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityCatalog {
    pub categories: Vec<AbilityCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityCategory {
    pub name: String,
    pub abilities: Vec<Ability>,
}

impl AbilityCatalog {
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn category(&self, index: usize) -> Option<&AbilityCategory> {
        self.categories.get(index)
    }

    pub fn ability(&self, category: usize, index: usize) -> Option<&Ability> {
        self.categories.get(category)?.abilities.get(index)
    }
}
