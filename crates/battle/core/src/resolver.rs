//! Applies a confirmed ability to its targets.
//!
//! Prediction is pure and shared with the targeting preview; performing adds
//! the hit roll and damage variance, mutates the roster, and settles the
//! mana cost afterward. Registered tweaks adjust predicted magnitudes before
//! the clamp, so criticals or elemental bonuses plug in without touching the
//! base formulas.

use crate::ability::{Ability, EffectGroup, EffectKind};
use crate::config::BattleConfig;
use crate::error::CoreError;
use crate::rng::BattleRng;
use crate::roster::{Roster, Unit};
use crate::stats::{StatChange, StatKind};
use crate::status::StatusKind;
use crate::types::{EntityId, Point};

/// Post-prediction adjustment. Receives the signed amount and returns the
/// adjusted one; the clamp runs afterward.
pub trait EffectTweak: Send {
    fn tweak(&self, attacker: &Unit, defender: &Unit, effect: &EffectKind, amount: i32) -> i32;
}

/// What one effect group did to one target.
#[derive(Debug)]
pub struct EffectOutcome {
    pub target: EntityId,
    pub position: Point,
    /// Index of the group within the ability.
    pub group: usize,
    pub chance: i32,
    pub roll: i32,
    pub hit: bool,
    /// Committed hit point change, when the effect moved a stat.
    pub change: Option<StatChange>,
    /// Status newly attached by an inflict effect.
    pub inflicted: Option<StatusKind>,
    /// Whether this outcome dropped the target.
    pub knocked_out: bool,
}

/// Result of performing an ability.
#[derive(Debug, Default)]
pub struct PerformReport {
    /// False when the actor could not pay the cost; nothing was applied.
    pub performed: bool,
    pub outcomes: Vec<EffectOutcome>,
}

#[derive(Default)]
pub struct Resolver {
    tweaks: Vec<Box<dyn EffectTweak>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tweak(&mut self, tweak: impl EffectTweak + 'static) {
        self.tweaks.push(Box::new(tweak));
    }

    /// Signed hit point delta the group would produce before variance.
    /// Inflict effects predict zero.
    pub fn predict(&self, attacker: &Unit, defender: &Unit, group: &EffectGroup) -> i32 {
        let base = match group.effect {
            EffectKind::Damage { power, magical } => {
                let (attack, defense) = if magical {
                    (StatKind::Mat, StatKind::Mdf)
                } else {
                    (StatKind::Atk, StatKind::Def)
                };
                let damage = (attacker.stat(attack) - defender.stat(defense) / 2).max(1);
                let damage = (power * damage / 100).max(1);
                -damage
            }
            EffectKind::Heal { power } => {
                let base = attacker.stat(StatKind::Mat).max(1);
                (power * base / 100).max(1)
            }
            EffectKind::Inflict { .. } => 0,
        };
        let tweaked = self
            .tweaks
            .iter()
            .fold(base, |amount, t| {
                t.tweak(attacker, defender, &group.effect, amount)
            });
        tweaked.clamp(BattleConfig::MIN_EFFECT, BattleConfig::MAX_EFFECT)
    }

    /// Performs the ability against every occupant of `targets`.
    ///
    /// Each group rolls per target; tiles without an occupant and occupants a
    /// group's filter rejects are skipped silently. The mana cost is settled
    /// once, after all groups ran.
    pub fn perform(
        &self,
        roster: &mut Roster,
        rng: &mut dyn BattleRng,
        actor: EntityId,
        ability: &Ability,
        targets: &[Point],
    ) -> Result<PerformReport, CoreError> {
        let actor_unit = roster
            .unit(actor)
            .ok_or(CoreError::UnknownEntity(actor))?;
        if !ability.can_perform(actor_unit) {
            return Ok(PerformReport::default());
        }

        let mut outcomes = Vec::new();
        for &position in targets {
            let Some(target) = roster.occupant_at(position) else {
                continue;
            };
            for (index, group) in ability.groups.iter().enumerate() {
                if let Some(outcome) =
                    self.apply_group(roster, rng, actor, target, position, index, group)
                {
                    outcomes.push(outcome);
                }
            }
        }

        if let Some(cost) = ability.mana_cost
            && let Some(actor_unit) = roster.unit_mut(actor)
        {
            let mana = actor_unit.stat(StatKind::Mp);
            actor_unit.set_stat(StatKind::Mp, mana - cost, true);
        }

        Ok(PerformReport {
            performed: true,
            outcomes,
        })
    }

    fn apply_group(
        &self,
        roster: &mut Roster,
        rng: &mut dyn BattleRng,
        actor: EntityId,
        target: EntityId,
        position: Point,
        index: usize,
        group: &EffectGroup,
    ) -> Option<EffectOutcome> {
        let attacker = roster.unit(actor)?;
        let defender = roster.unit(target)?;
        if !group.filter.matches(attacker, defender) {
            return None;
        }

        let chance = group.hit.chance(attacker, defender);
        let roll = rng.range_i32(0, 100);
        let hit = roll <= chance;
        if !hit {
            return Some(EffectOutcome {
                target,
                position,
                group: index,
                chance,
                roll,
                hit,
                change: None,
                inflicted: None,
                knocked_out: false,
            });
        }

        let (change, inflicted, knocked_out) = match group.effect {
            EffectKind::Damage { .. } | EffectKind::Heal { .. } => {
                let predicted = self.predict(attacker, defender, group);
                let percent = rng.range_i32(
                    BattleConfig::VARIANCE_MIN_PCT,
                    BattleConfig::VARIANCE_MAX_PCT - 1,
                );
                // Floor division keeps variance symmetric for negative deltas.
                let amount = (predicted * percent)
                    .div_euclid(100)
                    .clamp(BattleConfig::MIN_EFFECT, BattleConfig::MAX_EFFECT);

                let was_down = defender.is_knocked_out();
                let hp = defender.stat(StatKind::Hp);
                let defender = roster.unit_mut(target)?;
                let change = defender.set_stat(StatKind::Hp, hp + amount, true);
                let knocked_out = !was_down && defender.is_knocked_out();
                (change, None, knocked_out)
            }
            EffectKind::Inflict { status, rounds } => {
                let defender = roster.unit_mut(target)?;
                let newly = defender.attach_status(status, rounds);
                (None, newly.then_some(status), false)
            }
        };

        Some(EffectOutcome {
            target,
            position,
            group: index,
            chance,
            roll,
            hit,
            change,
            inflicted,
            knocked_out,
        })
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("tweaks", &self.tweaks.len())
            .finish()
    }
}
