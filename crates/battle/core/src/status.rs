//! Status effects and their hook bookkeeping.
//!
//! Each status owns the store hooks it registered: attaching subscribes,
//! detaching unsubscribes and restores whatever the status displaced. The
//! knock-out status is never inflicted directly; it follows hit points
//! crossing the unit's floor in either direction.

use arrayvec::ArrayVec;
use strum::Display;

use crate::config::BattleConfig;
use crate::roster::{Roster, Unit};
use crate::scheduler::{TurnCheck, TurnGate};
use crate::stats::{HookId, Modifier, StatKind};

/// The status effects a unit can carry.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    /// Movement capped at one tile.
    Slow,
    /// The unit skips its turns.
    Stun,
    /// Defeated. Skips turns and freezes the turn counter.
    KnockOut,
}

/// One attached status plus the hooks and saved values it must undo.
#[derive(Debug)]
pub struct StatusInstance {
    kind: StatusKind,
    rounds_left: Option<u32>,
    hook: Option<HookId>,
    saved_mov: Option<i32>,
}

impl StatusInstance {
    pub fn kind(&self) -> StatusKind {
        self.kind
    }

    pub fn rounds_left(&self) -> Option<u32> {
        self.rounds_left
    }
}

/// Statuses attached to one unit, in attach order.
#[derive(Debug, Default)]
pub struct StatusList {
    entries: ArrayVec<StatusInstance, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.entries.iter().any(|s| s.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusInstance> {
        self.entries.iter()
    }

    pub fn kinds(&self) -> Vec<StatusKind> {
        self.entries.iter().map(|s| s.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get_mut(&mut self, kind: StatusKind) -> Option<&mut StatusInstance> {
        self.entries.iter_mut().find(|s| s.kind == kind)
    }

    fn take(&mut self, kind: StatusKind) -> Option<StatusInstance> {
        let index = self.entries.iter().position(|s| s.kind == kind)?;
        Some(self.entries.remove(index))
    }
}

/// Attaches a status. Re-attaching an already present status only refreshes
/// its duration. Returns true when the status is newly attached.
pub(crate) fn attach(unit: &mut Unit, kind: StatusKind, rounds: Option<u32>) -> bool {
    if let Some(existing) = unit.statuses.get_mut(kind) {
        existing.rounds_left = rounds;
        return false;
    }
    if unit.statuses.entries.is_full() {
        return false;
    }

    let instance = match kind {
        StatusKind::Slow => {
            let saved = unit.stat(StatKind::Mov);
            if saved > 1 {
                unit.stats_mut().set_value(StatKind::Mov, 1, false);
            }
            let hook = unit.stats_mut().intercept(StatKind::Mov, |_, change| {
                change.add_modifier(Modifier::max(1, 1));
            });
            StatusInstance {
                kind,
                rounds_left: rounds,
                hook: Some(hook),
                saved_mov: Some(saved),
            }
        }
        StatusKind::Stun => StatusInstance {
            kind,
            rounds_left: rounds,
            hook: None,
            saved_mov: None,
        },
        StatusKind::KnockOut => {
            // A frozen counter keeps the unit out of the round build-up.
            let hook = unit
                .stats_mut()
                .intercept(StatKind::Ctr, |_, change| change.veto());
            StatusInstance {
                kind,
                rounds_left: rounds,
                hook: Some(hook),
                saved_mov: None,
            }
        }
    };
    unit.statuses.entries.push(instance);
    true
}

/// Detaches a status, unregistering its hooks and restoring saved stats.
pub(crate) fn detach(unit: &mut Unit, kind: StatusKind) -> bool {
    let Some(instance) = unit.statuses.take(kind) else {
        return false;
    };
    if let Some(hook) = instance.hook {
        unit.stats_mut().remove_interceptor(hook);
    }
    if let Some(saved) = instance.saved_mov {
        unit.stats_mut().set_value(StatKind::Mov, saved, false);
    }
    true
}

/// Follows a committed hit point change: crossing the floor downward attaches
/// knock-out, recovering above it clears it.
pub(crate) fn react_to_hp(unit: &mut Unit) {
    let floored = unit.stat(StatKind::Hp) <= unit.min_hp();
    if floored {
        if !unit.has_status(StatusKind::KnockOut) {
            attach(unit, StatusKind::KnockOut, None);
        }
    } else if unit.has_status(StatusKind::KnockOut) {
        detach(unit, StatusKind::KnockOut);
    }
}

/// Round-boundary duration tick. Detaches and reports expired statuses.
pub(crate) fn tick_rounds(unit: &mut Unit) -> Vec<StatusKind> {
    let mut expired = Vec::new();
    for entry in &mut unit.statuses.entries {
        if let Some(rounds) = entry.rounds_left.as_mut() {
            *rounds = rounds.saturating_sub(1);
            if *rounds == 0 {
                expired.push(entry.kind);
            }
        }
    }
    for kind in &expired {
        detach(unit, *kind);
    }
    expired
}

/// Scheduler gate: stunned and knocked-out units forfeit their turns.
#[derive(Debug, Default)]
pub struct StatusGate;

impl TurnGate for StatusGate {
    fn check(&self, roster: &Roster, check: &mut TurnCheck) {
        if !check.is_eligible() {
            return;
        }
        if let Some(unit) = roster.unit(check.entity())
            && (unit.has_status(StatusKind::Stun) || unit.has_status(StatusKind::KnockOut))
        {
            check.deny();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::UnitSpec;
    use crate::stats::BaseStats;
    use crate::types::{Alliance, Direction, Point};

    fn unit() -> Unit {
        let mut roster = Roster::new();
        let mut spec = UnitSpec::new("subject", Alliance::Hero);
        spec.stats = BaseStats {
            max_hp: 30,
            mov: 5,
            ..BaseStats::default()
        };
        let id = roster
            .spawn(spec, Point::new(0, 0), Direction::East)
            .expect("spawn");
        roster.remove(id).expect("take unit")
    }

    #[test]
    fn slow_caps_movement_and_restores_on_detach() {
        let mut u = unit();
        assert!(attach(&mut u, StatusKind::Slow, None));
        assert_eq!(u.stat(StatKind::Mov), 1);

        // Boosts while slowed still cap at one tile.
        u.set_stat(StatKind::Mov, 7, true);
        assert_eq!(u.stat(StatKind::Mov), 1);

        assert!(detach(&mut u, StatusKind::Slow));
        assert_eq!(u.stat(StatKind::Mov), 5);

        // The interceptor is gone with the status.
        u.set_stat(StatKind::Mov, 7, true);
        assert_eq!(u.stat(StatKind::Mov), 7);
    }

    #[test]
    fn knock_out_follows_the_hit_point_floor() {
        let mut u = unit();
        u.set_stat(StatKind::Hp, 0, true);
        assert!(u.is_knocked_out());

        // The counter freezes while down.
        u.set_stat(StatKind::Ctr, 500, true);
        assert_eq!(u.stat(StatKind::Ctr), 0);

        u.set_stat(StatKind::Hp, 12, true);
        assert!(!u.is_knocked_out());
        u.set_stat(StatKind::Ctr, 500, true);
        assert_eq!(u.stat(StatKind::Ctr), 500);
    }

    #[test]
    fn reattaching_refreshes_duration_without_stacking() {
        let mut u = unit();
        assert!(attach(&mut u, StatusKind::Stun, Some(1)));
        assert!(!attach(&mut u, StatusKind::Stun, Some(3)));
        assert_eq!(u.statuses().len(), 1);

        assert!(tick_rounds(&mut u).is_empty());
        assert!(u.has_status(StatusKind::Stun));
    }

    #[test]
    fn round_ticks_expire_timed_statuses() {
        let mut u = unit();
        attach(&mut u, StatusKind::Slow, Some(2));
        attach(&mut u, StatusKind::Stun, None);

        assert!(tick_rounds(&mut u).is_empty());
        let expired = tick_rounds(&mut u);
        assert_eq!(expired, vec![StatusKind::Slow]);
        assert_eq!(u.stat(StatKind::Mov), 5);
        // Indefinite statuses never expire on their own.
        assert!(u.has_status(StatusKind::Stun));
    }
}
