//! Counter-driven turn scheduling.
//!
//! Every round each unit's counter rises by its speed; the round then visits
//! units in descending counter order (spawn order breaks ties) and offers a
//! turn to each one that clears the activation threshold and every registered
//! gate. Costs are deducted when the turn completes and may push the counter
//! negative; the debt carries into following rounds.

use std::cmp::Reverse;
use std::collections::VecDeque;

use crate::config::BattleConfig;
use crate::roster::Roster;
use crate::stats::StatKind;
use crate::status::StatusKind;
use crate::types::EntityId;

// =============================================================================
// Eligibility gates
// =============================================================================

/// A pending turn grant that gates may deny.
#[derive(Debug)]
pub struct TurnCheck {
    entity: EntityId,
    default_eligible: bool,
    eligible: bool,
}

impl TurnCheck {
    fn new(entity: EntityId, default_eligible: bool) -> Self {
        Self {
            entity,
            default_eligible,
            eligible: default_eligible,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Whether the counter threshold alone would grant the turn.
    pub fn default_eligible(&self) -> bool {
        self.default_eligible
    }

    pub fn is_eligible(&self) -> bool {
        self.eligible
    }

    /// Denies the turn. Denial is final for this check.
    pub fn deny(&mut self) {
        self.eligible = false;
    }
}

/// External veto over turn grants. Gates subscribe on activation and must be
/// removed when whatever registered them goes away.
pub trait TurnGate: Send {
    fn check(&self, roster: &Roster, check: &mut TurnCheck);
}

/// Handle for removing a registered gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateId(u32);

// =============================================================================
// Scheduler
// =============================================================================

/// What one scheduling step produced.
#[derive(Debug)]
pub enum RoundStep {
    /// A unit cleared the threshold and all gates; it now owns the turn.
    Turn(EntityId),
    /// The round's queue drained. Round-limited statuses were ticked; the
    /// next step begins a new round.
    RoundEnded {
        round: u32,
        expired: Vec<(EntityId, StatusKind)>,
    },
}

#[derive(Default)]
pub struct TurnScheduler {
    queue: VecDeque<EntityId>,
    round: u32,
    mid_round: bool,
    gates: Vec<(GateId, Box<dyn TurnGate>)>,
    next_gate: u32,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rounds completed so far, starting at zero before the first step.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn register_gate(&mut self, gate: impl TurnGate + 'static) -> GateId {
        let id = GateId(self.next_gate);
        self.next_gate += 1;
        self.gates.push((id, Box::new(gate)));
        id
    }

    pub fn remove_gate(&mut self, id: GateId) {
        self.gates.retain(|(gate, _)| *gate != id);
    }

    /// Advances until a unit is granted a turn or the round's queue drains.
    ///
    /// A fresh round raises every counter by the unit's speed (a veto-enabled
    /// write, so frozen counters stay put) and snapshots the visit order.
    /// Eligibility is checked when a unit is visited, not when the round is
    /// built. An all-ineligible roster yields one `RoundEnded` per call and
    /// never spins.
    pub fn next_turn(&mut self, roster: &mut Roster) -> RoundStep {
        if !self.mid_round {
            self.begin_round(roster);
        }

        while let Some(id) = self.queue.pop_front() {
            let Some(unit) = roster.unit(id) else {
                continue;
            };
            let threshold_met = unit.stat(StatKind::Ctr) >= BattleConfig::TURN_ACTIVATION;
            let mut check = TurnCheck::new(id, threshold_met);
            for (_, gate) in &self.gates {
                gate.check(roster, &mut check);
            }
            if check.is_eligible() {
                return RoundStep::Turn(id);
            }
        }

        self.mid_round = false;
        let expired = roster.tick_status_rounds();
        RoundStep::RoundEnded {
            round: self.round,
            expired,
        }
    }

    /// Settles the cost of a completed turn against the unit's counter. The
    /// write bypasses vetoes; costs always land, even below zero.
    pub fn complete_turn(&mut self, roster: &mut Roster, id: EntityId, moved: bool, acted: bool) {
        let mut cost = BattleConfig::TURN_COST;
        if moved {
            cost += BattleConfig::MOVE_COST;
        }
        if acted {
            cost += BattleConfig::ACTION_COST;
        }
        if let Some(unit) = roster.unit_mut(id) {
            let counter = unit.stat(StatKind::Ctr);
            unit.set_stat(StatKind::Ctr, counter - cost, false);
        }
    }

    fn begin_round(&mut self, roster: &mut Roster) {
        self.round += 1;
        self.mid_round = true;

        let ids = roster.ids();
        for id in &ids {
            if let Some(unit) = roster.unit_mut(*id) {
                let counter = unit.stat(StatKind::Ctr);
                let speed = unit.stat(StatKind::Spd);
                unit.set_stat(StatKind::Ctr, counter + speed, true);
            }
        }

        // Stable sort: equal counters keep spawn order.
        let mut order = ids;
        order.sort_by_key(|id| {
            Reverse(
                roster
                    .unit(*id)
                    .map(|u| u.stat(StatKind::Ctr))
                    .unwrap_or(i32::MIN),
            )
        });
        self.queue = order.into();
    }
}

impl std::fmt::Debug for TurnScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnScheduler")
            .field("round", &self.round)
            .field("queue", &self.queue)
            .field("gates", &self.gates.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::UnitSpec;
    use crate::stats::BaseStats;
    use crate::status::StatusGate;
    use crate::types::{Alliance, Direction, Point};

    fn spawn(roster: &mut Roster, name: &str, x: i32, spd: i32) -> EntityId {
        let mut spec = UnitSpec::new(name, Alliance::Hero);
        spec.stats = BaseStats {
            max_hp: 30,
            spd,
            mov: 3,
            ..BaseStats::default()
        };
        roster
            .spawn(spec, Point::new(x, 0), Direction::East)
            .expect("spawn")
    }

    fn force_counter(roster: &mut Roster, id: EntityId, value: i32) {
        roster
            .unit_mut(id)
            .expect("unit")
            .set_stat(StatKind::Ctr, value, false);
    }

    #[test]
    fn grants_descend_by_counter_with_stable_ties() {
        let mut roster = Roster::new();
        let a = spawn(&mut roster, "a", 0, 0);
        let b = spawn(&mut roster, "b", 1, 0);
        let c = spawn(&mut roster, "c", 2, 0);
        force_counter(&mut roster, a, 1000);
        force_counter(&mut roster, b, 1000);
        force_counter(&mut roster, c, 1500);

        let mut scheduler = TurnScheduler::new();
        let mut granted = Vec::new();
        loop {
            match scheduler.next_turn(&mut roster) {
                RoundStep::Turn(id) => {
                    granted.push(id);
                    scheduler.complete_turn(&mut roster, id, false, false);
                }
                RoundStep::RoundEnded { .. } => break,
            }
        }
        assert_eq!(granted, vec![c, a, b]);
    }

    #[test]
    fn faster_units_activate_first_and_everyone_eventually_acts() {
        let mut roster = Roster::new();
        let fast = spawn(&mut roster, "fast", 0, 10);
        let slow = spawn(&mut roster, "slow", 1, 5);

        let mut scheduler = TurnScheduler::new();
        let mut order = Vec::new();
        for _ in 0..100_000 {
            if let RoundStep::Turn(id) = scheduler.next_turn(&mut roster) {
                scheduler.complete_turn(&mut roster, id, true, true);
                if !order.contains(&id) {
                    order.push(id);
                }
                if order.len() == 2 {
                    break;
                }
            }
        }
        assert_eq!(order, vec![fast, slow]);
    }

    #[test]
    fn turn_costs_deduct_with_carry() {
        let mut roster = Roster::new();
        let a = spawn(&mut roster, "a", 0, 0);
        force_counter(&mut roster, a, 600);

        let mut scheduler = TurnScheduler::new();
        scheduler.complete_turn(&mut roster, a, true, true);
        assert_eq!(roster.unit(a).expect("unit").stat(StatKind::Ctr), -400);

        scheduler.complete_turn(&mut roster, a, false, false);
        assert_eq!(roster.unit(a).expect("unit").stat(StatKind::Ctr), -900);
    }

    #[test]
    fn gates_deny_eligible_units() {
        let mut roster = Roster::new();
        let stunned = spawn(&mut roster, "stunned", 0, 0);
        let ready = spawn(&mut roster, "ready", 1, 0);
        force_counter(&mut roster, stunned, 2000);
        force_counter(&mut roster, ready, 1000);
        roster
            .unit_mut(stunned)
            .expect("unit")
            .attach_status(StatusKind::Stun, None);

        let mut scheduler = TurnScheduler::new();
        scheduler.register_gate(StatusGate);
        match scheduler.next_turn(&mut roster) {
            RoundStep::Turn(id) => assert_eq!(id, ready),
            RoundStep::RoundEnded { .. } => panic!("expected a turn"),
        }
    }

    #[test]
    fn removed_gate_stops_denying() {
        let mut roster = Roster::new();
        let stunned = spawn(&mut roster, "stunned", 0, 0);
        force_counter(&mut roster, stunned, 2000);
        roster
            .unit_mut(stunned)
            .expect("unit")
            .attach_status(StatusKind::Stun, None);

        let mut scheduler = TurnScheduler::new();
        let gate = scheduler.register_gate(StatusGate);
        assert!(matches!(
            scheduler.next_turn(&mut roster),
            RoundStep::RoundEnded { .. }
        ));

        scheduler.remove_gate(gate);
        assert!(matches!(
            scheduler.next_turn(&mut roster),
            RoundStep::Turn(id) if id == stunned
        ));
    }

    #[test]
    fn knocked_out_counters_stay_frozen() {
        let mut roster = Roster::new();
        let down = spawn(&mut roster, "down", 0, 10);
        roster
            .unit_mut(down)
            .expect("unit")
            .set_stat(StatKind::Hp, 0, true);

        let mut scheduler = TurnScheduler::new();
        scheduler.register_gate(StatusGate);
        for _ in 0..3 {
            assert!(matches!(
                scheduler.next_turn(&mut roster),
                RoundStep::RoundEnded { .. }
            ));
        }
        assert_eq!(roster.unit(down).expect("unit").stat(StatKind::Ctr), 0);
    }

    #[test]
    fn round_boundaries_tick_status_durations() {
        let mut roster = Roster::new();
        let slowed = spawn(&mut roster, "slowed", 0, 0);
        roster
            .unit_mut(slowed)
            .expect("unit")
            .attach_status(StatusKind::Slow, Some(1));
        assert_eq!(roster.unit(slowed).expect("unit").stat(StatKind::Mov), 1);

        let mut scheduler = TurnScheduler::new();
        match scheduler.next_turn(&mut roster) {
            RoundStep::RoundEnded { round, expired } => {
                assert_eq!(round, 1);
                assert_eq!(expired, vec![(slowed, StatusKind::Slow)]);
            }
            RoundStep::Turn(_) => panic!("no unit should activate"),
        }
        assert_eq!(roster.unit(slowed).expect("unit").stat(StatKind::Mov), 3);
    }

    #[test]
    fn empty_roster_produces_empty_rounds() {
        let mut roster = Roster::new();
        let mut scheduler = TurnScheduler::new();
        assert!(matches!(
            scheduler.next_turn(&mut roster),
            RoundStep::RoundEnded { round: 1, .. }
        ));
        assert!(matches!(
            scheduler.next_turn(&mut roster),
            RoundStep::RoundEnded { round: 2, .. }
        ));
    }
}
