//! Queued automatic steps.
//!
//! Phases push these instead of acting immediately: enter handlers may only
//! queue work, and computer turns express their whole menu walk as a step
//! sequence with pacing waits in between. The queue belongs to the active
//! phase; a transition discards whatever the old phase left behind.

use std::time::Duration;

use crate::config::BattleConfig;
use crate::events::BattleEvent;
use crate::scheduler::RoundStep;
use crate::turn::Turn;
use crate::types::{Direction, FireInput, Point};

use super::{BattleFlow, FlowSignal, Phase};

/// One deferred action of the active phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AutoStep {
    /// Pause for presentation.
    Wait(Duration),
    /// Step the simulated cursor toward `goal`, re-queueing itself until it
    /// arrives, then settle and confirm.
    CursorStep { goal: Point },
    /// Turn the actor, refreshing a direction-oriented range preview.
    Rotate(Direction),
    /// Feed a synthesized fire input to the active phase.
    Fire(FireInput),
    /// Transition.
    Goto(Phase),
    /// Ask the scheduler for the next turn.
    PumpScheduler,
}

impl BattleFlow {
    /// Executes one step. `Some` hands a signal to the caller; `None` lets
    /// the pump keep draining.
    pub(super) fn run_step(&mut self, step: AutoStep) -> Option<FlowSignal> {
        match step {
            AutoStep::Wait(pause) => Some(FlowSignal::Wait(pause)),
            AutoStep::CursorStep { goal } => {
                let next = self.cursor.step_toward(goal);
                if next != self.cursor {
                    self.cursor = next;
                    self.events
                        .push(BattleEvent::CursorMoved { position: next });
                }
                if self.cursor == goal {
                    self.auto.push_front(AutoStep::Fire(FireInput::Confirm));
                    self.auto
                        .push_front(AutoStep::Wait(BattleConfig::SETTLE_PAUSE));
                } else {
                    self.auto.push_front(AutoStep::CursorStep { goal });
                }
                Some(FlowSignal::Wait(BattleConfig::CURSOR_STEP_PAUSE))
            }
            AutoStep::Rotate(direction) => {
                self.rotate_actor(direction);
                let ability = self.turn.as_ref().and_then(|t| t.ability.clone());
                if self.phase == Phase::AbilityTarget
                    && let Some(ability) = ability
                    && ability.range.direction_oriented()
                {
                    self.refresh_range(&ability);
                }
                None
            }
            AutoStep::Fire(input) => {
                let before = self.phase;
                self.handle_fire(input);
                // A confirm the phase rejected would loop the walk forever;
                // fold the turn instead.
                if input == FireInput::Confirm
                    && self.phase == before
                    && matches!(
                        before,
                        Phase::MoveTarget | Phase::AbilityTarget | Phase::ConfirmAbilityTarget
                    )
                {
                    self.auto.clear();
                    self.auto.push_back(AutoStep::Goto(Phase::EndFacing));
                }
                None
            }
            AutoStep::Goto(phase) => {
                self.change_phase(phase);
                None
            }
            AutoStep::PumpScheduler => self.pump_scheduler(),
        }
    }

    fn pump_scheduler(&mut self) -> Option<FlowSignal> {
        let step = self.scheduler.next_turn(&mut self.roster);
        if self.scheduler.round() > self.round_seen {
            self.round_seen = self.scheduler.round();
            self.events.push(BattleEvent::RoundBegan {
                round: self.round_seen,
            });
        }
        match step {
            RoundStep::Turn(id) => {
                let Some(unit) = self.roster.unit(id) else {
                    self.auto.push_back(AutoStep::PumpScheduler);
                    return None;
                };
                self.turn = Some(Turn::new(unit));
                self.events.push(BattleEvent::TurnBegan { entity: id });
                self.auto.push_back(AutoStep::Goto(Phase::CommandSelection));
                None
            }
            RoundStep::RoundEnded { round, expired } => {
                for (entity, status) in expired {
                    self.events
                        .push(BattleEvent::StatusDetached { entity, status });
                }
                self.events.push(BattleEvent::RoundEnded { round });
                self.auto.push_back(AutoStep::PumpScheduler);
                // Yield so an all-ineligible roster cannot spin the pump.
                Some(FlowSignal::Wait(Duration::ZERO))
            }
        }
    }
}
