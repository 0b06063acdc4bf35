//! One battle from first pump to outcome.

use std::time::Duration;

use battle_core::{BattleFlow, EntityId, FlowSignal, Phase, Victor};
use serde::Serialize;

use crate::clock::{PacingClock, TokioClock};
use crate::error::{Result, RuntimeError};
use crate::events::EventBus;
use crate::presentation::{PresentationSink, TracingSink};
use crate::providers::{InputSource, PlayerInput};

/// How a finished battle came out.
#[derive(Debug, Clone, Serialize)]
pub struct BattleReport {
    pub victor: Victor,
    /// Rounds begun by the time the battle ended.
    pub rounds: u32,
    /// Units still standing, in spawn order.
    pub survivors: Vec<EntityId>,
}

/// Asynchronous shell around a [`BattleFlow`].
///
/// The session pumps the flow, serves its pauses through the pacing clock,
/// pulls a decision from the input source whenever the flow awaits one, and
/// fans every drained event out to the presentation sink and the event bus.
pub struct BattleSession {
    flow: BattleFlow,
    clock: Box<dyn PacingClock>,
    sink: Box<dyn PresentationSink>,
    bus: EventBus,
}

impl BattleSession {
    /// Wraps a flow with real-time pacing and tracing narration.
    pub fn new(flow: BattleFlow) -> Self {
        Self {
            flow,
            clock: Box::new(TokioClock),
            sink: Box::new(TracingSink),
            bus: EventBus::new(),
        }
    }

    /// Replaces the pacing clock. Tests and headless runs pass the instant
    /// clock here.
    pub fn with_clock(mut self, clock: impl PacingClock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_sink(mut self, sink: impl PresentationSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Shared handle to the session's event bus. Subscribe before running;
    /// events published earlier are not replayed.
    pub fn bus(&self) -> EventBus {
        self.bus.clone()
    }

    pub fn phase(&self) -> Phase {
        self.flow.phase()
    }

    /// Runs the battle to its end.
    pub async fn run(mut self, mut source: impl InputSource) -> Result<BattleReport> {
        tracing::info!(units = self.flow.roster().len(), "battle session started");
        loop {
            let signal = self.pump();
            self.flush().await;
            match signal {
                FlowSignal::Wait(pause) => self.pause(pause).await,
                FlowSignal::AwaitInput => {
                    let Some(input) = source.next_input().await else {
                        tracing::warn!("input source exhausted mid-battle");
                        return Err(RuntimeError::InputSourceClosed);
                    };
                    self.apply(input);
                }
                FlowSignal::Ended(victor) => {
                    let report = self.report(victor);
                    tracing::info!(?victor, rounds = report.rounds, "battle ended");
                    return Ok(report);
                }
            }
        }
    }

    pub(crate) fn pump(&mut self) -> FlowSignal {
        self.flow.pump()
    }

    /// Feeds one decision to the flow. Decisions the active phase does not
    /// accept are dropped there.
    pub(crate) fn apply(&mut self, input: PlayerInput) {
        match input {
            PlayerInput::Move(delta) => self.flow.on_move(delta),
            PlayerInput::Fire(fire) => self.flow.on_fire(fire),
        }
    }

    /// Forwards drained events to the sink first, then the bus.
    pub(crate) async fn flush(&mut self) {
        for event in self.flow.drain_events() {
            self.sink.present(&event).await;
            self.bus.publish(event);
        }
    }

    pub(crate) async fn pause(&mut self, duration: Duration) {
        self.clock.pause(duration).await;
    }

    pub(crate) fn report(&self, victor: Victor) -> BattleReport {
        BattleReport {
            victor,
            rounds: self.flow.round(),
            survivors: self
                .flow
                .roster()
                .iter()
                .filter(|unit| !unit.is_defeated())
                .map(|unit| unit.id())
                .collect(),
        }
    }
}
