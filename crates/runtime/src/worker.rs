//! Battle loop on its own task, driven over channels.
//!
//! The worker owns a [`BattleSession`] and plays the role of its input
//! source: whenever the flow awaits a decision it blocks on the command
//! channel. Commands arriving while the battle is busy are applied at the
//! next pause, where the flow drops any input it was not asking for.

use battle_core::{BattleEvent, FlowSignal, Phase};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::{Result, RuntimeError};
use crate::events::{EventBus, Topic};
use crate::providers::PlayerInput;
use crate::session::{BattleReport, BattleSession};

/// What a handle may ask of a running session.
#[derive(Debug)]
pub enum Command {
    /// One player decision.
    Input(PlayerInput),
    /// The phase the battle currently sits in.
    QueryPhase { reply: oneshot::Sender<Phase> },
}

/// Drives a [`BattleSession`] from a command channel.
pub struct SessionWorker {
    session: BattleSession,
    command_rx: mpsc::Receiver<Command>,
}

impl SessionWorker {
    const COMMAND_BUFFER: usize = 32;

    /// Spawns the worker task and hands back its handle.
    pub fn spawn(session: BattleSession) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(Self::COMMAND_BUFFER);
        let bus = session.bus();
        let worker = Self {
            session,
            command_rx,
        };
        let task = tokio::spawn(worker.run());
        SessionHandle {
            command_tx,
            bus,
            task,
        }
    }

    async fn run(mut self) -> Result<BattleReport> {
        tracing::debug!("session worker started");
        loop {
            let signal = self.session.pump();
            self.session.flush().await;
            match signal {
                FlowSignal::Wait(pause) => {
                    self.session.pause(pause).await;
                    self.drain_pending();
                }
                FlowSignal::AwaitInput => match self.command_rx.recv().await {
                    Some(command) => self.handle_command(command),
                    None => {
                        tracing::warn!("command channel closed while awaiting input");
                        return Err(RuntimeError::InputSourceClosed);
                    }
                },
                FlowSignal::Ended(victor) => {
                    let report = self.session.report(victor);
                    tracing::debug!(victor = ?report.victor, "session worker finished");
                    return Ok(report);
                }
            }
        }
    }

    /// Applies every command that queued up while the battle was busy.
    fn drain_pending(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Input(input) => self.session.apply(input),
            Command::QueryPhase { reply } => {
                let _ = reply.send(self.session.phase());
            }
        }
    }
}

/// Caller's end of a spawned session.
#[derive(Debug)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
    bus: EventBus,
    task: JoinHandle<Result<BattleReport>>,
}

impl SessionHandle {
    /// Sends one player decision to the battle.
    pub async fn input(&self, input: PlayerInput) -> Result<()> {
        self.command_tx
            .send(Command::Input(input))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Asks the worker which phase the battle sits in.
    pub async fn phase(&self) -> Result<Phase> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::QueryPhase { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// New receiver for one of the session's event topics.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<BattleEvent> {
        self.bus.subscribe(topic)
    }

    pub fn bus(&self) -> EventBus {
        self.bus.clone()
    }

    /// Waits for the battle to finish and returns its report.
    pub async fn finish(self) -> Result<BattleReport> {
        // No further input is coming. Holding the sender open would hang a
        // battle that asks again; dropping it turns that ask into an error.
        drop(self.command_tx);
        self.task.await.map_err(RuntimeError::WorkerJoin)?
    }
}
