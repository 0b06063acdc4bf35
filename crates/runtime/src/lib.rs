//! Asynchronous shell for the deterministic battle simulation.
//!
//! `battle-core` stays pure and synchronous; this crate gives it time,
//! tasks, and channels. Consumers wrap a flow in a [`BattleSession`] to run
//! it inline, or spawn it behind a [`SessionHandle`] and talk to it over
//! channels while subscribing to its events.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the battle loop and its report
//! - [`worker`] runs a session on its own task, driven over channels
//! - [`events`] provides the topic-based event bus
//! - [`providers`] supplies player decisions to an awaiting battle
//! - [`planner`] decides computer turns
//! - [`clock`] paces the battle's presentation pauses
//! - [`presentation`] narrates drained events
pub mod clock;
pub mod error;
pub mod events;
pub mod planner;
pub mod presentation;
pub mod providers;
pub mod session;
pub mod worker;

pub use clock::{InstantClock, PacingClock, TokioClock};
pub use error::{Result, RuntimeError};
pub use events::{EventBus, Topic};
pub use planner::NearestFoePlanner;
pub use presentation::{PresentationSink, TracingSink};
pub use providers::{ChannelInput, InputRepeater, InputSource, PlayerInput, ScriptedInput};
pub use session::{BattleReport, BattleSession};
pub use worker::{Command, SessionHandle, SessionWorker};
