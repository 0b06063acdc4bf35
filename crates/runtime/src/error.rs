//! Unified error types surfaced by the session runtime.
//!
//! Wraps failures from worker coordination and input sources so callers can
//! bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("input source closed while the battle awaited a decision")]
    InputSourceClosed,

    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
