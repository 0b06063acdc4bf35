//! Pacing between battle beats.
//!
//! The simulation asks for pauses in wall-clock terms; how they are served
//! is the runtime's business. Production sessions sleep on the tokio timer,
//! tests fast-forward through every pause.

use std::time::Duration;

use async_trait::async_trait;

/// Serves the pauses a battle requests between observable steps.
#[async_trait]
pub trait PacingClock: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Real time via the tokio timer.
#[derive(Debug, Default)]
pub struct TokioClock;

#[async_trait]
impl PacingClock for TokioClock {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Returns immediately. Headless runs and tests use this to play a battle
/// at full speed.
#[derive(Debug, Default)]
pub struct InstantClock;

#[async_trait]
impl PacingClock for InstantClock {
    async fn pause(&self, _duration: Duration) {}
}
