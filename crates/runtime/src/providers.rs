//! Decision sources for human-driven units.
//!
//! The battle pulls: a session asks its [`InputSource`] only when the
//! simulation actually awaits input, so sources never track whose turn it
//! is. What they hand over is the same raw pad vocabulary the battle
//! understands, a directional step or a fire edge.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use battle_core::{FireInput, Point};
use tokio::sync::mpsc;

/// One decision fed to a battle awaiting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// Digital pad step.
    Move(Point),
    /// Fire button edge.
    Fire(FireInput),
}

/// Pull-based source of player decisions.
///
/// Returning `None` means the source is exhausted; the session treats that
/// as fatal, since the battle cannot advance without the answer it asked
/// for.
#[async_trait]
pub trait InputSource: Send {
    async fn next_input(&mut self) -> Option<PlayerInput>;
}

// =============================================================================
// Sources
// =============================================================================

/// Replays a fixed sequence of decisions, then reports exhaustion.
///
/// Drives scripted battles in tests and demos. An empty script suits a
/// battle with no human units, where input should never be asked for at
/// all.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    queue: VecDeque<PlayerInput>,
}

impl ScriptedInput {
    pub fn new(inputs: impl IntoIterator<Item = PlayerInput>) -> Self {
        Self {
            queue: inputs.into_iter().collect(),
        }
    }
}

#[async_trait]
impl InputSource for ScriptedInput {
    async fn next_input(&mut self) -> Option<PlayerInput> {
        self.queue.pop_front()
    }
}

/// Receives decisions from an mpsc channel, typically fed by a UI task.
#[derive(Debug)]
pub struct ChannelInput {
    receiver: mpsc::Receiver<PlayerInput>,
}

impl ChannelInput {
    pub fn new(receiver: mpsc::Receiver<PlayerInput>) -> Self {
        Self { receiver }
    }

    /// Sender/source pair sized for interactive use.
    pub fn pair() -> (mpsc::Sender<PlayerInput>, Self) {
        let (sender, receiver) = mpsc::channel(32);
        (sender, Self::new(receiver))
    }
}

#[async_trait]
impl InputSource for ChannelInput {
    async fn next_input(&mut self) -> Option<PlayerInput> {
        self.receiver.recv().await
    }
}

// =============================================================================
// Hold-to-repeat
// =============================================================================

/// Turns pad press/release edges into the classic hold-to-repeat stream.
///
/// The first step fires on the press itself. Holding repeats it after
/// [`InputRepeater::FIRST_REPEAT`], then every
/// [`InputRepeater::REPEAT_EVERY`]. Fire buttons are never repeated;
/// frontends report those on release instead.
#[derive(Debug, Default)]
pub struct InputRepeater {
    held: Option<Point>,
    hold_time: Duration,
    repeats: u32,
}

impl InputRepeater {
    /// Hold time before the first repeat.
    pub const FIRST_REPEAT: Duration = Duration::from_millis(500);
    /// Interval between repeats after the first.
    pub const REPEAT_EVERY: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self::default()
    }

    /// Pad-down edge. Restarts the hold clock and emits the first step.
    pub fn press(&mut self, delta: Point) -> PlayerInput {
        self.held = Some(delta);
        self.hold_time = Duration::ZERO;
        self.repeats = 0;
        PlayerInput::Move(delta)
    }

    /// Pad-up edge. Stops repeating.
    pub fn release(&mut self) {
        self.held = None;
    }

    /// Advances the hold clock, returning every repeat that came due.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<PlayerInput> {
        let Some(delta) = self.held else {
            return Vec::new();
        };
        self.hold_time += elapsed;
        let mut due = Vec::new();
        while self.hold_time >= Self::FIRST_REPEAT + Self::REPEAT_EVERY * self.repeats {
            due.push(PlayerInput::Move(delta));
            self.repeats += 1;
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right() -> Point {
        Point::new(1, 0)
    }

    #[test]
    fn press_fires_immediately_but_does_not_repeat_early() {
        let mut repeater = InputRepeater::new();
        assert_eq!(repeater.press(right()), PlayerInput::Move(right()));
        assert!(repeater.advance(Duration::from_millis(499)).is_empty());
    }

    #[test]
    fn holding_repeats_after_half_a_second_then_quarters() {
        let mut repeater = InputRepeater::new();
        repeater.press(right());
        assert_eq!(repeater.advance(Duration::from_millis(500)).len(), 1);
        assert!(repeater.advance(Duration::from_millis(249)).is_empty());
        assert_eq!(repeater.advance(Duration::from_millis(1)).len(), 1);
        // A long stall emits every repeat that came due in the meantime.
        assert_eq!(repeater.advance(Duration::from_millis(500)).len(), 2);
    }

    #[test]
    fn release_stops_the_stream() {
        let mut repeater = InputRepeater::new();
        repeater.press(right());
        repeater.release();
        assert!(repeater.advance(Duration::from_secs(2)).is_empty());
    }

    #[test]
    fn a_new_press_restarts_the_hold_clock() {
        let mut repeater = InputRepeater::new();
        repeater.press(right());
        repeater.advance(Duration::from_millis(400));
        repeater.press(Point::new(0, 1));
        let due = repeater.advance(Duration::from_millis(400));
        assert!(due.is_empty());
    }

    #[tokio::test]
    async fn scripted_input_replays_then_exhausts() {
        let mut source = ScriptedInput::new([
            PlayerInput::Move(right()),
            PlayerInput::Fire(FireInput::Confirm),
        ]);
        assert_eq!(source.next_input().await, Some(PlayerInput::Move(right())));
        assert_eq!(
            source.next_input().await,
            Some(PlayerInput::Fire(FireInput::Confirm))
        );
        assert_eq!(source.next_input().await, None);
    }

    #[tokio::test]
    async fn channel_input_closes_with_its_sender() {
        let (sender, mut source) = ChannelInput::pair();
        sender
            .send(PlayerInput::Fire(FireInput::Cancel))
            .await
            .expect("send");
        assert_eq!(
            source.next_input().await,
            Some(PlayerInput::Fire(FireInput::Cancel))
        );
        drop(sender);
        assert_eq!(source.next_input().await, None);
    }
}
