//! Topic-routed event distribution.
//!
//! The session publishes every [`BattleEvent`] it drains onto a broadcast
//! channel keyed by topic, so a UI can follow menus and cursors while a
//! recorder follows only combat results. Publishing is fire-and-forget; a
//! topic nobody listens to drops its events.

use battle_core::BattleEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Coarse routing key for battle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// Phase, round, and turn progression, plus the final outcome.
    Flow,
    /// Spawns, movement, resolved effects, statuses, and experience.
    Combat,
    /// Cursor, highlight, menu, panel, and script cues.
    Presentation,
}

impl Topic {
    /// The topic an event is published under.
    pub fn of(event: &BattleEvent) -> Self {
        use BattleEvent::*;
        match event {
            PhaseEntered { .. }
            | RoundBegan { .. }
            | RoundEnded { .. }
            | TurnBegan { .. }
            | TurnCompleted { .. }
            | BattleEnded { .. } => Topic::Flow,
            UnitSpawned { .. }
            | FacingChanged { .. }
            | UnitMoved { .. }
            | MoveUndone { .. }
            | AbilityAnnounced { .. }
            | AbilityFailed { .. }
            | EffectApplied { .. }
            | EffectMissed { .. }
            | StatusAttached { .. }
            | StatusDetached { .. }
            | ExperienceAwarded { .. } => Topic::Combat,
            CursorMoved { .. }
            | StatPanelShown { .. }
            | StatPanelHidden
            | TilesHighlighted { .. }
            | HighlightCleared
            | MenuShown { .. }
            | MenuSelection { .. }
            | MenuHidden
            | TargetFocused { .. }
            | ScriptPageShown { .. }
            | ScriptCompleted => Topic::Presentation,
        }
    }
}

/// Fan-out hub for battle events.
///
/// Cloning shares the underlying channels; any clone may publish or
/// subscribe. Receivers that fall more than a channel's capacity behind
/// start losing the oldest events.
#[derive(Debug, Clone)]
pub struct EventBus {
    flow: broadcast::Sender<BattleEvent>,
    combat: broadcast::Sender<BattleEvent>,
    presentation: broadcast::Sender<BattleEvent>,
}

impl EventBus {
    const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (flow, _) = broadcast::channel(capacity);
        let (combat, _) = broadcast::channel(capacity);
        let (presentation, _) = broadcast::channel(capacity);
        Self {
            flow,
            combat,
            presentation,
        }
    }

    fn channel(&self, topic: Topic) -> &broadcast::Sender<BattleEvent> {
        match topic {
            Topic::Flow => &self.flow,
            Topic::Combat => &self.combat,
            Topic::Presentation => &self.presentation,
        }
    }

    /// Publishes an event under its topic. Best-effort: an error from the
    /// channel only means nobody is subscribed.
    pub fn publish(&self, event: BattleEvent) {
        let topic = Topic::of(&event);
        if self.channel(topic).send(event).is_err() {
            tracing::trace!(?topic, "event dropped, no subscribers");
        }
    }

    /// New receiver for one topic. Only events published after the call are
    /// delivered.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<BattleEvent> {
        self.channel(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
