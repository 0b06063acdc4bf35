//! Event consumers that narrate a running battle.

use async_trait::async_trait;
use battle_core::BattleEvent;

/// Receives every event a session drains, in order and without loss.
///
/// The sink runs inside the battle loop, unlike bus subscribers, so it is
/// meant for logging and recording rather than heavy work.
#[async_trait]
pub trait PresentationSink: Send {
    async fn present(&mut self, event: &BattleEvent);
}

/// Narrates the battle through structured tracing logs. Combat beats log
/// at info, cursor and menu chatter at debug.
#[derive(Debug, Default)]
pub struct TracingSink;

#[async_trait]
impl PresentationSink for TracingSink {
    async fn present(&mut self, event: &BattleEvent) {
        match event {
            BattleEvent::RoundBegan { round } => tracing::info!(round, "round began"),
            BattleEvent::TurnBegan { entity } => tracing::info!(%entity, "turn began"),
            BattleEvent::UnitMoved { entity, from, to } => {
                tracing::info!(%entity, ?from, ?to, "unit moved");
            }
            BattleEvent::AbilityAnnounced { entity, ability } => {
                tracing::info!(%entity, %ability, "ability announced");
            }
            BattleEvent::EffectApplied {
                entity,
                change,
                knocked_out,
            } => {
                tracing::info!(%entity, ?change, knocked_out, "effect applied");
            }
            BattleEvent::EffectMissed {
                entity,
                chance,
                roll,
            } => {
                tracing::info!(%entity, chance, roll, "effect missed");
            }
            BattleEvent::StatusAttached { entity, status } => {
                tracing::info!(%entity, %status, "status attached");
            }
            BattleEvent::ScriptPageShown { page } => tracing::info!(%page, "script page"),
            BattleEvent::ExperienceAwarded { entity, amount } => {
                tracing::info!(%entity, amount, "experience awarded");
            }
            BattleEvent::BattleEnded { victor } => tracing::info!(?victor, "battle ended"),
            _ => tracing::debug!(?event, "battle event"),
        }
    }
}
