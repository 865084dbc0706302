//! Cloneable façade for issuing commands to the runtime.
//!
//! [`CombatHandle`] hides channel plumbing and offers async helpers for
//! acting, driving time and streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use combat_core::{
    AbilityId, ActionOutcome, CombatAction, CombatSnapshot, EntityId, PauseReason, TickReport,
};

use super::errors::{Result, RuntimeError};
use crate::events::{CombatEvent, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct CombatHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl CombatHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Spawns an enemy from `template`, replacing the current one.
    pub async fn start_encounter(&self, template: impl Into<String>) -> Result<EntityId> {
        let template = template.into();
        self.request(|reply| Command::StartEncounter { template, reply })
            .await?
    }

    /// Runs one action. A gate refusal is an `Ok` outcome with `refusal` set.
    pub async fn act(&self, action: CombatAction) -> Result<ActionOutcome> {
        self.request(|reply| Command::Act { action, reply }).await?
    }

    pub async fn hero_attack(&self) -> Result<ActionOutcome> {
        self.act(CombatAction::HeroAttack).await
    }

    pub async fn cast_power(&self, power: impl Into<AbilityId>) -> Result<ActionOutcome> {
        self.act(CombatAction::CastPower(power.into())).await
    }

    pub async fn enemy_attack(&self) -> Result<ActionOutcome> {
        self.act(CombatAction::EnemyAttack).await
    }

    /// Advances the scheduler by hand, as the ticker would.
    pub async fn tick(&self, elapsed_ms: u64) -> Result<TickReport> {
        self.request(|reply| Command::Tick {
            elapsed_ms,
            reply: Some(reply),
        })
        .await?
    }

    // ========================================================================
    // Pause
    // ========================================================================

    /// Requests a pause; returns the reason now in effect.
    pub async fn pause(&self, reason: PauseReason) -> Result<PauseReason> {
        self.request(|reply| Command::Pause { reason, reply }).await
    }

    /// Clears the pause; returns the reason that was cleared.
    pub async fn resume(&self) -> Result<Option<PauseReason>> {
        self.request(|reply| Command::Resume { reply }).await
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub async fn snapshot(&self) -> Result<CombatSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Human-readable combat log, oldest line first.
    pub async fn combat_log(&self) -> Result<Vec<String>> {
        self.request(|reply| Command::Log { reply }).await
    }

    /// Drops the encounter and restores the player.
    pub async fn reset(&self) -> Result<()> {
        self.request(|reply| Command::Reset { reply }).await?
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<CombatEvent> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
