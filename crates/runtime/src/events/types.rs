use serde::{Deserialize, Serialize};

use combat_core::{
    ActionOutcome, CombatAction, CombatSnapshot, EntityId, GateRefusal, PauseReason,
    PresentationEvent, RewardSignal,
};

use super::Topic;

/// Notification published by the combat worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CombatEvent {
    EncounterStarted {
        enemy: EntityId,
        template: String,
        clock_ms: u64,
    },
    /// An action resolved and was committed.
    ActionResolved {
        action: CombatAction,
        outcome: Box<ActionOutcome>,
        clock_ms: u64,
    },
    /// The gate refused an action; nothing changed.
    ActionRefused {
        action: CombatAction,
        refusal: GateRefusal,
        clock_ms: u64,
    },
    /// Scheduler lines produced by a tick (status expiry, shields, regen).
    Ticked { logs: Vec<String>, clock_ms: u64 },
    /// Presentation beats whose delay has elapsed, in play order.
    Presentation(Vec<PresentationEvent>),
    EnemyReaped { enemy: EntityId, clock_ms: u64 },
    RewardGranted(RewardSignal),
    PlayerDefeated { clock_ms: u64 },
    Paused(PauseReason),
    Resumed(PauseReason),
    /// Emitted only when the snapshot digest differs from the last one sent.
    StateChanged {
        root: [u8; 32],
        snapshot: Box<CombatSnapshot>,
    },
}

impl CombatEvent {
    pub fn topic(&self) -> Topic {
        match self {
            CombatEvent::EncounterStarted { .. }
            | CombatEvent::ActionResolved { .. }
            | CombatEvent::ActionRefused { .. }
            | CombatEvent::Ticked { .. }
            | CombatEvent::Presentation(_)
            | CombatEvent::EnemyReaped { .. }
            | CombatEvent::PlayerDefeated { .. } => Topic::Combat,
            CombatEvent::RewardGranted(_) => Topic::Rewards,
            CombatEvent::Paused(_) | CombatEvent::Resumed(_) | CombatEvent::StateChanged { .. } => {
                Topic::State
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CombatEvent::EncounterStarted { .. } => "encounter_started",
            CombatEvent::ActionResolved { .. } => "action_resolved",
            CombatEvent::ActionRefused { .. } => "action_refused",
            CombatEvent::Ticked { .. } => "ticked",
            CombatEvent::Presentation(_) => "presentation",
            CombatEvent::EnemyReaped { .. } => "enemy_reaped",
            CombatEvent::RewardGranted(_) => "reward_granted",
            CombatEvent::PlayerDefeated { .. } => "player_defeated",
            CombatEvent::Paused(_) => "paused",
            CombatEvent::Resumed(_) => "resumed",
            CombatEvent::StateChanged { .. } => "state_changed",
        }
    }
}
