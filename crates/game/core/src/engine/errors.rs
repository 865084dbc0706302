//! Errors surfaced by the combat engine.

use super::EnginePhase;
use crate::ability::RegistryError;
use crate::error::{CombatFault, ErrorSeverity};

/// Why the engine could not take a call.
///
/// Gate refusals (cooldown, cost, pause) are not errors; they come back
/// inside the [`ActionOutcome`](crate::action::ActionOutcome).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CombatError {
    #[error("engine is busy ({})", phase.as_str())]
    NotIdle { phase: EnginePhase },

    #[error("invalid phase transition {} -> {}", from.as_str(), to.as_str())]
    InvalidTransition { from: EnginePhase, to: EnginePhase },

    #[error("no active encounter")]
    NoEncounter,

    #[error("player is defeated")]
    PlayerDefeated,

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl CombatFault for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotIdle { .. } => ErrorSeverity::Recoverable,
            Self::NoEncounter | Self::PlayerDefeated | Self::Registry(_) => {
                ErrorSeverity::Validation
            }
            Self::InvalidTransition { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotIdle { .. } => "ENGINE_NOT_IDLE",
            Self::InvalidTransition { .. } => "ENGINE_INVALID_TRANSITION",
            Self::NoEncounter => "ENGINE_NO_ENCOUNTER",
            Self::PlayerDefeated => "ENGINE_PLAYER_DEFEATED",
            Self::Registry(err) => err.error_code(),
        }
    }
}
