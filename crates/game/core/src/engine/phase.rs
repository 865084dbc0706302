use super::CombatError;

/// Where the engine is inside one call.
///
/// ```text
/// Idle → Resolving → Emitting → Idle
/// ```
///
/// Anything arriving while the engine is not `Idle` is refused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnginePhase {
    #[default]
    Idle,
    Resolving,
    Emitting,
}

impl EnginePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnginePhase::Idle => "idle",
            EnginePhase::Resolving => "resolving",
            EnginePhase::Emitting => "emitting",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EnginePhase::Idle)
    }

    /// Moves to `next`, rejecting any edge outside the cycle.
    ///
    /// `Resolving → Idle` is allowed for refused actions that have nothing
    /// to emit.
    pub fn advance(self, next: EnginePhase) -> Result<EnginePhase, CombatError> {
        use EnginePhase::*;
        match (self, next) {
            (Idle, Resolving) | (Resolving, Emitting) | (Resolving, Idle) | (Emitting, Idle) => {
                Ok(next)
            }
            (Idle, _) => Err(CombatError::InvalidTransition {
                from: self,
                to: next,
            }),
            _ => Err(CombatError::NotIdle { phase: self }),
        }
    }
}
