//! Precondition checks run before any mutation.

use super::{ActionContext, CombatAction};
use crate::ability::{AbilityId, PowerCategory};
use crate::combat::sacrifice_cost;
use crate::error::{CombatFault, ErrorSeverity};
use crate::state::Combatant;

/// Why an action was refused. Refused actions mutate nothing.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GateRefusal {
    #[error("combat is paused")]
    Paused,

    #[error("actor is already dying")]
    ActorDying,

    #[error("opponent is already dying")]
    OpponentDying,

    #[error("unknown power `{0}`")]
    UnknownPower(AbilityId),

    #[error("{power} is on cooldown for {remaining:.1}s")]
    OnCooldown { power: AbilityId, remaining: f64 },

    #[error("not enough resource: need {needed:.0}, have {available:.0}")]
    InsufficientResource { needed: f64, available: f64 },

    #[error("not enough health: need more than {needed}, have {available}")]
    InsufficientHealth { needed: i32, available: i32 },
}

impl CombatFault for GateRefusal {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Paused | Self::OnCooldown { .. } | Self::InsufficientResource { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::ActorDying
            | Self::OpponentDying
            | Self::UnknownPower(_)
            | Self::InsufficientHealth { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Paused => "GATE_PAUSED",
            Self::ActorDying => "GATE_ACTOR_DYING",
            Self::OpponentDying => "GATE_OPPONENT_DYING",
            Self::UnknownPower(_) => "GATE_UNKNOWN_POWER",
            Self::OnCooldown { .. } => "GATE_ON_COOLDOWN",
            Self::InsufficientResource { .. } => "GATE_INSUFFICIENT_RESOURCE",
            Self::InsufficientHealth { .. } => "GATE_INSUFFICIENT_HEALTH",
        }
    }
}

/// Result of a passed gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    /// Actor is stunned: run pre-effects only.
    Stunned,
}

/// Checks whether `actor` may perform `action` against `opponent`.
///
/// Order: pause, dying flags, power requirements, stun.
pub fn check(
    action: &CombatAction,
    actor: &Combatant,
    opponent: &Combatant,
    ctx: &ActionContext<'_>,
) -> Result<GateDecision, GateRefusal> {
    if ctx.paused {
        return Err(GateRefusal::Paused);
    }
    if actor.is_dying {
        return Err(GateRefusal::ActorDying);
    }
    if opponent.is_dying {
        return Err(GateRefusal::OpponentDying);
    }

    if let CombatAction::CastPower(id) = action {
        check_power(id, actor, ctx)?;
    }

    if actor.is_stunned() {
        return Ok(GateDecision::Stunned);
    }
    Ok(GateDecision::Proceed)
}

fn check_power(id: &AbilityId, actor: &Combatant, ctx: &ActionContext<'_>) -> Result<(), GateRefusal> {
    let power = ctx
        .registry
        .power(id)
        .ok_or_else(|| GateRefusal::UnknownPower(id.clone()))?;

    let remaining = actor.cooldown(id);
    if remaining > 0.0 {
        return Err(GateRefusal::OnCooldown {
            power: id.clone(),
            remaining,
        });
    }

    let tuning = ctx.registry.power_tuning(&actor.owned_abilities, Some(id));
    let needed = tuning.cost_of(power);
    if actor.resource() + f64::EPSILON < needed {
        return Err(GateRefusal::InsufficientResource {
            needed,
            available: actor.resource(),
        });
    }

    if let PowerCategory::Sacrifice { health_percent } = power.category {
        let needed = sacrifice_cost(actor.max_health(), health_percent);
        if actor.health() <= needed {
            return Err(GateRefusal::InsufficientHealth {
                needed,
                available: actor.health(),
            });
        }
    }

    Ok(())
}
