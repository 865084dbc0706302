//! Condition evaluation against a trigger context.

use super::TriggerContext;
use crate::ability::Condition;
use crate::state::Combatant;

impl Condition {
    pub fn is_met(&self, ctx: &TriggerContext<'_>) -> bool {
        match self {
            Condition::HealthBelow(threshold) => {
                ctx.actor.current_stats.health_fraction() < *threshold
            }
            Condition::HealthAbove(threshold) => {
                ctx.actor.current_stats.health_fraction() > *threshold
            }
            Condition::ResourceBelow(threshold) => {
                ctx.actor.current_stats.resource_fraction() < *threshold
            }
            Condition::ResourceAbove(threshold) => {
                ctx.actor.current_stats.resource_fraction() > *threshold
            }
            Condition::OpponentHealthBelow(threshold) => ctx
                .opponent
                .is_some_and(|opponent| opponent.current_stats.health_fraction() < *threshold),
            Condition::CounterAtLeast { counter, value } => counter_value(ctx.actor, counter) >= *value,
            Condition::WasCritical => ctx.is_crit,
            Condition::HasStatus {
                status,
                on_opponent,
            } => {
                let target = if *on_opponent {
                    ctx.opponent
                } else {
                    Some(ctx.actor)
                };
                target.is_some_and(|c| c.status_effects.has(*status))
            }
            Condition::All(conditions) => conditions.iter().all(|c| c.is_met(ctx)),
            Condition::Any(conditions) => conditions.iter().any(|c| c.is_met(ctx)),
            Condition::Not(condition) => !condition.is_met(ctx),
        }
    }
}

fn counter_value(actor: &Combatant, counter: &str) -> i64 {
    if counter == Condition::COMBO_COUNTER {
        if let Some(profile) = actor.player_profile() {
            return profile.combo.count as i64;
        }
    }
    actor.counter(counter)
}
