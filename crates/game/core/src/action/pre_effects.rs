//! Start-of-action upkeep for the acting combatant.

use super::ActionContext;
use super::resolution::{Reaction, Resolution, Side};
use crate::ability::TriggerKind;
use crate::events::{PresentationEvent, PresentationKind};

/// Ticks statuses, expires spent buffs and fires `turn_start`.
///
/// Status damage bypasses shields.
pub(crate) fn run(res: &mut Resolution, ctx: &mut ActionContext<'_>) {
    let config = ctx.config;
    let tick = res.actor.status_effects.tick();

    for (kind, damage) in &tick.damage {
        res.actor.lose_health(*damage);
        let (id, name) = (res.actor.id, res.actor.name.clone());
        res.log(format!("{name} takes {damage} {kind} damage"));
        res.emit(
            config,
            config.status_delay_ms,
            PresentationEvent::new(PresentationKind::StatusTick(*kind), id, id).with_damage(*damage),
        );
    }
    for kind in &tick.expired {
        let name = res.actor.name.clone();
        res.log(format!("{kind} on {name} wears off"));
    }

    let buffs_before = res.actor.active_buffs.len();
    res.actor.active_buffs.retain(|buff| !buff.is_expired());
    if !tick.expired.is_empty() || res.actor.active_buffs.len() != buffs_before {
        res.actor.recompute_stats();
    }

    if res.actor.health() > 0 {
        res.react(
            Side::Actor,
            Reaction::new(TriggerKind::TurnStart),
            ctx.registry,
            config,
            &mut *ctx.rng,
        );
    }
}
