//! Terminal check: the once-only defeated transition.

use super::ActionContext;
use super::resolution::{Reaction, Resolution, Side};
use crate::ability::TriggerKind;
use crate::events::{PresentationEvent, PresentationKind};
use crate::rewards::roll_rewards;

/// Moves every combatant at or below zero health into the dying state.
///
/// Only the caller that wins the [`DeathGuard`](crate::death::DeathGuard)
/// claim logs the defeat, rolls rewards and fires `on_kill`. A losing caller
/// still settles the snapshot it holds so both agree on the post-state.
pub(crate) fn settle(res: &mut Resolution, ctx: &mut ActionContext<'_>) {
    for side in [Side::Opponent, Side::Actor] {
        let combatant = res.side(side);
        if combatant.is_dying || combatant.health() > 0 {
            continue;
        }
        let id = combatant.id;
        let claimed = ctx.guard.try_claim(id);

        let combatant = res.side_mut(side);
        combatant.is_dying = true;
        combatant.settle_health();
        if !claimed {
            continue;
        }
        let is_player = combatant.is_player();
        let name = combatant.name.clone();

        tracing::info!(target: "combat::death", %id, %name, "combatant defeated");
        res.mark_lethal(id);
        res.log(format!("{name} is defeated"));
        let killer = match side {
            Side::Actor => Side::Opponent,
            Side::Opponent => Side::Actor,
        };
        let killer_id = res.side(killer).id;
        res.emit(
            ctx.config,
            ctx.config.death_delay_ms,
            PresentationEvent::new(PresentationKind::Death, killer_id, id),
        );

        if is_player {
            res.player_defeated = true;
        } else {
            let fortune = res.side(killer).current_stats.fortune;
            res.rewards = roll_rewards(res.side(side), fortune, ctx.config, &mut *ctx.rng);
        }

        if !res.side(killer).is_dying {
            res.react(
                killer,
                Reaction::new(TriggerKind::OnKill),
                ctx.registry,
                ctx.config,
                &mut *ctx.rng,
            );
            res.side_mut(side).settle_health();
        }
    }
}
