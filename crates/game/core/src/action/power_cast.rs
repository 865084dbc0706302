//! Activated power casts.

use super::ActionContext;
use super::enemy_turn::inflict;
use super::resolution::{Reaction, Resolution, Side};
use super::strike::land_hit;
use crate::ability::{AbilityId, PowerCategory, PowerDefinition, TriggerKind};
use crate::combat::{
    execute_multiplier, power_damage, power_output, sacrifice_cost, split_hits,
};
use crate::events::{PresentationEvent, PresentationKind};
use crate::state::Buff;

/// Casts `id`. Cost, cooldown and health requirements were checked by the gate.
///
/// Order: pay cost, pay sacrifice, start cooldown, register combo,
/// `on_power_use`, category effect, status rider.
pub(crate) fn cast_power(res: &mut Resolution, ctx: &mut ActionContext<'_>, id: &AbilityId) {
    let registry = ctx.registry;
    let config = ctx.config;
    let Some(power) = registry.power(id) else {
        tracing::warn!(target: "combat::action", power = %id, "unknown power; skipping cast");
        return;
    };

    let tuning = registry.power_tuning(&res.actor.owned_abilities, Some(id));
    if !res.actor.spend_resource(tuning.cost_of(power)) {
        return;
    }
    if let PowerCategory::Sacrifice { health_percent } = power.category {
        let paid = res
            .actor
            .lose_health(sacrifice_cost(res.actor.max_health(), health_percent));
        let line = format!("{} sacrifices {paid} health", res.actor.name);
        res.log(line);
    }
    res.actor.start_cooldown(id, tuning.cooldown_of(power));

    let combo = register_combo(res, ctx, id);
    let (actor_id, opponent_id) = (res.actor.id, res.opponent.id);
    let line = format!("{} casts {}", res.actor.name, power.name);
    res.log(line);
    res.emit(
        config,
        config.power_delay_ms,
        PresentationEvent::new(PresentationKind::PowerCast(id.clone()), actor_id, opponent_id),
    );
    res.react(
        Side::Actor,
        Reaction::new(TriggerKind::OnPowerUse).with_power(id),
        registry,
        config,
        &mut *ctx.rng,
    );

    let output = power_output(res.actor.current_stats.power, power.value, combo, tuning.damage);
    match &power.category {
        category if category.deals_damage() => {
            strike_with_power(res, ctx, power, output);
        }
        PowerCategory::Heal => {
            let healed = res.actor.heal(output);
            let line = format!("{} heals for {healed}", res.actor.name);
            res.log(line);
            res.emit(
                config,
                0,
                PresentationEvent::new(PresentationKind::Heal, actor_id, actor_id),
            );
        }
        PowerCategory::Buff {
            stat,
            multiplier,
            duration,
        } => {
            res.actor
                .add_buff(Buff::multiplier(*stat, *multiplier, *duration, id.as_str()));
            let line = format!("{}'s {stat} rises", res.actor.name);
            res.log(line);
        }
        PowerCategory::Barrier { duration } => {
            let amount = output.max(1);
            res.actor.grant_shield(amount, *duration);
            let line = format!("{} raises a {amount} barrier", res.actor.name);
            res.log(line);
            res.emit(
                config,
                0,
                PresentationEvent::new(PresentationKind::Shield, actor_id, actor_id),
            );
        }
        _ => {}
    }
}

fn strike_with_power(
    res: &mut Resolution,
    ctx: &mut ActionContext<'_>,
    power: &PowerDefinition,
    output: i32,
) {
    let config = ctx.config;
    let (actor_id, opponent_id) = (res.actor.id, res.opponent.id);
    let execute = execute_multiplier(&power.category, res.opponent.current_stats.health_fraction());
    let total = power_damage(
        output,
        execute,
        res.opponent.current_stats.armor,
        res.opponent.is_shielded(),
    );

    for (index, damage) in split_hits(total, power.category.hits()).into_iter().enumerate() {
        if res.opponent.health() <= 0 {
            break;
        }
        if index > 0 {
            res.reset_guards();
        }
        let line = format!("{} hits {} for {damage}", power.name, res.opponent.name);
        res.log(line);
        res.emit(
            config,
            if index == 0 { 0 } else { config.hit_gap_ms },
            PresentationEvent::new(PresentationKind::PowerHit(power.id.clone()), actor_id, opponent_id)
                .with_damage(damage)
                .with_crit(false),
        );
        land_hit(res, ctx, damage, false);
    }

    if let Some(status) = &power.status {
        if res.opponent.health() > 0 && ctx.rng.chance(status.chance) {
            inflict(res, ctx, status.to_effect(), &power.id);
        }
    }
}

/// Registers the cast with the combo tracker and returns the damage multiplier.
fn register_combo(res: &mut Resolution, ctx: &ActionContext<'_>, id: &AbilityId) -> f64 {
    let config = ctx.config;
    let Some(profile) = res.actor.player_profile_mut() else {
        return 1.0;
    };
    if !profile.combo_enabled {
        return 1.0;
    }
    let before = profile.combo.count;
    let count = profile.combo.register(id, config.max_combo);
    let multiplier = profile.combo.multiplier(config.combo_step);
    if count > before {
        let line = format!("{} combo x{count}", res.actor.name);
        res.log(line);
    }
    multiplier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::AbilityRegistry;
    use crate::config::CombatConfig;
    use crate::death::DeathGuard;
    use crate::env::ScriptedRng;
    use crate::state::{
        Combatant, EnemyProfile, EnemyTier, EntityId, PlayerProfile, RewardTable,
    };
    use crate::stats::{BaseStats, ResourceKind};

    fn power(id: &str, value: f64, category: PowerCategory) -> PowerDefinition {
        PowerDefinition {
            id: id.into(),
            name: id.into(),
            cost: 10.0,
            cooldown: 3.0,
            value,
            category,
            status: None,
        }
    }

    fn create_test_registry() -> AbilityRegistry {
        let mut registry = AbilityRegistry::new();
        registry
            .insert_power(power("bolt", 2.0, PowerCategory::Strike))
            .unwrap();
        registry
            .insert_power(power("flurry", 2.0, PowerCategory::MultiHit { hits: 3 }))
            .unwrap();
        registry
            .insert_power(power(
                "blood_pact",
                3.0,
                PowerCategory::Sacrifice {
                    health_percent: 0.1,
                },
            ))
            .unwrap();
        registry
    }

    fn create_test_resolution(combo: bool) -> Resolution {
        let profile = if combo {
            PlayerProfile::new(1, "monk").with_combo()
        } else {
            PlayerProfile::new(1, "mage")
        };
        let hero = Combatant::player(
            "Hero",
            BaseStats::new(100, 10, 0, 100, 100),
            ResourceKind::Mana,
            profile,
        );
        let enemy = Combatant::enemy(
            EntityId(1),
            "Dummy",
            BaseStats::new(200, 1, 0, 100, 0),
            EnemyProfile::new("dummy", EnemyTier::Normal, RewardTable::default()),
        );
        Resolution::new(hero, enemy)
    }

    macro_rules! with_ctx {
        ($registry:expr, $ctx:ident, $body:block) => {{
            let config = CombatConfig::deterministic();
            let mut rng = ScriptedRng::constant(0.5);
            let mut guard = DeathGuard::new();
            let mut $ctx = ActionContext {
                registry: &$registry,
                config: &config,
                rng: &mut rng,
                guard: &mut guard,
                paused: false,
            };
            $body
        }};
    }

    #[test]
    fn strike_power_on_unarmored_target() {
        let registry = create_test_registry();
        let mut res = create_test_resolution(false);
        with_ctx!(registry, ctx, {
            cast_power(&mut res, &mut ctx, &"bolt".into());
        });
        assert_eq!(res.opponent.health(), 180);
        assert_eq!(res.actor.resource(), 90.0);
        assert_eq!(res.actor.cooldown(&"bolt".into()), 3.0);
    }

    #[test]
    fn multi_hit_splits_damage() {
        let registry = create_test_registry();
        let mut res = create_test_resolution(false);
        with_ctx!(registry, ctx, {
            cast_power(&mut res, &mut ctx, &"flurry".into());
        });
        let hits: Vec<i32> = res
            .events
            .iter()
            .filter(|e| matches!(e.kind, PresentationKind::PowerHit(_)))
            .filter_map(|e| e.damage)
            .collect();
        assert_eq!(hits, vec![7, 7, 6]);
        assert_eq!(res.opponent.health(), 180);
    }

    #[test]
    fn sacrifice_pays_health_first() {
        let registry = create_test_registry();
        let mut res = create_test_resolution(false);
        with_ctx!(registry, ctx, {
            cast_power(&mut res, &mut ctx, &"blood_pact".into());
        });
        assert_eq!(res.actor.health(), 90);
        assert_eq!(res.opponent.health(), 170);
    }

    #[test]
    fn alternating_powers_build_combo() {
        let registry = create_test_registry();
        let mut res = create_test_resolution(true);
        with_ctx!(registry, ctx, {
            cast_power(&mut res, &mut ctx, &"bolt".into());
            cast_power(&mut res, &mut ctx, &"flurry".into());
        });
        // bolt: 20, flurry: floor(10 × 2.0 × 1.1) = 22.
        assert_eq!(res.opponent.health(), 158);
        assert_eq!(res.actor.player_profile().unwrap().combo.count, 1);
    }
}
