//! Auto-attacks and the shared on-hit reaction chain.

use super::ActionContext;
use super::resolution::{Reaction, Resolution, Side};
use crate::ability::TriggerKind;
use crate::combat::{DamageApplied, apply_damage, check_dodge, roll_attack};
use crate::events::{PresentationEvent, PresentationKind};

/// Counter incremented on each dodge and reset by any landed hit.
pub const DODGE_COUNTER: &str = "consecutive_dodges";

/// Result of one auto-attack swing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct StrikeReport {
    pub landed: bool,
    pub damage: i32,
    pub is_crit: bool,
}

/// Player auto-attack.
pub(crate) fn hero_attack(res: &mut Resolution, ctx: &mut ActionContext<'_>) {
    let gap = ctx.config.attack_delay_ms;
    strike(res, ctx, 1.0, gap);
}

/// One auto-attack swing from the actor at `multiplier × power`.
///
/// Roll order: dodge, variance, crit. A dodge consumes no attack modifiers.
pub(crate) fn strike(
    res: &mut Resolution,
    ctx: &mut ActionContext<'_>,
    multiplier: f64,
    gap_ms: u64,
) -> StrikeReport {
    let config = ctx.config;
    let (actor_id, opponent_id) = (res.actor.id, res.opponent.id);

    if check_dodge(
        config,
        res.actor.current_stats.speed,
        res.opponent.current_stats.speed,
        &mut *ctx.rng,
    ) {
        res.opponent.increment_counter(DODGE_COUNTER);
        let line = format!("{} dodges {}'s attack", res.opponent.name, res.actor.name);
        res.log(line);
        res.emit(
            config,
            gap_ms,
            PresentationEvent::new(PresentationKind::Dodge, opponent_id, actor_id),
        );
        res.react(
            Side::Opponent,
            Reaction::new(TriggerKind::OnDodge),
            ctx.registry,
            config,
            &mut *ctx.rng,
        );
        return StrikeReport::default();
    }

    let boosts = res.actor.attack_modifiers.consume();
    let roll = roll_attack(
        &res.actor.current_stats,
        res.opponent.current_stats.armor,
        res.opponent.is_shielded(),
        multiplier,
        boosts,
        config,
        &mut *ctx.rng,
    );

    let line = format!(
        "{} {} {} for {}",
        res.actor.name,
        if roll.is_crit { "critically hits" } else { "hits" },
        res.opponent.name,
        roll.damage
    );
    res.log(line);
    res.emit(
        config,
        gap_ms,
        PresentationEvent::new(PresentationKind::Attack, actor_id, opponent_id)
            .with_damage(roll.damage)
            .with_crit(roll.is_crit),
    );

    if boosts.lifesteal > 0.0 {
        let healed = res
            .actor
            .heal((roll.damage as f64 * boosts.lifesteal).floor() as i32);
        if healed > 0 {
            let line = format!("{} drains {healed} health", res.actor.name);
            res.log(line);
        }
    }

    land_hit(res, ctx, roll.damage, roll.is_crit);

    StrikeReport {
        landed: true,
        damage: roll.damage,
        is_crit: roll.is_crit,
    }
}

/// Applies a landed hit from the actor and runs the reaction chain.
///
/// Order: shield then health, resource gains, attacker `on_hit` / `on_crit`,
/// defender `on_damaged`, reflect.
pub(crate) fn land_hit(
    res: &mut Resolution,
    ctx: &mut ActionContext<'_>,
    damage: i32,
    is_crit: bool,
) -> DamageApplied {
    let config = ctx.config;
    let applied = apply_damage(&mut res.opponent, damage);
    if applied.absorbed > 0 {
        let line = format!("{}'s shield absorbs {}", res.opponent.name, applied.absorbed);
        res.log(line);
    }
    res.opponent.reset_counter(DODGE_COUNTER);

    let on_hit = config.resources.get(res.actor.resource_kind).gain_on_hit;
    res.actor.restore_resource(on_hit);
    let on_damaged = config.resources.get(res.opponent.resource_kind).gain_on_damaged;
    res.opponent.restore_resource(on_damaged);

    let hit = Reaction::new(TriggerKind::OnHit)
        .with_damage(damage)
        .critical(is_crit);
    res.react(Side::Actor, hit, ctx.registry, config, &mut *ctx.rng);
    if is_crit {
        let crit = Reaction::new(TriggerKind::OnCrit)
            .with_damage(damage)
            .critical(true);
        res.react(Side::Actor, crit, ctx.registry, config, &mut *ctx.rng);
    }

    let damaged = Reaction::new(TriggerKind::OnDamaged)
        .with_damage(damage)
        .critical(is_crit);
    let reflected = res.react(Side::Opponent, damaged, ctx.registry, config, &mut *ctx.rng);
    res.reflect(Side::Opponent, reflected, config);

    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{
        AbilityDefinition, AbilityRegistry, DamageModifierKind, Effect, EffectPayload,
    };
    use crate::config::CombatConfig;
    use crate::death::DeathGuard;
    use crate::env::ScriptedRng;
    use crate::state::{
        AttackModifier, AttackModifierKind, Combatant, EnemyProfile, EnemyTier, EntityId,
        PlayerProfile, RewardTable,
    };
    use crate::stats::{BaseStats, ResourceKind};

    fn create_test_pair(hero_speed: i32, enemy_speed: i32) -> Resolution {
        let hero = Combatant::player(
            "Hero",
            BaseStats::new(100, 20, 0, hero_speed, 100).with_resource(0.0),
            ResourceKind::Fury,
            PlayerProfile::new(1, "berserker"),
        );
        let enemy = Combatant::enemy(
            EntityId(1),
            "Bandit",
            BaseStats::new(100, 10, 10, enemy_speed, 0),
            EnemyProfile::new("bandit", EnemyTier::Normal, RewardTable::default()),
        );
        Resolution::new(hero, enemy)
    }

    fn thorns_registry() -> AbilityRegistry {
        let mut registry = AbilityRegistry::new();
        registry
            .insert_ability(AbilityDefinition::new(
                "thorns",
                "Thorns",
                vec![Effect::new(
                    TriggerKind::OnDamaged,
                    EffectPayload::DamageModifier {
                        kind: DamageModifierKind::Reflect,
                        fraction: 0.5,
                    },
                )],
            ))
            .unwrap();
        registry
    }

    #[test]
    fn landed_hit_grants_fury_and_reflects() {
        let registry = thorns_registry();
        let config = CombatConfig::deterministic();
        let mut rng = ScriptedRng::constant(0.5);
        let mut guard = DeathGuard::new();
        let mut ctx = ActionContext {
            registry: &registry,
            config: &config,
            rng: &mut rng,
            guard: &mut guard,
            paused: false,
        };

        let mut res = create_test_pair(100, 100);
        res.opponent.acquire("thorns".into());
        let report = strike(&mut res, &mut ctx, 1.0, 0);

        assert!(report.landed);
        assert_eq!(report.damage, 15);
        assert_eq!(res.opponent.health(), 85);
        assert_eq!(res.actor.health(), 93);
        assert_eq!(res.actor.resource(), 5.0);
    }

    #[test]
    fn dodge_counts_and_keeps_modifiers() {
        let registry = AbilityRegistry::new();
        let config = CombatConfig::new();
        // Dodge chance (200 − 100) × 0.005 = 0.5; 0.1 dodges.
        let mut rng = ScriptedRng::new([0.1]);
        let mut guard = DeathGuard::new();
        let mut ctx = ActionContext {
            registry: &registry,
            config: &config,
            rng: &mut rng,
            guard: &mut guard,
            paused: false,
        };

        let mut res = create_test_pair(100, 200);
        res.actor
            .attack_modifiers
            .grant(AttackModifier::new(AttackModifierKind::GuaranteedCrit, 1, "ambush"));
        let report = strike(&mut res, &mut ctx, 1.0, 0);

        assert!(!report.landed);
        assert_eq!(res.opponent.counter(DODGE_COUNTER), 1);
        assert_eq!(res.actor.attack_modifiers.len(), 1);
        assert_eq!(res.opponent.health(), 100);
    }
}
