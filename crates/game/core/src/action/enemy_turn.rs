//! Enemy actions: turn upkeep, intent execution, next intent.

use super::ActionContext;
use super::intent::choose_intent;
use super::resolution::Resolution;
use super::strike::strike;
use crate::ability::{AbilityId, EnemyAbilityDefinition, EnemyAbilityKind};
use crate::events::{PresentationEvent, PresentationKind};
use crate::state::{Buff, EnemyIntent, Enrage, StatusEffect};

/// Runs the enemy's previewed action and previews the next one.
pub(crate) fn enemy_attack(res: &mut Resolution, ctx: &mut ActionContext<'_>) {
    let Some(profile) = res.actor.enemy_profile_mut() else {
        tracing::warn!(target: "combat::action", id = %res.actor.id, "enemy action for a non-enemy");
        return;
    };
    let enrage_ended = profile.advance_turn();
    let intent = profile.intent.clone().unwrap_or(EnemyIntent::Attack);
    if enrage_ended {
        res.actor.recompute_stats();
        let line = format!("{} calms down", res.actor.name);
        res.log(line);
    }

    let registry = ctx.registry;
    let attack_delay = ctx.config.attack_delay_ms;
    match intent {
        EnemyIntent::Attack => {
            strike(res, ctx, 1.0, attack_delay);
        }
        EnemyIntent::Ability(id) => match registry.enemy_ability(&id) {
            Some(ability) => use_ability(res, ctx, ability),
            None => {
                tracing::warn!(target: "combat::action", ability = %id, "unknown enemy ability; attacking instead");
                strike(res, ctx, 1.0, attack_delay);
            }
        },
    }

    let next = choose_intent(&res.actor, registry, &mut *ctx.rng);
    if let Some(profile) = res.actor.enemy_profile_mut() {
        profile.intent = Some(next);
    }
}

fn use_ability(res: &mut Resolution, ctx: &mut ActionContext<'_>, ability: &EnemyAbilityDefinition) {
    let config = ctx.config;
    let (actor_id, opponent_id) = (res.actor.id, res.opponent.id);

    if let Some(profile) = res.actor.enemy_profile_mut() {
        if ability.cooldown_turns > 0 {
            profile
                .ability_cooldowns
                .insert(ability.id.clone(), ability.cooldown_turns);
        }
    }
    let line = format!("{} uses {}", res.actor.name, ability.name);
    res.log(line);
    res.emit(
        config,
        config.power_delay_ms,
        PresentationEvent::new(PresentationKind::EnemyAbility(ability.id.clone()), actor_id, opponent_id),
    );

    match &ability.kind {
        EnemyAbilityKind::Strike { multiplier, status } => {
            let report = strike(res, ctx, *multiplier, config.hit_gap_ms);
            if let Some(status) = status {
                if report.landed && res.opponent.health() > 0 && ctx.rng.chance(status.chance) {
                    inflict(res, ctx, status.to_effect(), &ability.id);
                }
            }
        }
        EnemyAbilityKind::MultiHit { hits, multiplier } => {
            for index in 0..(*hits).max(1) {
                if res.opponent.health() <= 0 {
                    break;
                }
                if index > 0 {
                    res.reset_guards();
                }
                strike(res, ctx, *multiplier, config.hit_gap_ms);
            }
        }
        EnemyAbilityKind::Heal { fraction } => {
            let amount = (res.actor.max_health() as f64 * fraction).floor() as i32;
            let healed = res.actor.heal(amount);
            let line = format!("{} recovers {healed} health", res.actor.name);
            res.log(line);
            res.emit(
                config,
                0,
                PresentationEvent::new(PresentationKind::Heal, actor_id, actor_id),
            );
        }
        EnemyAbilityKind::Shield { fraction, duration } => {
            let amount = ((res.actor.max_health() as f64 * fraction).floor() as i32).max(1);
            res.actor.grant_shield(amount, *duration);
            let line = format!("{} raises a {amount} shield", res.actor.name);
            res.log(line);
            res.emit(
                config,
                0,
                PresentationEvent::new(PresentationKind::Shield, actor_id, actor_id),
            );
        }
        EnemyAbilityKind::Enrage { multiplier, turns } => {
            if let Some(profile) = res.actor.enemy_profile_mut() {
                profile.enrage = Some(Enrage {
                    power_multiplier: *multiplier,
                    remaining_turns: *turns,
                });
            }
            res.actor.recompute_stats();
            let line = format!("{} becomes enraged", res.actor.name);
            res.log(line);
        }
        EnemyAbilityKind::Debuff {
            stat,
            multiplier,
            duration,
        } => {
            res.opponent
                .add_buff(Buff::multiplier(*stat, *multiplier, *duration, ability.id.as_str()));
            let line = format!("{}'s {stat} is weakened", res.opponent.name);
            res.log(line);
        }
    }
}

/// Applies a status to the opponent and announces it.
pub(crate) fn inflict(
    res: &mut Resolution,
    ctx: &ActionContext<'_>,
    effect: StatusEffect,
    source: &AbilityId,
) {
    let kind = effect.kind;
    if !res.opponent.status_effects.apply(effect) {
        tracing::debug!(target: "combat::action", %kind, %source, "status slots full; dropped");
        return;
    }
    res.opponent.recompute_stats();
    let line = format!("{} is afflicted with {kind}", res.opponent.name);
    res.log(line);
    let (actor_id, opponent_id) = (res.actor.id, res.opponent.id);
    res.emit(
        ctx.config,
        ctx.config.status_delay_ms,
        PresentationEvent::new(PresentationKind::StatusApplied(kind), actor_id, opponent_id),
    );
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
    use crate::stats::{BaseStats, ResourceKind, StatKind};

    fn create_test_registry() -> AbilityRegistry {
        let mut registry = AbilityRegistry::new();
        registry
            .insert_enemy_ability(EnemyAbilityDefinition {
                id: "frenzy".into(),
                name: "Frenzy".into(),
                kind: EnemyAbilityKind::Enrage {
                    multiplier: 1.5,
                    turns: 2,
                },
                cooldown_turns: 3,
                chance: 1.0,
            })
            .unwrap();
        registry
            .insert_enemy_ability(EnemyAbilityDefinition {
                id: "hex".into(),
                name: "Hex".into(),
                kind: EnemyAbilityKind::Debuff {
                    stat: StatKind::Armor,
                    multiplier: 0.5,
                    duration: 4.0,
                },
                cooldown_turns: 2,
                chance: 1.0,
            })
            .unwrap();
        registry
    }

    fn create_test_resolution(intent: EnemyIntent) -> Resolution {
        let mut profile = EnemyProfile::new("shaman", EnemyTier::Elite, RewardTable::default())
            .with_abilities([AbilityId::from("frenzy"), AbilityId::from("hex")]);
        profile.intent = Some(intent);
        let enemy = Combatant::enemy(EntityId(2), "Shaman", BaseStats::new(80, 10, 0, 100, 0), profile);
        let hero = Combatant::player(
            "Hero",
            BaseStats::new(100, 10, 20, 100, 0),
            ResourceKind::Mana,
            PlayerProfile::new(1, "paladin"),
        );
        Resolution::new(enemy, hero)
    }

    #[test]
    fn enrage_boosts_power_and_starts_cooldown() {
        let registry = create_test_registry();
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

        let mut res = create_test_resolution(EnemyIntent::Ability("frenzy".into()));
        enemy_attack(&mut res, &mut ctx);

        assert_eq!(res.actor.current_stats.power, 15);
        let profile = res.actor.enemy_profile().unwrap();
        assert!(!profile.ability_ready(&"frenzy".into()));
        // Frenzy is cooling down, so the next pick is the hex.
        assert_eq!(profile.intent, Some(EnemyIntent::Ability("hex".into())));
    }

    #[test]
    fn debuff_lands_on_the_player() {
        let registry = create_test_registry();
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

        let mut res = create_test_resolution(EnemyIntent::Ability("hex".into()));
        enemy_attack(&mut res, &mut ctx);
        assert_eq!(res.opponent.current_stats.armor, 10);
        assert!(res.opponent.validate().is_empty());
    }
}
