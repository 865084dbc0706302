use super::{ResolutionGuard, TriggerContext, TriggerResult};
use crate::ability::{
    AbilityRegistry, CounterOp, DamageModifierKind, Effect, EffectPayload, TriggerKind,
};
use crate::env::CombatRoller;
use crate::state::{AttackModifier, Buff, Combatant, StatusEffect, effect_key};
use crate::stats::StatModifier;

/// Evaluates owned abilities against a trigger and aggregates their effects.
pub struct TriggerProcessor<'a> {
    registry: &'a AbilityRegistry,
}

impl<'a> TriggerProcessor<'a> {
    pub fn new(registry: &'a AbilityRegistry) -> Self {
        Self { registry }
    }

    /// Processes `trigger` for `ctx.actor`.
    ///
    /// For each owned ability in acquisition order, each matching effect is
    /// checked against its condition, then its internal cooldown (started on
    /// pass), then its proc chance. Fired payloads accumulate into one result.
    pub fn process(
        &self,
        trigger: TriggerKind,
        ctx: &TriggerContext<'_>,
        rng: &mut dyn CombatRoller,
    ) -> TriggerResult {
        let mut result = TriggerResult::empty(ctx.actor.clone());
        if trigger == TriggerKind::Passive {
            return result;
        }

        for ability_id in &ctx.actor.owned_abilities {
            let Some(ability) = self.registry.ability(ability_id) else {
                tracing::warn!(
                    target: "combat::trigger",
                    ability = %ability_id,
                    actor = %ctx.actor.id,
                    "unknown ability id; skipping"
                );
                continue;
            };

            let mut fired = false;
            for (index, effect) in ability.effects_for(trigger) {
                if let Some(condition) = &effect.condition {
                    if !condition.is_met(ctx) {
                        continue;
                    }
                }

                if let Some(icd) = effect.internal_cooldown {
                    let key = effect_key(ability_id, index);
                    if result.actor.internal_cooldown(&key) > 0.0 {
                        continue;
                    }
                    if icd > 0.0 {
                        result.actor.internal_cooldowns.insert(key, icd);
                    }
                }

                if !rng.chance(effect.chance.unwrap_or(1.0)) {
                    continue;
                }

                tracing::debug!(
                    target: "combat::trigger",
                    %trigger,
                    ability = %ability_id,
                    actor = %ctx.actor.id,
                    "effect fired"
                );
                self.apply(effect, ability_id.as_str(), &ability.name, ctx, rng, &mut result);
                fired = true;
            }

            if fired {
                result.fired.push(ability_id.clone());
            }
        }

        result
    }

    /// Like [`process`](Self::process) but fires at most once per trigger per guard.
    pub fn process_guarded(
        &self,
        trigger: TriggerKind,
        ctx: &TriggerContext<'_>,
        guard: &mut ResolutionGuard,
        rng: &mut dyn CombatRoller,
    ) -> TriggerResult {
        if !guard.enter(trigger) {
            tracing::debug!(target: "combat::trigger", %trigger, "cascade bound reached");
            return TriggerResult::empty(ctx.actor.clone());
        }
        self.process(trigger, ctx, rng)
    }

    fn apply(
        &self,
        effect: &Effect,
        source: &str,
        name: &str,
        ctx: &TriggerContext<'_>,
        rng: &mut dyn CombatRoller,
        result: &mut TriggerResult,
    ) {
        let context_damage = ctx.damage.unwrap_or(0).max(0) as f64;
        let stats = &ctx.actor.current_stats;

        match &effect.payload {
            EffectPayload::StatModifier {
                stat,
                bonus,
                duration,
            } => {
                match duration {
                    Some(seconds) => result
                        .actor
                        .add_buff(Buff::new(*stat, *bonus, *seconds, source)),
                    None => result
                        .actor
                        .add_modifier(StatModifier::new(*stat, *bonus, source)),
                }
                result.logs.push(format!("{name}: {stat} changed"));
            }
            EffectPayload::PowerModifier(_) => {
                tracing::debug!(
                    target: "combat::trigger",
                    ability = source,
                    "power modifiers only apply passively"
                );
            }
            EffectPayload::DamageModifier { kind, fraction } => {
                let amount = (context_damage * fraction).floor() as i32;
                if amount <= 0 {
                    return;
                }
                match kind {
                    DamageModifierKind::Reflect => {
                        result.reflected_damage += amount;
                        result.logs.push(format!("{name} reflects {amount} damage"));
                    }
                    DamageModifierKind::Lifesteal | DamageModifierKind::ConvertHeal => {
                        result.heal_amount += amount;
                        result.logs.push(format!("{name} restores {amount} health"));
                    }
                    DamageModifierKind::BonusDamage => {
                        result.damage_amount += amount;
                        result.logs.push(format!("{name} deals {amount} bonus damage"));
                    }
                }
            }
            EffectPayload::StatusApplication(application) => {
                if rng.chance(application.chance) {
                    result.status_to_apply.push(StatusEffect::new(
                        application.status,
                        application.damage,
                        application.turns,
                    ));
                    result
                        .logs
                        .push(format!("{name} inflicts {}", application.status));
                }
            }
            EffectPayload::Heal(magnitude) => {
                let amount = magnitude.resolve(stats.max_health, stats.power);
                result.heal_amount += amount;
                result.logs.push(format!("{name} restores {amount} health"));
            }
            EffectPayload::Damage(magnitude) => {
                let amount = magnitude.resolve(stats.max_health, stats.power);
                result.damage_amount += amount;
                result.logs.push(format!("{name} deals {amount} damage"));
            }
            EffectPayload::ManaRestore(amount) => {
                result.mana_restored += amount.max(0.0);
                result.logs.push(format!("{name} restores {amount} resource"));
            }
            EffectPayload::Cleanse => {
                let removed = result.actor.status_effects.clear();
                if removed > 0 {
                    result.actor.recompute_stats();
                    result.logs.push(format!("{name} cleanses {removed} effects"));
                }
            }
            EffectPayload::Shield { amount, duration } => {
                let amount = amount.resolve(stats.max_health, stats.power);
                result.actor.grant_shield(amount, *duration);
                result.shield_granted += amount;
                result.logs.push(format!("{name} grants a {amount} shield"));
            }
            EffectPayload::Debuff {
                stat,
                multiplier,
                duration,
            } => {
                result
                    .enemy_debuffs
                    .push(Buff::multiplier(*stat, *multiplier, *duration, source));
                result.logs.push(format!("{name} weakens {stat}"));
            }
            EffectPayload::Counter { name: counter, op } => match op {
                CounterOp::Increment => {
                    result.actor.increment_counter(counter);
                }
                CounterOp::Reset => result.actor.reset_counter(counter),
            },
            EffectPayload::GrantAttackModifier { kind, uses } => {
                if result
                    .actor
                    .attack_modifiers
                    .grant(AttackModifier::new(*kind, *uses, source))
                {
                    result.logs.push(format!("{name} empowers the next attack"));
                }
            }
        }
    }
}

/// Applies a trigger result's actor-independent parts to the actor and opponent.
///
/// Heal and resource go to the actor; extra damage, statuses and debuffs go to
/// the opponent. Reflected damage is left to the caller, which knows the hit
/// source. Nothing here re-enters the processor.
pub fn apply_result(result: TriggerResult, opponent: Option<&mut Combatant>) -> (Combatant, Vec<String>) {
    let TriggerResult {
        heal_amount,
        damage_amount,
        mana_restored,
        status_to_apply,
        enemy_debuffs,
        logs,
        mut actor,
        ..
    } = result;

    actor.heal(heal_amount);
    actor.restore_resource(mana_restored);

    if let Some(opponent) = opponent {
        if damage_amount > 0 {
            let (_, remaining) = opponent.absorb(damage_amount);
            opponent.lose_health(remaining);
        }
        let mut touched = false;
        for status in status_to_apply {
            touched |= opponent.status_effects.apply(status);
        }
        for debuff in enemy_debuffs {
            opponent.active_buffs.retain(|b| !(b.stat == debuff.stat && b.source == debuff.source));
            opponent.active_buffs.push(debuff);
            touched = true;
        }
        if touched {
            opponent.recompute_stats();
        }
    }

    (actor, logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{AbilityDefinition, AbilityId, Condition, Magnitude, StatusApplication};
    use crate::env::{ScriptedRng, SeededRng};
    use crate::state::{AttackModifierKind, PlayerProfile, StatusKind};
    use crate::stats::{BaseStats, Bonus, ResourceKind, StatKind};

    fn registry() -> AbilityRegistry {
        let mut registry = AbilityRegistry::new();
        registry
            .insert_ability(AbilityDefinition::new(
                "thorns",
                "Thorns",
                vec![Effect::new(
                    TriggerKind::OnDamaged,
                    EffectPayload::DamageModifier {
                        kind: DamageModifierKind::Reflect,
                        fraction: 0.2,
                    },
                )],
            ))
            .unwrap();
        registry
            .insert_ability(AbilityDefinition::new(
                "vampiric_strikes",
                "Vampiric Strikes",
                vec![Effect::new(
                    TriggerKind::OnHit,
                    EffectPayload::DamageModifier {
                        kind: DamageModifierKind::Lifesteal,
                        fraction: 0.5,
                    },
                )],
            ))
            .unwrap();
        registry
            .insert_ability(AbilityDefinition::new(
                "blood_rage",
                "Blood Rage",
                vec![Effect::new(
                    TriggerKind::OnHit,
                    EffectPayload::StatModifier {
                        stat: StatKind::Power,
                        bonus: Bonus::more(50),
                        duration: Some(5.0),
                    },
                )
                .when(Condition::HealthBelow(0.5))],
            ))
            .unwrap();
        registry
            .insert_ability(AbilityDefinition::new(
                "last_stand",
                "Last Stand",
                vec![Effect::new(
                    TriggerKind::OnDamaged,
                    EffectPayload::Heal(Magnitude::MaxHealth(0.2)),
                )
                .when(Condition::HealthBelow(0.3))
                .with_internal_cooldown(30.0)],
            ))
            .unwrap();
        registry
            .insert_ability(AbilityDefinition::new(
                "venom_blade",
                "Venom Blade",
                vec![Effect::new(
                    TriggerKind::OnHit,
                    EffectPayload::StatusApplication(
                        StatusApplication::new(StatusKind::Poison, 4, 3).with_chance(0.5),
                    ),
                )
                .with_chance(0.5)],
            ))
            .unwrap();
        registry
            .insert_ability(AbilityDefinition::new(
                "ambush",
                "Ambush",
                vec![Effect::new(
                    TriggerKind::CombatStart,
                    EffectPayload::GrantAttackModifier {
                        kind: AttackModifierKind::GuaranteedCrit,
                        uses: 1,
                    },
                )],
            ))
            .unwrap();
        registry
    }

    fn create_test_actor(abilities: &[&str], health: i32) -> Combatant {
        let mut actor = Combatant::player(
            "Hero",
            BaseStats::new(100, 20, 0, 100, 50).with_health(health),
            ResourceKind::Fury,
            PlayerProfile::new(1, "warrior"),
        );
        for id in abilities {
            actor.acquire(AbilityId::from(*id));
        }
        actor
    }

    #[test]
    fn reflect_scales_with_incoming_damage() {
        let registry = registry();
        let actor = create_test_actor(&["thorns"], 100);
        let ctx = TriggerContext::new(&actor).with_damage(25);

        let result = TriggerProcessor::new(&registry).process(
            TriggerKind::OnDamaged,
            &ctx,
            &mut SeededRng::new(1),
        );
        assert_eq!(result.reflected_damage, 5);
        assert_eq!(result.fired, vec![AbilityId::from("thorns")]);
    }

    #[test]
    fn co_firing_abilities_accumulate_in_acquisition_order() {
        let registry = registry();
        let actor = create_test_actor(&["blood_rage", "vampiric_strikes"], 40);
        let ctx = TriggerContext::new(&actor).with_damage(30);

        let result =
            TriggerProcessor::new(&registry).process(TriggerKind::OnHit, &ctx, &mut SeededRng::new(1));
        assert_eq!(
            result.fired,
            vec![AbilityId::from("blood_rage"), AbilityId::from("vampiric_strikes")]
        );
        assert_eq!(result.heal_amount, 15);
        assert_eq!(result.actor.current_stats.power, 30);
    }

    #[test]
    fn failed_condition_skips_effect() {
        let registry = registry();
        let actor = create_test_actor(&["blood_rage"], 90);
        let ctx = TriggerContext::new(&actor).with_damage(30);

        let result =
            TriggerProcessor::new(&registry).process(TriggerKind::OnHit, &ctx, &mut SeededRng::new(1));
        assert!(result.is_empty());
        assert!(result.actor.active_buffs.is_empty());
    }

    #[test]
    fn internal_cooldown_blocks_second_proc() {
        let registry = registry();
        let actor = create_test_actor(&["last_stand"], 20);
        let processor = TriggerProcessor::new(&registry);
        let mut rng = SeededRng::new(1);

        let first = processor.process(
            TriggerKind::OnDamaged,
            &TriggerContext::new(&actor).with_damage(10),
            &mut rng,
        );
        assert_eq!(first.heal_amount, 20);

        let after = first.into_actor();
        let second = processor.process(
            TriggerKind::OnDamaged,
            &TriggerContext::new(&after).with_damage(10),
            &mut rng,
        );
        assert_eq!(second.heal_amount, 0);
    }

    #[test]
    fn proc_chance_and_status_chance_roll_independently() {
        let registry = registry();
        let actor = create_test_actor(&["venom_blade"], 100);
        let ctx = TriggerContext::new(&actor).with_damage(10);
        let processor = TriggerProcessor::new(&registry);

        // proc succeeds, status roll fails
        let result = processor.process(TriggerKind::OnHit, &ctx, &mut ScriptedRng::new([0.1, 0.9]));
        assert!(!result.is_empty());
        assert!(result.status_to_apply.is_empty());

        // both succeed
        let result = processor.process(TriggerKind::OnHit, &ctx, &mut ScriptedRng::new([0.1, 0.1]));
        assert_eq!(result.status_to_apply.len(), 1);

        // proc fails
        let result = processor.process(TriggerKind::OnHit, &ctx, &mut ScriptedRng::new([0.9]));
        assert!(result.is_empty());
    }

    #[test]
    fn unknown_ability_is_a_no_op() {
        let registry = registry();
        let actor = create_test_actor(&["does_not_exist", "thorns"], 100);
        let ctx = TriggerContext::new(&actor).with_damage(10);

        let result = TriggerProcessor::new(&registry).process(
            TriggerKind::OnDamaged,
            &ctx,
            &mut SeededRng::new(1),
        );
        assert_eq!(result.reflected_damage, 2);
    }

    #[test]
    fn guard_bounds_each_trigger_to_one_pass() {
        let registry = registry();
        let actor = create_test_actor(&["ambush"], 100);
        let ctx = TriggerContext::new(&actor);
        let processor = TriggerProcessor::new(&registry);
        let mut guard = ResolutionGuard::default();
        let mut rng = SeededRng::new(1);

        let first = processor.process_guarded(TriggerKind::CombatStart, &ctx, &mut guard, &mut rng);
        let second = processor.process_guarded(TriggerKind::CombatStart, &ctx, &mut guard, &mut rng);
        assert!(!first.is_empty());
        assert!(second.is_empty());
    }

    #[test]
    fn apply_result_routes_to_actor_and_opponent() {
        let registry = registry();
        let actor = create_test_actor(&["vampiric_strikes", "venom_blade"], 50);
        let mut opponent = create_test_actor(&[], 100);
        let ctx = TriggerContext::new(&actor).against(&opponent).with_damage(20);

        let result = TriggerProcessor::new(&registry).process(
            TriggerKind::OnHit,
            &ctx,
            &mut ScriptedRng::constant(0.0),
        );
        let (actor, logs) = apply_result(result, Some(&mut opponent));

        assert_eq!(actor.health(), 60);
        assert!(opponent.status_effects.has(StatusKind::Poison));
        assert_eq!(logs.len(), 2);
    }
}
