//! Encounter opening: `combat_start` for both sides and the first intent.

use super::resolution::{Reaction, Resolution, Side};
use super::terminal;
use super::{ActionContext, ActionOutcome, choose_intent};
use crate::ability::TriggerKind;
use crate::state::Combatant;

/// Fires `combat_start` for the player then the enemy and previews the
/// enemy's first action.
///
/// An opener that kills settles through the death latch like any other hit;
/// no intent is previewed for an encounter that is already over.
pub fn open_encounter(
    player: &Combatant,
    enemy: &Combatant,
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    let mut res = Resolution::new(player.clone(), enemy.clone());
    for side in [Side::Actor, Side::Opponent] {
        let reflected = res.react(
            side,
            Reaction::new(TriggerKind::CombatStart),
            ctx.registry,
            ctx.config,
            &mut *ctx.rng,
        );
        res.reflect(side, reflected, ctx.config);
    }
    res.log(format!("{} appears", res.opponent.name));
    terminal::settle(&mut res, ctx);

    if !res.actor.is_dying && !res.opponent.is_dying {
        let intent = choose_intent(&res.opponent, ctx.registry, &mut *ctx.rng);
        if let Some(profile) = res.opponent.enemy_profile_mut() {
            profile.intent = Some(intent);
        }
    }
    res.into_outcome(true, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{AbilityDefinition, AbilityRegistry, Effect, EffectPayload, Magnitude};
    use crate::config::CombatConfig;
    use crate::death::DeathGuard;
    use crate::env::SeededRng;
    use crate::state::{
        EnemyIntent, EnemyProfile, EnemyTier, EntityId, PlayerProfile, RewardTable,
    };
    use crate::stats::{BaseStats, ResourceKind};

    #[test]
    fn combat_start_fires_and_intent_is_previewed() {
        let mut registry = AbilityRegistry::new();
        registry
            .insert_ability(AbilityDefinition::new(
                "opening_ward",
                "Opening Ward",
                vec![Effect::new(
                    TriggerKind::CombatStart,
                    EffectPayload::Shield {
                        amount: Magnitude::Flat(12),
                        duration: 5.0,
                    },
                )],
            ))
            .unwrap();
        let config = CombatConfig::deterministic();
        let mut rng = SeededRng::new(9);
        let mut guard = DeathGuard::new();
        let mut ctx = ActionContext {
            registry: &registry,
            config: &config,
            rng: &mut rng,
            guard: &mut guard,
            paused: false,
        };

        let mut player = Combatant::player(
            "Hero",
            BaseStats::new(100, 10, 0, 100, 50),
            ResourceKind::Mana,
            PlayerProfile::new(1, "warden"),
        );
        registry.grant(&mut player, "opening_ward".into()).unwrap();
        let enemy = Combatant::enemy(
            EntityId(1),
            "Rat",
            BaseStats::new(20, 3, 0, 100, 0),
            EnemyProfile::new("rat", EnemyTier::Normal, RewardTable::default()),
        );

        let outcome = open_encounter(&player, &enemy, &mut ctx);
        assert_eq!(outcome.player.active_shield().map(|s| s.amount), Some(12));
        assert_eq!(
            outcome.enemy.enemy_profile().unwrap().intent,
            Some(EnemyIntent::Attack)
        );
        assert_eq!(outcome.logs.last().map(String::as_str), Some("Rat appears"));
    }

    #[test]
    fn lethal_opener_settles_the_defeat_once() {
        let mut registry = AbilityRegistry::new();
        registry
            .insert_ability(AbilityDefinition::new(
                "opener",
                "Opener",
                vec![Effect::new(
                    TriggerKind::CombatStart,
                    EffectPayload::Damage(Magnitude::Flat(30)),
                )],
            ))
            .unwrap();
        let config = CombatConfig::deterministic();
        let mut rng = SeededRng::new(3);
        let mut guard = DeathGuard::new();

        let mut player = Combatant::player(
            "Hero",
            BaseStats::new(100, 10, 0, 100, 50),
            ResourceKind::Mana,
            PlayerProfile::new(1, "duelist"),
        );
        registry.grant(&mut player, "opener".into()).unwrap();
        let enemy = Combatant::enemy(
            EntityId(1),
            "Rat",
            BaseStats::new(20, 3, 0, 100, 0),
            EnemyProfile::new(
                "rat",
                EnemyTier::Normal,
                RewardTable {
                    xp: 10,
                    gold: 2,
                    drop_chance: 0.0,
                },
            ),
        );

        let first = {
            let mut ctx = ActionContext {
                registry: &registry,
                config: &config,
                rng: &mut rng,
                guard: &mut guard,
                paused: false,
            };
            open_encounter(&player, &enemy, &mut ctx)
        };
        assert!(first.enemy.is_dying);
        assert_eq!(first.enemy.health(), 0);
        assert_eq!(first.enemy.enemy_profile().unwrap().intent, None);
        let reward = first.rewards.as_ref().unwrap();
        assert_eq!((reward.xp, reward.gold), (10, 2));
        assert_eq!(first.logs.iter().filter(|l| l.ends_with("is defeated")).count(), 1);

        let mut ctx = ActionContext {
            registry: &registry,
            config: &config,
            rng: &mut rng,
            guard: &mut guard,
            paused: false,
        };
        let second = open_encounter(&player, &enemy, &mut ctx);
        assert!(second.enemy.is_dying);
        assert!(second.rewards.is_none());
        assert!(!second.logs.iter().any(|l| l.ends_with("is defeated")));
    }
}
