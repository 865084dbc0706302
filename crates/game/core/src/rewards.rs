//! Reward signals for the progression layer.
//!
//! The core only computes what a kill is worth. Applying xp, gold and item
//! drops belongs to an external [`ProgressionSink`].

use crate::config::CombatConfig;
use crate::env::CombatRoller;
use crate::state::{Combatant, EnemyTier, EntityId};

/// Rarity of a requested item drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemRarity {
    Standard,
    Legendary,
}

/// Request for the inventory layer to generate an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDropRequest {
    pub enemy: EntityId,
    pub tier: EnemyTier,
    pub rarity: ItemRarity,
}

/// What one defeated enemy grants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardSignal {
    pub enemy: EntityId,
    pub xp: u32,
    pub gold: u32,
    pub item_drop: Option<ItemDropRequest>,
}

/// Rolls the rewards for a defeated enemy.
///
/// Returns `None` for non-enemy combatants. Draws the drop roll, then the
/// legendary roll only if an item dropped.
pub fn roll_rewards(
    enemy: &Combatant,
    killer_fortune: i32,
    config: &CombatConfig,
    rng: &mut dyn CombatRoller,
) -> Option<RewardSignal> {
    let profile = enemy.enemy_profile()?;
    let multiplier = profile.tier.reward_multiplier();
    let scale = |value: u32| (value as f64 * multiplier).floor() as u32;

    let drop_chance = (profile.rewards.drop_chance
        + killer_fortune.max(0) as f64 * config.drop_chance_per_fortune)
        .clamp(0.0, 1.0);
    let item_drop = rng.chance(drop_chance).then(|| {
        let rarity = if rng.chance(config.legendary_chance) {
            ItemRarity::Legendary
        } else {
            ItemRarity::Standard
        };
        ItemDropRequest {
            enemy: enemy.id,
            tier: profile.tier,
            rarity,
        }
    });

    Some(RewardSignal {
        enemy: enemy.id,
        xp: scale(profile.rewards.xp),
        gold: scale(profile.rewards.gold),
        item_drop,
    })
}

/// Answer from the progression layer after it applied a reward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgressionResponse {
    pub leveled_up: bool,
}

/// External consumer of reward signals.
pub trait ProgressionSink {
    fn grant(&mut self, reward: &RewardSignal) -> ProgressionResponse;
}

/// Discards every reward.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullProgression;

impl ProgressionSink for NullProgression {
    fn grant(&mut self, _reward: &RewardSignal) -> ProgressionResponse {
        ProgressionResponse::default()
    }
}

/// Accumulates rewards and levels up every `xp_per_level` xp.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewardLedger {
    pub xp_per_level: u32,
    pub level: u32,
    pub xp: u32,
    pub gold: u32,
    pub grants: Vec<RewardSignal>,
}

impl RewardLedger {
    pub fn new(xp_per_level: u32) -> Self {
        Self {
            xp_per_level,
            level: 1,
            ..Self::default()
        }
    }
}

impl ProgressionSink for RewardLedger {
    fn grant(&mut self, reward: &RewardSignal) -> ProgressionResponse {
        self.xp = self.xp.saturating_add(reward.xp);
        self.gold = self.gold.saturating_add(reward.gold);
        self.grants.push(reward.clone());

        let mut leveled_up = false;
        while self.xp_per_level > 0 && self.xp >= self.xp_per_level {
            self.xp -= self.xp_per_level;
            self.level += 1;
            leveled_up = true;
        }
        ProgressionResponse { leveled_up }
    }
}

impl<S: ProgressionSink + ?Sized> ProgressionSink for &mut S {
    fn grant(&mut self, reward: &RewardSignal) -> ProgressionResponse {
        (**self).grant(reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;
    use crate::state::{EnemyProfile, RewardTable};
    use crate::stats::BaseStats;

    fn create_test_enemy(tier: EnemyTier, drop_chance: f64) -> Combatant {
        Combatant::enemy(
            EntityId(7),
            "Ogre",
            BaseStats::new(120, 12, 4, 90, 0),
            EnemyProfile::new(
                "ogre",
                tier,
                RewardTable {
                    xp: 40,
                    gold: 15,
                    drop_chance,
                },
            ),
        )
    }

    #[test]
    fn boss_rewards_are_scaled() {
        let enemy = create_test_enemy(EnemyTier::Boss, 0.0);
        let reward = roll_rewards(&enemy, 0, &CombatConfig::new(), &mut ScriptedRng::constant(0.99))
            .unwrap();
        assert_eq!((reward.xp, reward.gold), (120, 45));
        assert!(reward.item_drop.is_none());
    }

    #[test]
    fn fortune_raises_drop_chance() {
        let enemy = create_test_enemy(EnemyTier::Normal, 0.1);
        let config = CombatConfig::new();
        // 0.1 + 40 × 0.005 = 0.3: a roll of 0.25 drops only with fortune.
        let without = roll_rewards(&enemy, 0, &config, &mut ScriptedRng::new([0.25, 0.9]));
        let with = roll_rewards(&enemy, 40, &config, &mut ScriptedRng::new([0.25, 0.9]));
        assert!(without.unwrap().item_drop.is_none());
        assert_eq!(with.unwrap().item_drop.unwrap().rarity, ItemRarity::Standard);
    }

    #[test]
    fn ledger_levels_up() {
        let mut ledger = RewardLedger::new(100);
        let reward = RewardSignal {
            enemy: EntityId(1),
            xp: 60,
            gold: 5,
            item_drop: None,
        };
        assert!(!ledger.grant(&reward).leveled_up);
        assert!(ledger.grant(&reward).leveled_up);
        assert_eq!((ledger.level, ledger.xp, ledger.gold), (2, 20, 10));
    }
}
