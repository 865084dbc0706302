//! Player- and enemy-specific combatant data.

use std::collections::BTreeMap;

use crate::ability::AbilityId;

/// Player-only combat data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerProfile {
    pub level: u32,
    /// Progression path id (e.g. `rogue_assassin`).
    pub path: String,
    /// Active-type paths build combos by alternating powers.
    pub combo_enabled: bool,
    pub combo: ComboState,
}

impl PlayerProfile {
    pub fn new(level: u32, path: impl Into<String>) -> Self {
        Self {
            level,
            path: path.into(),
            combo_enabled: false,
            combo: ComboState::default(),
        }
    }

    pub fn with_combo(mut self) -> Self {
        self.combo_enabled = true;
        self
    }
}

/// Combo tracking for active-type paths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboState {
    pub count: u32,
    pub last_power: Option<AbilityId>,
}

impl ComboState {
    /// Records a power use and returns the new combo count.
    ///
    /// A power different from the last one increments the count (capped at
    /// `max`); repeating the same power leaves it unchanged.
    pub fn register(&mut self, power: &AbilityId, max: u32) -> u32 {
        if let Some(last) = &self.last_power {
            if last != power {
                self.count = (self.count + 1).min(max);
            }
        }
        self.last_power = Some(power.clone());
        self.count
    }

    pub fn multiplier(&self, step: f64) -> f64 {
        1.0 + self.count as f64 * step
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.last_power = None;
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EnemyTier {
    #[default]
    Normal,
    Elite,
    Boss,
}

impl EnemyTier {
    /// Multiplier applied to xp and gold rewards.
    pub const fn reward_multiplier(self) -> f64 {
        match self {
            Self::Normal => 1.0,
            Self::Elite => 1.5,
            Self::Boss => 3.0,
        }
    }
}

/// Reward tuning carried by an enemy.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardTable {
    pub xp: u32,
    pub gold: u32,
    /// Base item drop chance before fortune.
    pub drop_chance: f64,
}

/// Active enrage on an enemy, counted in enemy turns.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enrage {
    pub power_multiplier: f64,
    pub remaining_turns: u32,
}

/// The enemy's previewed next action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EnemyIntent {
    Attack,
    Ability(AbilityId),
}

/// Enemy-only combat data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyProfile {
    /// Template id this enemy was spawned from.
    pub template: String,
    pub tier: EnemyTier,
    pub rewards: RewardTable,
    /// Enemy ability ids, in priority order.
    pub abilities: Vec<AbilityId>,
    /// Remaining cooldown per enemy ability, in enemy turns.
    pub ability_cooldowns: BTreeMap<AbilityId, u32>,
    pub enrage: Option<Enrage>,
    pub intent: Option<EnemyIntent>,
}

impl EnemyProfile {
    pub fn new(template: impl Into<String>, tier: EnemyTier, rewards: RewardTable) -> Self {
        Self {
            template: template.into(),
            tier,
            rewards,
            abilities: Vec::new(),
            ability_cooldowns: BTreeMap::new(),
            enrage: None,
            intent: None,
        }
    }

    pub fn with_abilities(mut self, abilities: impl IntoIterator<Item = AbilityId>) -> Self {
        self.abilities = abilities.into_iter().collect();
        self
    }

    pub fn ability_ready(&self, ability: &AbilityId) -> bool {
        self.ability_cooldowns.get(ability).copied().unwrap_or(0) == 0
    }

    /// Counts ability cooldowns and enrage down by one enemy turn.
    ///
    /// Returns true if enrage ended this turn.
    pub fn advance_turn(&mut self) -> bool {
        self.ability_cooldowns.retain(|_, turns| {
            *turns = turns.saturating_sub(1);
            *turns > 0
        });

        match &mut self.enrage {
            Some(enrage) => {
                enrage.remaining_turns = enrage.remaining_turns.saturating_sub(1);
                if enrage.remaining_turns == 0 {
                    self.enrage = None;
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combo_increments_only_on_different_power() {
        let mut combo = ComboState::default();
        let slash = AbilityId::from("slash");
        let stab = AbilityId::from("stab");

        assert_eq!(combo.register(&slash, 5), 0);
        assert_eq!(combo.register(&stab, 5), 1);
        assert_eq!(combo.register(&stab, 5), 1);
        assert_eq!(combo.register(&slash, 5), 2);
        assert!((combo.multiplier(0.1) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn combo_is_capped() {
        let mut combo = ComboState::default();
        let a = AbilityId::from("a");
        let b = AbilityId::from("b");
        for _ in 0..10 {
            combo.register(&a, 3);
            combo.register(&b, 3);
        }
        assert_eq!(combo.count, 3);
    }

    #[test]
    fn enemy_turn_advances_cooldowns_and_enrage() {
        let mut profile = EnemyProfile::new("orc", EnemyTier::Normal, RewardTable::default());
        let smash = AbilityId::from("smash");
        profile.ability_cooldowns.insert(smash.clone(), 2);
        profile.enrage = Some(Enrage {
            power_multiplier: 1.5,
            remaining_turns: 1,
        });

        assert!(!profile.ability_ready(&smash));
        assert!(profile.advance_turn());
        assert!(profile.enrage.is_none());
        assert!(!profile.ability_ready(&smash));
        assert!(!profile.advance_turn());
        assert!(profile.ability_ready(&smash));
    }
}
