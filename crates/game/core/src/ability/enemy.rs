use super::{AbilityId, StatusApplication};
use crate::state::{EnemyTier, RewardTable};
use crate::stats::{BaseStats, StatKind};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnemyAbilityKind {
    /// Single hit at `multiplier × power`, optionally applying a status.
    Strike {
        multiplier: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        status: Option<StatusApplication>,
    },
    MultiHit { hits: u32, multiplier: f64 },
    /// Heals a fraction of max health.
    Heal { fraction: f64 },
    /// Shield worth a fraction of max health for `duration` seconds.
    Shield { fraction: f64, duration: f64 },
    /// Power multiplier for `turns` enemy turns.
    Enrage { multiplier: f64, turns: u32 },
    /// Timed stat reduction on the player.
    Debuff { stat: StatKind, multiplier: f64, duration: f64 },
}

/// Enemy-only activated ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyAbilityDefinition {
    pub id: AbilityId,
    pub name: String,
    pub kind: EnemyAbilityKind,
    /// Cooldown in enemy turns.
    pub cooldown_turns: u32,
    /// Chance the enemy picks this ability when it is ready.
    pub chance: f64,
}

/// Blueprint an enemy is spawned from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tier: EnemyTier,
    pub stats: BaseStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rewards: RewardTable,
    /// Enemy abilities in priority order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilityId>,
    /// Trigger-driven abilities the enemy owns.
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: Vec<AbilityId>,
}
