use super::{AbilityId, StatusApplication};
use crate::stats::StatKind;

/// How a power turns `caster.power × value` into an outcome.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerCategory {
    Strike,
    /// Total damage split evenly across `hits` hits.
    MultiHit { hits: u32 },
    /// Damage multiplied while the target's health fraction is below `threshold`.
    Execute { threshold: f64, multiplier: f64 },
    /// Caster pays `health_percent` of max health (at least 1) before striking.
    Sacrifice { health_percent: f64 },
    Heal,
    Buff { stat: StatKind, multiplier: f64, duration: f64 },
    /// Shield worth `power × value` for `duration` seconds.
    Barrier { duration: f64 },
}

impl PowerCategory {
    pub fn deals_damage(&self) -> bool {
        matches!(
            self,
            Self::Strike | Self::MultiHit { .. } | Self::Execute { .. } | Self::Sacrifice { .. }
        )
    }

    pub fn hits(&self) -> u32 {
        match self {
            Self::MultiHit { hits } => (*hits).max(1),
            _ => 1,
        }
    }
}

/// Activated power.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerDefinition {
    pub id: AbilityId,
    pub name: String,
    /// Resource cost before tuning.
    pub cost: f64,
    /// Cooldown in seconds before tuning.
    pub cooldown: f64,
    /// Scaling of the caster's power.
    pub value: f64,
    pub category: PowerCategory,
    /// Status rider applied to the target after damage.
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Option<StatusApplication>,
}

/// Aggregated passive tuning for one power.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerTuning {
    pub cost: f64,
    pub cooldown: f64,
    pub damage: f64,
    /// Cooldown recovery speed multiplier; also used by the scheduler.
    pub recovery: f64,
}

impl Default for PowerTuning {
    fn default() -> Self {
        Self {
            cost: 1.0,
            cooldown: 1.0,
            damage: 1.0,
            recovery: 1.0,
        }
    }
}

impl PowerTuning {
    pub fn cost_of(&self, power: &PowerDefinition) -> f64 {
        (power.cost * self.cost).max(0.0)
    }

    pub fn cooldown_of(&self, power: &PowerDefinition) -> f64 {
        (power.cooldown * self.cooldown).max(0.0)
    }
}
