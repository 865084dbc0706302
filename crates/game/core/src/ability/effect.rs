//! Effect payloads.
//!
//! One variant per mechanical consequence. Each variant carries exactly the
//! fields it needs, so invalid combinations cannot be expressed in content.

use super::AbilityId;
use crate::state::{AttackModifierKind, StatusEffect, StatusKind};
use crate::stats::{Bonus, StatKind};

/// Amount resolved against the acting combatant at proc time.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Magnitude {
    Flat(i32),
    /// Fraction of the actor's max health.
    MaxHealth(f64),
    /// Fraction of the actor's power.
    Power(f64),
}

impl Magnitude {
    pub fn resolve(self, max_health: i32, power: i32) -> i32 {
        match self {
            Magnitude::Flat(value) => value.max(0),
            Magnitude::MaxHealth(fraction) => (max_health as f64 * fraction).floor().max(0.0) as i32,
            Magnitude::Power(fraction) => (power as f64 * fraction).floor().max(0.0) as i32,
        }
    }
}

/// Damage-modifier subtypes. All scale with the damage carried by the trigger context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageModifierKind {
    /// Fraction of incoming damage sent back to the source.
    Reflect,
    /// Fraction of damage dealt added to healing.
    Lifesteal,
    /// Fraction of context damage dealt again as extra damage.
    BonusDamage,
    /// Fraction of damage converted to self-healing.
    ConvertHeal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerModifierKind {
    /// Percent change to resource cost (-20 = 20% cheaper).
    Cost,
    /// Percent change to cooldown duration.
    Cooldown,
    /// Percent change to power damage and healing.
    Damage,
    /// Percent change to cooldown recovery speed.
    CooldownRecovery,
}

/// Passive tuning of one power, or of every power when `power` is `None`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerModifier {
    pub kind: PowerModifierKind,
    pub percent: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub power: Option<AbilityId>,
}

/// Status applied to the opponent, with its own independent chance.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusApplication {
    pub status: StatusKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage: i32,
    pub turns: u32,
    #[cfg_attr(feature = "serde", serde(default = "always"))]
    pub chance: f64,
}

#[cfg(feature = "serde")]
fn always() -> f64 {
    1.0
}

impl StatusApplication {
    pub fn new(status: StatusKind, damage: i32, turns: u32) -> Self {
        Self {
            status,
            damage,
            turns,
            chance: 1.0,
        }
    }

    pub fn with_chance(mut self, chance: f64) -> Self {
        self.chance = chance;
        self
    }

    /// The status this application inflicts, ignoring its chance.
    pub fn to_effect(&self) -> StatusEffect {
        StatusEffect::new(self.status, self.damage, self.turns)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CounterOp {
    Increment,
    Reset,
}

/// A single mechanical consequence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectPayload {
    /// Stat change on the actor. With a duration it becomes a timed buff,
    /// without one a permanent modifier. Passive entries are folded into stats.
    StatModifier {
        stat: StatKind,
        bonus: Bonus,
        #[cfg_attr(feature = "serde", serde(default))]
        duration: Option<f64>,
    },
    /// Passive-only power tuning.
    PowerModifier(PowerModifier),
    DamageModifier { kind: DamageModifierKind, fraction: f64 },
    StatusApplication(StatusApplication),
    Heal(Magnitude),
    /// Extra damage to the opponent.
    Damage(Magnitude),
    ManaRestore(f64),
    /// Removes every status effect from the actor.
    Cleanse,
    Shield { amount: Magnitude, duration: f64 },
    /// Timed stat change applied to the opponent.
    Debuff { stat: StatKind, multiplier: f64, duration: f64 },
    Counter { name: String, op: CounterOp },
    GrantAttackModifier { kind: AttackModifierKind, uses: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_resolution() {
        assert_eq!(Magnitude::Flat(7).resolve(100, 20), 7);
        assert_eq!(Magnitude::MaxHealth(0.25).resolve(90, 20), 22);
        assert_eq!(Magnitude::Power(1.5).resolve(100, 15), 22);
        assert_eq!(Magnitude::Flat(-3).resolve(100, 20), 0);
    }
}
