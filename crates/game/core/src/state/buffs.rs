//! Timed buffs, shields and one-shot attack modifiers.
//!
//! Buff and shield durations are measured in seconds and counted down by the
//! scheduler. Attack modifiers are counted in uses and consumed by auto-attacks.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::stats::{Bonus, StatKind};

/// Temporary stat change with a remaining duration in seconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buff {
    pub stat: StatKind,
    pub bonus: Bonus,
    pub remaining: f64,
    /// Ability or power id that granted the buff.
    pub source: String,
}

impl Buff {
    pub fn new(stat: StatKind, bonus: Bonus, duration: f64, source: impl Into<String>) -> Self {
        Self {
            stat,
            bonus,
            remaining: duration,
            source: source.into(),
        }
    }

    /// Buff expressed as a plain multiplier (`1.3` = +30%, `0.8` = -20%).
    pub fn multiplier(
        stat: StatKind,
        multiplier: f64,
        duration: f64,
        source: impl Into<String>,
    ) -> Self {
        Self::new(stat, Bonus::from_multiplier(multiplier), duration, source)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Debuffs are buffs that lower their stat.
    pub fn is_debuff(&self) -> bool {
        match self.bonus {
            Bonus::Flat(v) | Bonus::Increased(v) | Bonus::More(v) => v < 0,
            Bonus::Less(v) => v > 0,
        }
    }
}

/// Damage absorption pool.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shield {
    pub amount: i32,
    /// Seconds until the shield collapses.
    pub remaining: f64,
}

impl Shield {
    pub fn new(amount: i32, duration: f64) -> Self {
        Self {
            amount,
            remaining: duration,
        }
    }

    pub fn is_active(&self) -> bool {
        self.amount > 0 && self.remaining > 0.0
    }
}

/// Effect of a one-shot attack modifier.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AttackModifierKind {
    GuaranteedCrit,
    /// Fraction of damage added (0.5 = +50%).
    BonusDamage(f64),
    /// Fraction of damage dealt returned as healing.
    Lifesteal(f64),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackModifier {
    pub kind: AttackModifierKind,
    pub remaining_uses: u32,
    pub source: String,
}

impl AttackModifier {
    pub fn new(kind: AttackModifierKind, uses: u32, source: impl Into<String>) -> Self {
        Self {
            kind,
            remaining_uses: uses,
            source: source.into(),
        }
    }
}

/// Aggregate of every attack modifier consumed by one attack.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AttackBoosts {
    pub guaranteed_crit: bool,
    pub bonus_damage: f64,
    pub lifesteal: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackModifiers {
    modifiers: ArrayVec<AttackModifier, { CombatConfig::MAX_ATTACK_MODIFIERS }>,
}

impl AttackModifiers {
    /// Adds a modifier. Returns false if it was dropped (no uses or no room).
    pub fn grant(&mut self, modifier: AttackModifier) -> bool {
        if modifier.remaining_uses == 0 {
            return false;
        }
        self.modifiers.try_push(modifier).is_ok()
    }

    /// Consumes one use of every modifier and returns their combined effect.
    pub fn consume(&mut self) -> AttackBoosts {
        let mut boosts = AttackBoosts::default();

        for modifier in self.modifiers.iter_mut() {
            match modifier.kind {
                AttackModifierKind::GuaranteedCrit => boosts.guaranteed_crit = true,
                AttackModifierKind::BonusDamage(fraction) => boosts.bonus_damage += fraction,
                AttackModifierKind::Lifesteal(fraction) => boosts.lifesteal += fraction,
            }
            modifier.remaining_uses -= 1;
        }

        self.modifiers.retain(|m| m.remaining_uses > 0);
        boosts
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttackModifier> {
        self.modifiers.iter()
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }
}
