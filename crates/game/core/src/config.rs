//! Combat configuration constants and tunable parameters.
//!
//! Balance numbers are data, not rules: every value here can be overridden
//! from a TOML file (see `combat-content::ConfigLoader`). Missing fields fall
//! back to the defaults defined below.

use crate::stats::ResourceKind;

/// Tunable combat parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    // ===== damage pipeline =====
    /// Lower bound of the per-hit variance multiplier.
    pub variance_min: f64,
    /// Width of the variance window: `variance ∈ [min, min + range]`.
    pub variance_range: f64,
    /// Damage multiplier applied on critical hits.
    pub crit_multiplier: f64,
    /// Crit chance every combatant has before fortune.
    pub base_crit_chance: f64,
    /// Crit chance gained per point of fortune.
    pub crit_per_fortune: f64,
    /// Dodge chance gained per point of speed advantage over the attacker.
    pub dodge_per_speed: f64,
    /// Hard cap on dodge chance.
    pub max_dodge_chance: f64,

    // ===== scheduler =====
    /// Cadence of cooldown / shield / buff updates.
    pub cooldown_tick_ms: u64,
    /// Cadence of resource regeneration.
    pub regen_tick_ms: u64,
    /// Cooldowns below this many seconds snap to zero.
    pub cooldown_epsilon: f64,
    /// Global game speed. Scales timers and presentation delays.
    pub speed_multiplier: f64,

    // ===== presentation =====
    pub attack_delay_ms: u64,
    pub power_delay_ms: u64,
    /// Gap between consecutive hits of a multi-hit power.
    pub hit_gap_ms: u64,
    pub status_delay_ms: u64,
    pub death_delay_ms: u64,
    /// How long a dying enemy lingers before it is removed.
    pub death_animation_ms: u64,
    pub event_queue_capacity: usize,
    pub combat_log_capacity: usize,

    // ===== combos =====
    /// Bonus damage per combo point (0.1 = +10% per point).
    pub combo_step: f64,
    pub max_combo: u32,

    // ===== resources =====
    pub resources: ResourceTable,

    // ===== rewards =====
    /// Extra drop chance per point of fortune.
    pub drop_chance_per_fortune: f64,
    /// Chance that a dropped item is legendary.
    pub legendary_chance: f64,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_STATUS_EFFECTS: usize = 8;
    pub const MAX_ATTACK_MODIFIERS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_VARIANCE_MIN: f64 = 0.85;
    pub const DEFAULT_VARIANCE_RANGE: f64 = 0.3;
    pub const DEFAULT_CRIT_MULTIPLIER: f64 = 2.0;
    pub const DEFAULT_COOLDOWN_TICK_MS: u64 = 100;
    pub const DEFAULT_REGEN_TICK_MS: u64 = 1000;
    pub const DEFAULT_COOLDOWN_EPSILON: f64 = 0.01;

    pub fn new() -> Self {
        Self {
            variance_min: Self::DEFAULT_VARIANCE_MIN,
            variance_range: Self::DEFAULT_VARIANCE_RANGE,
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            base_crit_chance: 0.05,
            crit_per_fortune: 0.01,
            dodge_per_speed: 0.005,
            max_dodge_chance: 0.5,
            cooldown_tick_ms: Self::DEFAULT_COOLDOWN_TICK_MS,
            regen_tick_ms: Self::DEFAULT_REGEN_TICK_MS,
            cooldown_epsilon: Self::DEFAULT_COOLDOWN_EPSILON,
            speed_multiplier: 1.0,
            attack_delay_ms: 400,
            power_delay_ms: 500,
            hit_gap_ms: 150,
            status_delay_ms: 200,
            death_delay_ms: 600,
            death_animation_ms: 1000,
            event_queue_capacity: 64,
            combat_log_capacity: 100,
            combo_step: 0.1,
            max_combo: 5,
            resources: ResourceTable::default(),
            drop_chance_per_fortune: 0.005,
            legendary_chance: 0.02,
        }
    }

    /// Config with variance pinned to exactly 1.0 and no natural crits or dodges.
    ///
    /// Useful for reproducing hand-computed damage numbers.
    pub fn deterministic() -> Self {
        Self {
            variance_min: 1.0,
            variance_range: 0.0,
            base_crit_chance: 0.0,
            crit_per_fortune: 0.0,
            dodge_per_speed: 0.0,
            ..Self::new()
        }
    }

    /// Returns a copy with a different global speed multiplier.
    pub fn with_speed_multiplier(mut self, speed_multiplier: f64) -> Self {
        self.speed_multiplier = speed_multiplier;
        self
    }

    /// Scales a base presentation delay by the global speed multiplier.
    pub fn scaled_delay(&self, base_ms: u64) -> u64 {
        if self.speed_multiplier <= 0.0 {
            return base_ms;
        }
        (base_ms as f64 / self.speed_multiplier).round() as u64
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Regeneration and gain rules for a single path resource.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResourceRule {
    /// Passive regeneration per second while combat is running.
    pub regen_per_second: f64,
    /// Resource gained each time the owner lands a hit.
    pub gain_on_hit: f64,
    /// Resource gained each time the owner takes damage.
    pub gain_on_damaged: f64,
}

impl ResourceRule {
    pub const fn new(regen_per_second: f64, gain_on_hit: f64, gain_on_damaged: f64) -> Self {
        Self {
            regen_per_second,
            gain_on_hit,
            gain_on_damaged,
        }
    }
}

impl Default for ResourceRule {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// Resource rules for every path resource kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResourceTable {
    pub mana: ResourceRule,
    pub fury: ResourceRule,
    pub charges: ResourceRule,
    pub momentum: ResourceRule,
    pub zeal: ResourceRule,
}

impl ResourceTable {
    /// Get the rule for a specific resource.
    pub fn get(&self, kind: ResourceKind) -> &ResourceRule {
        match kind {
            ResourceKind::Mana => &self.mana,
            ResourceKind::Fury => &self.fury,
            ResourceKind::Charges => &self.charges,
            ResourceKind::Momentum => &self.momentum,
            ResourceKind::Zeal => &self.zeal,
        }
    }
}

impl Default for ResourceTable {
    fn default() -> Self {
        Self {
            mana: ResourceRule::new(2.0, 0.0, 0.0),
            fury: ResourceRule::new(0.0, 5.0, 3.0),
            charges: ResourceRule::new(0.2, 0.0, 0.0),
            momentum: ResourceRule::new(0.5, 4.0, 0.0),
            zeal: ResourceRule::new(1.0, 2.0, 2.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_delay_divides_by_speed() {
        let config = CombatConfig::new().with_speed_multiplier(2.0);
        assert_eq!(config.scaled_delay(400), 200);
    }

    #[test]
    fn scaled_delay_ignores_non_positive_speed() {
        let config = CombatConfig::new().with_speed_multiplier(0.0);
        assert_eq!(config.scaled_delay(400), 400);
    }

    #[test]
    fn resource_table_lookup_matches_kind() {
        let table = ResourceTable::default();
        assert_eq!(table.get(ResourceKind::Fury).gain_on_hit, 5.0);
        assert_eq!(table.get(ResourceKind::Mana).regen_per_second, 2.0);
    }
}
