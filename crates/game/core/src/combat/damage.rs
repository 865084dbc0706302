//! Auto-attack damage calculation.

use crate::config::CombatConfig;
use crate::env::CombatRoller;
use crate::state::AttackBoosts;
use crate::stats::CurrentStats;

/// Armor-reduced base damage.
///
/// # Formula
///
/// ```text
/// divisor = 1 if target shielded else 2
/// base    = max(1, power − armor / divisor)
/// ```
pub fn base_damage(power: i32, armor: i32, shielded: bool) -> i32 {
    let divisor = if shielded { 1 } else { 2 };
    (power - armor.max(0) / divisor).max(1)
}

/// Natural crit chance from fortune.
pub fn crit_chance(config: &CombatConfig, fortune: i32) -> f64 {
    (config.base_crit_chance + fortune.max(0) as f64 * config.crit_per_fortune).clamp(0.0, 1.0)
}

/// Applies variance, crit and bonus damage to a base value.
///
/// ```text
/// damage = floor(base × variance)
/// if crit: damage = floor(damage × crit_multiplier)
/// damage = floor(damage × (1 + bonus))
/// ```
pub fn calculate_damage(
    base: i32,
    variance: f64,
    is_crit: bool,
    bonus: f64,
    config: &CombatConfig,
) -> i32 {
    let mut damage = (base as f64 * variance).floor();
    if is_crit {
        damage = (damage * config.crit_multiplier).floor();
    }
    if bonus > 0.0 {
        damage = (damage * (1.0 + bonus)).floor();
    }
    (damage as i32).max(1)
}

/// Rolled auto-attack damage before shields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageRoll {
    pub base: i32,
    pub variance: f64,
    pub is_crit: bool,
    pub damage: i32,
}

/// Rolls one auto-attack.
///
/// Draws the variance roll first, then the crit roll. A guaranteed-crit
/// boost skips the crit roll.
pub fn roll_attack(
    attacker: &CurrentStats,
    target_armor: i32,
    target_shielded: bool,
    multiplier: f64,
    boosts: AttackBoosts,
    config: &CombatConfig,
    rng: &mut dyn CombatRoller,
) -> DamageRoll {
    let power = (attacker.power as f64 * multiplier).floor() as i32;
    let base = base_damage(power, target_armor, target_shielded);
    let variance = rng.spread(config.variance_min, config.variance_range);
    let is_crit = boosts.guaranteed_crit || rng.chance(crit_chance(config, attacker.fortune));
    let damage = calculate_damage(base, variance, is_crit, boosts.bonus_damage, config);

    DamageRoll {
        base,
        variance,
        is_crit,
        damage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;
    use crate::stats::BaseStats;

    #[test]
    fn armor_is_halved_unless_shielded() {
        assert_eq!(base_damage(20, 10, false), 15);
        assert_eq!(base_damage(20, 10, true), 10);
        assert_eq!(base_damage(5, 40, false), 1);
    }

    #[test]
    fn fixed_variance_without_crit() {
        let config = CombatConfig::deterministic();
        let attacker = CurrentStats::from_base(&BaseStats::new(100, 20, 0, 100, 0));
        let roll = roll_attack(
            &attacker,
            10,
            false,
            1.0,
            AttackBoosts::default(),
            &config,
            &mut ScriptedRng::constant(0.5),
        );
        assert_eq!(roll.base, 15);
        assert_eq!(roll.damage, 15);
        assert!(!roll.is_crit);
    }

    #[test]
    fn guaranteed_crit_doubles_damage() {
        let config = CombatConfig::deterministic();
        let attacker = CurrentStats::from_base(&BaseStats::new(100, 20, 0, 100, 0));
        let boosts = AttackBoosts {
            guaranteed_crit: true,
            ..AttackBoosts::default()
        };
        let roll = roll_attack(
            &attacker,
            10,
            false,
            1.0,
            boosts,
            &config,
            &mut ScriptedRng::constant(0.99),
        );
        assert!(roll.is_crit);
        assert_eq!(roll.damage, 30);
    }

    #[test]
    fn variance_is_floored() {
        let config = CombatConfig::new();
        assert_eq!(calculate_damage(15, 0.85, false, 0.0, &config), 12);
        assert_eq!(calculate_damage(15, 1.15, true, 0.0, &config), 34);
    }
}
