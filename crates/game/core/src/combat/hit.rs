//! Dodge checks.

use crate::config::CombatConfig;
use crate::env::CombatRoller;

/// Chance for the defender to dodge an auto-attack.
///
/// ```text
/// dodge = clamp((defender.speed − attacker.speed) × dodge_per_speed, 0, max_dodge_chance)
/// ```
pub fn dodge_chance(config: &CombatConfig, attacker_speed: i32, defender_speed: i32) -> f64 {
    let advantage = (defender_speed - attacker_speed) as f64;
    (advantage * config.dodge_per_speed).clamp(0.0, config.max_dodge_chance.max(0.0))
}

/// Rolls a dodge. A zero chance consumes no roll.
pub fn check_dodge(
    config: &CombatConfig,
    attacker_speed: i32,
    defender_speed: i32,
    rng: &mut dyn CombatRoller,
) -> bool {
    rng.chance(dodge_chance(config, attacker_speed, defender_speed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slower_defender_never_dodges() {
        let config = CombatConfig::new();
        assert_eq!(dodge_chance(&config, 120, 100), 0.0);
    }

    #[test]
    fn dodge_is_capped() {
        let config = CombatConfig::new();
        assert!((dodge_chance(&config, 100, 140) - 0.2).abs() < 1e-9);
        assert_eq!(dodge_chance(&config, 10, 500), config.max_dodge_chance);
    }
}
