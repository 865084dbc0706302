//! Power damage and costs.

use crate::ability::PowerCategory;

/// Raw power output before mitigation.
///
/// ```text
/// raw = floor(power × value × combo_multiplier × tuning)
/// ```
pub fn power_output(caster_power: i32, value: f64, combo_multiplier: f64, tuning: f64) -> i32 {
    (caster_power as f64 * value * combo_multiplier * tuning)
        .floor()
        .max(0.0) as i32
}

/// Execute multiplier for the target's current health fraction.
pub fn execute_multiplier(category: &PowerCategory, target_health_fraction: f64) -> f64 {
    match category {
        PowerCategory::Execute {
            threshold,
            multiplier,
        } if target_health_fraction < *threshold => *multiplier,
        _ => 1.0,
    }
}

/// Final power damage against a target.
///
/// Powers do not roll variance or natural crits.
///
/// The execute multiplier scales the mitigated damage.
///
/// ```text
/// damage = floor(max(1, raw − armor / divisor) × execute)
/// ```
pub fn power_damage(raw: i32, execute: f64, armor: i32, shielded: bool) -> i32 {
    let divisor = if shielded { 1 } else { 2 };
    let mitigated = (raw - armor.max(0) / divisor).max(1);
    ((mitigated as f64 * execute).floor() as i32).max(1)
}

/// Splits total damage across `hits`; earlier hits take the remainder.
pub fn split_hits(total: i32, hits: u32) -> Vec<i32> {
    let hits = hits.max(1) as i32;
    let each = total / hits;
    let remainder = total % hits;
    (0..hits)
        .map(|i| (each + i32::from(i < remainder)).max(1))
        .collect()
}

/// Health paid by a sacrifice power, floored at 1.
pub fn sacrifice_cost(max_health: i32, health_percent: f64) -> i32 {
    ((max_health as f64 * health_percent).floor() as i32).max(1)
}
