//! Shield absorption and health application.

use crate::state::Combatant;

/// What a hit did to its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageApplied {
    pub absorbed: i32,
    /// Damage that reached health.
    pub dealt: i32,
}

impl DamageApplied {
    pub fn total(&self) -> i32 {
        self.absorbed + self.dealt
    }
}

/// Applies damage to a target: the shield absorbs first, the rest hits health.
///
/// ```text
/// absorbed  = min(shield.amount, damage)
/// remaining = damage − absorbed
/// ```
pub fn apply_damage(target: &mut Combatant, damage: i32) -> DamageApplied {
    if damage <= 0 {
        return DamageApplied::default();
    }
    let (absorbed, remaining) = target.absorb(damage);
    let dealt = target.lose_health(remaining);
    DamageApplied { absorbed, dealt }
}
