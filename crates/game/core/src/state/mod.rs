//! Combatant state.
//!
//! [`Combatant`] is the only mutable model in the engine. Executors work on
//! clones and hand back new snapshots; the scheduler returns `None` when a
//! tick changed nothing.
mod buffs;
mod combatant;
mod profile;
mod status;

use std::fmt;

pub use buffs::{AttackBoosts, AttackModifier, AttackModifierKind, AttackModifiers, Buff, Shield};
pub use combatant::{Combatant, CombatantKind, InvariantViolation, effect_key};
pub use profile::{
    ComboState, EnemyIntent, EnemyProfile, EnemyTier, Enrage, PlayerProfile, RewardTable,
};
pub use status::{StatusEffect, StatusEffects, StatusKind, StatusTick};

/// Unique identifier for a combatant.
///
/// Enemy ids are never reused within a run so the death latch can key on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the player.
    pub const PLAYER: Self = Self(0);

    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }

    /// Next id in allocation order.
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
