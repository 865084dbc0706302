//! Turn-counted status effects.
//!
//! Status effects are ticked once per turn of their owner (in the action
//! pre-effects stage). Damage-over-time kinds deal their damage before the
//! duration is decremented; an effect whose remaining turns reach zero is
//! removed in the same tick.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;

/// Types of status effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatusKind {
    /// Damage over time.
    Poison,
    /// Skips the owner's next action.
    Stun,
    /// Reduces speed.
    Slow,
    /// Damage over time.
    Bleed,
}

impl StatusKind {
    pub const fn deals_damage(self) -> bool {
        matches!(self, Self::Poison | Self::Bleed)
    }
}

/// A single status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Damage per tick for damage-over-time kinds; ignored otherwise.
    pub damage: i32,
    pub remaining_turns: u32,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, damage: i32, remaining_turns: u32) -> Self {
        Self {
            kind,
            damage,
            remaining_turns,
        }
    }
}

/// What a single status tick did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusTick {
    /// Damage dealt, per damaging effect, in application order.
    pub damage: Vec<(StatusKind, i32)>,
    pub expired: Vec<StatusKind>,
}

impl StatusTick {
    pub fn total_damage(&self) -> i32 {
        self.damage.iter().map(|(_, amount)| amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.damage.is_empty() && self.expired.is_empty()
    }
}

/// Active status effects on a combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { CombatConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Adds a status effect.
    ///
    /// Reapplying an existing kind refreshes it to the longer duration and the
    /// stronger damage. Returns false if the set is full and the effect was
    /// dropped.
    pub fn apply(&mut self, effect: StatusEffect) -> bool {
        if effect.remaining_turns == 0 {
            return false;
        }

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            existing.remaining_turns = existing.remaining_turns.max(effect.remaining_turns);
            existing.damage = existing.damage.max(effect.damage);
            return true;
        }

        self.effects.try_push(effect).is_ok()
    }

    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    /// Removes every effect. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.effects.len();
        self.effects.clear();
        count
    }

    /// Advances every effect by one turn.
    pub fn tick(&mut self) -> StatusTick {
        let mut tick = StatusTick::default();

        for effect in self.effects.iter_mut() {
            if effect.kind.deals_damage() && effect.damage > 0 {
                tick.damage.push((effect.kind, effect.damage));
            }
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
            if effect.remaining_turns == 0 {
                tick.expired.push(effect.kind);
            }
        }

        self.effects.retain(|e| e.remaining_turns > 0);
        tick
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poison_expires_after_its_duration() {
        let mut statuses = StatusEffects::empty();
        statuses.apply(StatusEffect::new(StatusKind::Poison, 5, 3));

        let total: i32 = (0..3).map(|_| statuses.tick().total_damage()).sum();
        assert_eq!(total, 15);
        assert!(statuses.is_empty());

        let fourth = statuses.tick();
        assert_eq!(fourth.total_damage(), 0);
        assert!(fourth.is_empty());
    }

    #[test]
    fn reapply_refreshes_instead_of_stacking() {
        let mut statuses = StatusEffects::empty();
        statuses.apply(StatusEffect::new(StatusKind::Bleed, 3, 2));
        statuses.apply(StatusEffect::new(StatusKind::Bleed, 2, 4));

        assert_eq!(statuses.len(), 1);
        let bleed = statuses.get(StatusKind::Bleed).unwrap();
        assert_eq!(bleed.damage, 3);
        assert_eq!(bleed.remaining_turns, 4);
    }

    #[test]
    fn stun_deals_no_damage_but_expires() {
        let mut statuses = StatusEffects::empty();
        statuses.apply(StatusEffect::new(StatusKind::Stun, 0, 1));

        let tick = statuses.tick();
        assert!(tick.damage.is_empty());
        assert_eq!(tick.expired, vec![StatusKind::Stun]);
        assert!(!statuses.has(StatusKind::Stun));
    }

    #[test]
    fn zero_duration_is_ignored() {
        let mut statuses = StatusEffects::empty();
        assert!(!statuses.apply(StatusEffect::new(StatusKind::Slow, 0, 0)));
        assert!(statuses.is_empty());
    }
}
