use std::collections::BTreeMap;

use super::buffs::{AttackModifiers, Buff, Shield};
use super::profile::{EnemyProfile, PlayerProfile};
use super::status::{StatusEffects, StatusKind};
use super::EntityId;
use crate::ability::AbilityId;
use crate::stats::{BaseStats, Bonus, CurrentStats, ResourceKind, StatKind, StatModifier};

/// Player or enemy specific data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombatantKind {
    Player(PlayerProfile),
    Enemy(EnemyProfile),
}

/// A participant in combat.
///
/// # Invariants
///
/// - `current_stats` always reflects `base_stats`, `modifiers`, `active_buffs`,
///   enrage and slow. Call [`Combatant::recompute_stats`] after touching any of them.
/// - `0 ≤ resource ≤ max_resource`, cooldowns are never negative.
/// - Health may go non-positive between a hit and the terminal check.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: EntityId,
    pub name: String,
    pub kind: CombatantKind,
    pub resource_kind: ResourceKind,

    // SSOT
    pub base_stats: BaseStats,
    pub modifiers: Vec<StatModifier>,

    // Derived
    pub current_stats: CurrentStats,

    pub status_effects: StatusEffects,
    pub active_buffs: Vec<Buff>,
    /// Remaining power cooldowns in seconds.
    pub cooldowns: BTreeMap<AbilityId, f64>,
    pub ability_counters: BTreeMap<String, i64>,
    /// Remaining internal cooldowns in seconds, keyed by [`effect_key`].
    pub internal_cooldowns: BTreeMap<String, f64>,
    pub attack_modifiers: AttackModifiers,
    pub shield: Option<Shield>,
    /// Owned abilities in acquisition order.
    pub owned_abilities: Vec<AbilityId>,
    pub is_dying: bool,
}

/// Key identifying one effect of one ability.
pub fn effect_key(ability: &AbilityId, index: usize) -> String {
    format!("{ability}#{index}")
}

impl Combatant {
    /// Speed reduction while slowed, in percent.
    pub const SLOW_SPEED_PENALTY: i32 = 30;

    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        kind: CombatantKind,
        resource_kind: ResourceKind,
        base_stats: BaseStats,
    ) -> Self {
        let current_stats = CurrentStats::from_base(&base_stats);
        let mut combatant = Self {
            id,
            name: name.into(),
            kind,
            resource_kind,
            base_stats,
            modifiers: Vec::new(),
            current_stats,
            status_effects: StatusEffects::empty(),
            active_buffs: Vec::new(),
            cooldowns: BTreeMap::new(),
            ability_counters: BTreeMap::new(),
            internal_cooldowns: BTreeMap::new(),
            attack_modifiers: AttackModifiers::default(),
            shield: None,
            owned_abilities: Vec::new(),
            is_dying: false,
        };
        combatant.recompute_stats();
        combatant
    }

    pub fn player(
        name: impl Into<String>,
        base_stats: BaseStats,
        resource_kind: ResourceKind,
        profile: PlayerProfile,
    ) -> Self {
        Self::new(
            EntityId::PLAYER,
            name,
            CombatantKind::Player(profile),
            resource_kind,
            base_stats,
        )
    }

    pub fn enemy(
        id: EntityId,
        name: impl Into<String>,
        base_stats: BaseStats,
        profile: EnemyProfile,
    ) -> Self {
        Self::new(
            id,
            name,
            CombatantKind::Enemy(profile),
            ResourceKind::Mana,
            base_stats,
        )
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, CombatantKind::Player(_))
    }

    pub fn player_profile(&self) -> Option<&PlayerProfile> {
        match &self.kind {
            CombatantKind::Player(profile) => Some(profile),
            CombatantKind::Enemy(_) => None,
        }
    }

    pub fn player_profile_mut(&mut self) -> Option<&mut PlayerProfile> {
        match &mut self.kind {
            CombatantKind::Player(profile) => Some(profile),
            CombatantKind::Enemy(_) => None,
        }
    }

    pub fn enemy_profile(&self) -> Option<&EnemyProfile> {
        match &self.kind {
            CombatantKind::Enemy(profile) => Some(profile),
            CombatantKind::Player(_) => None,
        }
    }

    pub fn enemy_profile_mut(&mut self) -> Option<&mut EnemyProfile> {
        match &mut self.kind {
            CombatantKind::Enemy(profile) => Some(profile),
            CombatantKind::Player(_) => None,
        }
    }

    // ========================================================================
    // Derived stats
    // ========================================================================

    /// Rebuilds `current_stats` from every bonus source and clamps the pools.
    pub fn recompute_stats(&mut self) {
        self.current_stats = CurrentStats::derive(&self.base_stats, self.bonus_sources());
        self.base_stats.health = self.current_stats.health;
        self.base_stats.resource = self.current_stats.resource;
    }

    pub fn health(&self) -> i32 {
        self.current_stats.health
    }

    pub fn max_health(&self) -> i32 {
        self.current_stats.max_health
    }

    pub fn resource(&self) -> f64 {
        self.current_stats.resource
    }

    pub fn max_resource(&self) -> f64 {
        self.current_stats.max_resource as f64
    }

    pub fn is_alive(&self) -> bool {
        self.health() > 0
    }

    pub fn is_stunned(&self) -> bool {
        self.status_effects.has(StatusKind::Stun)
    }

    /// Active shield, if any.
    pub fn active_shield(&self) -> Option<&Shield> {
        self.shield.as_ref().filter(|s| s.is_active())
    }

    pub fn is_shielded(&self) -> bool {
        self.active_shield().is_some()
    }

    // ========================================================================
    // Pools
    // ========================================================================

    fn set_health(&mut self, health: i32) {
        self.base_stats.health = health;
        self.current_stats.health = health;
    }

    fn set_resource(&mut self, resource: f64) {
        let clamped = resource.clamp(0.0, self.max_resource());
        self.base_stats.resource = clamped;
        self.current_stats.resource = clamped;
    }

    /// Removes health without clamping at zero. Returns the amount removed.
    pub fn lose_health(&mut self, amount: i32) -> i32 {
        let amount = amount.max(0);
        self.set_health(self.health().saturating_sub(amount));
        amount
    }

    /// Restores health up to max. Returns the amount actually healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if amount <= 0 || self.is_dying {
            return 0;
        }
        let before = self.health();
        let after = before.saturating_add(amount).min(self.max_health());
        self.set_health(after.max(before));
        self.health() - before
    }

    /// Clamps health at zero after the terminal transition.
    pub fn settle_health(&mut self) {
        if self.health() < 0 {
            self.set_health(0);
        }
    }

    /// Restores resource up to max. Returns the amount actually restored.
    pub fn restore_resource(&mut self, amount: f64) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        let before = self.resource();
        self.set_resource(before + amount);
        self.resource() - before
    }

    /// Spends resource. Refuses (returns false) without mutation if the pool is short.
    pub fn spend_resource(&mut self, cost: f64) -> bool {
        if cost <= 0.0 {
            return true;
        }
        if self.resource() + f64::EPSILON < cost {
            return false;
        }
        self.set_resource(self.resource() - cost);
        true
    }

    /// Absorbs damage with the active shield. Returns `(absorbed, remaining)`.
    pub fn absorb(&mut self, damage: i32) -> (i32, i32) {
        let Some(shield) = self.shield.as_mut().filter(|s| s.is_active()) else {
            return (0, damage);
        };
        let absorbed = shield.amount.min(damage.max(0));
        shield.amount -= absorbed;
        if shield.amount <= 0 {
            self.shield = None;
        }
        (absorbed, damage - absorbed)
    }

    /// Grants a shield. Amounts stack; the longer duration wins.
    pub fn grant_shield(&mut self, amount: i32, duration: f64) {
        if amount <= 0 || duration <= 0.0 {
            return;
        }
        self.shield = Some(match self.active_shield() {
            Some(existing) => Shield::new(existing.amount + amount, existing.remaining.max(duration)),
            None => Shield::new(amount, duration),
        });
    }

    // ========================================================================
    // Buffs and modifiers
    // ========================================================================

    /// Adds a buff, refreshing any buff from the same source on the same stat.
    pub fn add_buff(&mut self, buff: Buff) {
        if let Some(existing) = self
            .active_buffs
            .iter_mut()
            .find(|b| b.stat == buff.stat && b.source == buff.source)
        {
            *existing = buff;
        } else {
            self.active_buffs.push(buff);
        }
        self.recompute_stats();
    }

    /// Adds a permanent modifier, replacing one with the same source and stat.
    pub fn add_modifier(&mut self, modifier: StatModifier) {
        self.modifiers
            .retain(|m| !(m.stat == modifier.stat && m.source == modifier.source));
        self.modifiers.push(modifier);
        self.recompute_stats();
    }

    pub fn remove_modifiers_from(&mut self, source: &str) {
        let before = self.modifiers.len();
        self.modifiers.retain(|m| m.source != source);
        if self.modifiers.len() != before {
            self.recompute_stats();
        }
    }

    // ========================================================================
    // Abilities, cooldowns, counters
    // ========================================================================

    pub fn owns(&self, ability: &AbilityId) -> bool {
        self.owned_abilities.contains(ability)
    }

    /// Records an ability as owned. Returns false if it already was.
    pub fn acquire(&mut self, ability: AbilityId) -> bool {
        if self.owns(&ability) {
            return false;
        }
        self.owned_abilities.push(ability);
        true
    }

    pub fn cooldown(&self, power: &AbilityId) -> f64 {
        self.cooldowns.get(power).copied().unwrap_or(0.0)
    }

    pub fn start_cooldown(&mut self, power: &AbilityId, seconds: f64) {
        if seconds > 0.0 {
            self.cooldowns.insert(power.clone(), seconds);
        }
    }

    pub fn counter(&self, name: &str) -> i64 {
        self.ability_counters.get(name).copied().unwrap_or(0)
    }

    pub fn increment_counter(&mut self, name: &str) -> i64 {
        let value = self.ability_counters.entry(name.to_owned()).or_insert(0);
        *value += 1;
        *value
    }

    pub fn reset_counter(&mut self, name: &str) {
        self.ability_counters.remove(name);
    }

    pub fn internal_cooldown(&self, key: &str) -> f64 {
        self.internal_cooldowns.get(key).copied().unwrap_or(0.0)
    }

    /// Resets per-encounter state (statuses, buffs, shield, cooldowns, counters).
    pub fn reset_for_encounter(&mut self) {
        self.status_effects.clear();
        self.active_buffs.clear();
        self.shield = None;
        self.cooldowns.clear();
        self.internal_cooldowns.clear();
        self.ability_counters.clear();
        self.attack_modifiers = AttackModifiers::default();
        if let Some(profile) = self.player_profile_mut() {
            profile.combo.reset();
        }
        self.recompute_stats();
    }

    /// Checks the model invariants. Returns every violation found.
    pub fn validate(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        if self.current_stats != CurrentStats::derive(&self.base_stats, self.bonus_sources()) {
            violations.push(InvariantViolation::StaleStats);
        }
        if self.is_dying && self.health() < 0 {
            violations.push(InvariantViolation::NegativeHealth(self.health()));
        }
        let resource = self.resource();
        if !(0.0..=self.max_resource()).contains(&resource) {
            violations.push(InvariantViolation::ResourceOutOfRange(resource));
        }
        for (id, remaining) in &self.cooldowns {
            if *remaining < 0.0 {
                violations.push(InvariantViolation::NegativeCooldown(id.clone()));
            }
        }
        if self.active_buffs.iter().any(Buff::is_expired) {
            violations.push(InvariantViolation::ExpiredBuff);
        }
        if self.attack_modifiers.iter().any(|m| m.remaining_uses == 0) {
            violations.push(InvariantViolation::SpentAttackModifier);
        }

        violations
    }

    fn bonus_sources(&self) -> Vec<(StatKind, Bonus)> {
        let mut bonuses: Vec<(StatKind, Bonus)> = self
            .modifiers
            .iter()
            .map(|m| (m.stat, m.bonus))
            .chain(self.active_buffs.iter().map(|b| (b.stat, b.bonus)))
            .collect();
        if let Some(enrage) = self.enemy_profile().and_then(|p| p.enrage) {
            bonuses.push((StatKind::Power, Bonus::from_multiplier(enrage.power_multiplier)));
        }
        if self.status_effects.has(StatusKind::Slow) {
            bonuses.push((StatKind::Speed, Bonus::less(Self::SLOW_SPEED_PENALTY)));
        }
        bonuses
    }
}

/// Broken combatant invariant.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("current stats do not match a fresh recompute")]
    StaleStats,

    #[error("health {0} is negative after the terminal transition")]
    NegativeHealth(i32),

    #[error("resource {0} is outside [0, max]")]
    ResourceOutOfRange(f64),

    #[error("cooldown for {0} is negative")]
    NegativeCooldown(AbilityId),

    #[error("an expired buff is still active")]
    ExpiredBuff,

    #[error("an attack modifier with no uses is still active")]
    SpentAttackModifier,
}
