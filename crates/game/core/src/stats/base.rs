//! Base and derived stat blocks.
//!
//! `BaseStats` is the single source of truth: immutable inputs for one update
//! cycle plus the two current pools (health, resource). `CurrentStats` is
//! always produced by [`CurrentStats::derive`] from base values and the
//! active bonus sources.

use super::bonus::{Bonus, BonusStack, StatBounds};

/// Stats that modifiers, buffs and debuffs can target.
///
/// The health and resource pools are not listed: they change through
/// damage, healing and spending, never through modifiers.
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
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatKind {
    MaxHealth,
    Power,
    Armor,
    Speed,
    MaxResource,
    Fortune,
}

impl StatKind {
    pub const fn bounds(self) -> StatBounds {
        match self {
            Self::MaxHealth => StatBounds::MAX_HEALTH,
            Self::Power => StatBounds::POWER,
            Self::Armor => StatBounds::ARMOR,
            Self::Speed => StatBounds::SPEED,
            Self::MaxResource => StatBounds::MAX_RESOURCE,
            Self::Fortune => StatBounds::FORTUNE,
        }
    }
}

/// Source values for one update cycle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    /// Current health. May go transiently non-positive before the terminal check.
    pub health: i32,
    pub max_health: i32,
    pub power: i32,
    pub armor: i32,
    /// Percentage; 100 is baseline.
    pub speed: i32,
    /// Current path resource.
    pub resource: f64,
    pub max_resource: i32,
    /// Percentage points of crit and drop chance.
    pub fortune: i32,
}

impl BaseStats {
    pub const DEFAULT_HEALTH: i32 = 100;
    pub const DEFAULT_POWER: i32 = 10;
    pub const DEFAULT_ARMOR: i32 = 0;
    pub const DEFAULT_SPEED: i32 = 100;
    pub const DEFAULT_RESOURCE: i32 = 50;
    pub const DEFAULT_FORTUNE: i32 = 0;

    /// Full pools at the given maxima.
    pub fn new(max_health: i32, power: i32, armor: i32, speed: i32, max_resource: i32) -> Self {
        Self {
            health: max_health,
            max_health,
            power,
            armor,
            speed,
            resource: max_resource as f64,
            max_resource,
            fortune: Self::DEFAULT_FORTUNE,
        }
    }

    pub fn with_fortune(mut self, fortune: i32) -> Self {
        self.fortune = fortune;
        self
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    pub fn with_resource(mut self, resource: f64) -> Self {
        self.resource = resource;
        self
    }

    pub fn value(&self, stat: StatKind) -> i32 {
        match stat {
            StatKind::MaxHealth => self.max_health,
            StatKind::Power => self.power,
            StatKind::Armor => self.armor,
            StatKind::Speed => self.speed,
            StatKind::MaxResource => self.max_resource,
            StatKind::Fortune => self.fortune,
        }
    }
}

impl Default for BaseStats {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_HEALTH,
            Self::DEFAULT_POWER,
            Self::DEFAULT_ARMOR,
            Self::DEFAULT_SPEED,
            Self::DEFAULT_RESOURCE,
        )
    }
}

/// A persistent modifier from equipment or a passive ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub stat: StatKind,
    pub bonus: Bonus,
    /// Item or ability id that granted the modifier. Used for removal.
    pub source: String,
}

impl StatModifier {
    pub fn new(stat: StatKind, bonus: Bonus, source: impl Into<String>) -> Self {
        Self {
            stat,
            bonus,
            source: source.into(),
        }
    }
}

/// Derived stats after every bonus source has been applied.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrentStats {
    pub health: i32,
    pub max_health: i32,
    pub power: i32,
    pub armor: i32,
    pub speed: i32,
    pub resource: f64,
    pub max_resource: i32,
    pub fortune: i32,
}

impl CurrentStats {
    /// Recompute derived values from base stats and the given bonuses.
    ///
    /// Pools are mirrored from the base block and clamped to the new maxima.
    pub fn derive(base: &BaseStats, bonuses: impl IntoIterator<Item = (StatKind, Bonus)>) -> Self {
        let mut stacks: [BonusStack; 6] = Default::default();
        for (stat, bonus) in bonuses {
            stacks[Self::slot(stat)].add(bonus);
        }

        let compute = |stat: StatKind| -> i32 {
            stacks[Self::slot(stat)].apply_bounded(base.value(stat), stat.bounds())
        };

        let max_health = compute(StatKind::MaxHealth);
        let max_resource = compute(StatKind::MaxResource);

        Self {
            health: base.health.min(max_health),
            max_health,
            power: compute(StatKind::Power),
            armor: compute(StatKind::Armor),
            speed: compute(StatKind::Speed),
            resource: base.resource.clamp(0.0, max_resource as f64),
            max_resource,
            fortune: compute(StatKind::Fortune),
        }
    }

    /// Derived stats with no bonuses applied.
    pub fn from_base(base: &BaseStats) -> Self {
        Self::derive(base, core::iter::empty())
    }

    pub fn value(&self, stat: StatKind) -> i32 {
        match stat {
            StatKind::MaxHealth => self.max_health,
            StatKind::Power => self.power,
            StatKind::Armor => self.armor,
            StatKind::Speed => self.speed,
            StatKind::MaxResource => self.max_resource,
            StatKind::Fortune => self.fortune,
        }
    }

    /// Health as a fraction of max health.
    pub fn health_fraction(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health.max(0) as f64 / self.max_health as f64
    }

    /// Resource as a fraction of max resource. An empty pool reports 0.
    pub fn resource_fraction(&self) -> f64 {
        if self.max_resource <= 0 {
            return 0.0;
        }
        self.resource / self.max_resource as f64
    }

    fn slot(stat: StatKind) -> usize {
        match stat {
            StatKind::MaxHealth => 0,
            StatKind::Power => 1,
            StatKind::Armor => 2,
            StatKind::Speed => 3,
            StatKind::MaxResource => 4,
            StatKind::Fortune => 5,
        }
    }
}
