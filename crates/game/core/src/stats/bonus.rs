//! Layered stat bonuses.
//!
//! A derived stat is `base`, plus flat bonuses, scaled by the summed
//! percentage increases, then by each `More` and `Less` factor in turn, and
//! finally clamped to the stat's [`StatBounds`].

/// One contribution to a derived stat. Percentages are whole numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bonus {
    /// Added to the base before any scaling.
    Flat(i32),
    /// `20` means +20%. All increases share one multiplier.
    Increased(i32),
    /// `50` means ×1.5, `-20` means ×0.8. Each one compounds.
    More(i32),
    /// `10` means ×0.9. Each one compounds.
    Less(i32),
}

impl Bonus {
    pub fn flat(value: i32) -> Self {
        Self::Flat(value)
    }

    pub fn increased(percent: i32) -> Self {
        Self::Increased(percent)
    }

    pub fn more(percent: i32) -> Self {
        Self::More(percent)
    }

    pub fn less(percent: i32) -> Self {
        Self::Less(percent)
    }

    /// `1.25` becomes `More(25)`, `0.8` becomes `More(-20)`.
    pub fn from_multiplier(multiplier: f64) -> Self {
        Self::More(((multiplier - 1.0) * 100.0).round() as i32)
    }
}

/// Running totals for a single stat.
///
/// Flat and increased bonuses are order-free and kept as sums; the
/// compounding factors are kept in arrival order.
///
/// ```
/// # use combat_core::stats::bonus::{Bonus, BonusStack};
/// let mut stack = BonusStack::new();
/// stack.add(Bonus::flat(5));
/// stack.add(Bonus::increased(20));
/// stack.add(Bonus::increased(15));
/// stack.add(Bonus::more(50));
/// stack.add(Bonus::less(10));
///
/// // (10 + 5) × 1.35 = 20, × 1.5 = 30, × 0.9 = 27
/// assert_eq!(stack.apply(10, 5, 100), 27);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BonusStack {
    flat: i64,
    increased: i64,
    factors: Vec<i64>,
}

impl BonusStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bonus: Bonus) {
        match bonus {
            Bonus::Flat(value) => self.flat += i64::from(value),
            Bonus::Increased(percent) => self.increased += i64::from(percent),
            Bonus::More(percent) => self.factors.push(100 + i64::from(percent)),
            Bonus::Less(percent) => self.factors.push(100 - i64::from(percent)),
        }
    }

    /// Scales `base` through every bonus and clamps into `min..=max`.
    ///
    /// Each step truncates toward zero. Math runs in `i64`.
    pub fn apply(&self, base: i32, min: i32, max: i32) -> i32 {
        let mut value = i64::from(base) + self.flat;
        if self.increased != 0 {
            value = value * (100 + self.increased) / 100;
        }
        for factor in &self.factors {
            value = value * factor / 100;
        }
        value.clamp(i64::from(min), i64::from(max)) as i32
    }

    pub fn apply_bounded(&self, base: i32, bounds: StatBounds) -> i32 {
        self.apply(base, bounds.min, bounds.max)
    }

    pub fn is_empty(&self) -> bool {
        self.flat == 0 && self.increased == 0 && self.factors.is_empty()
    }
}

impl Extend<Bonus> for BonusStack {
    fn extend<I: IntoIterator<Item = Bonus>>(&mut self, bonuses: I) {
        for bonus in bonuses {
            self.add(bonus);
        }
    }
}

impl FromIterator<Bonus> for BonusStack {
    fn from_iter<I: IntoIterator<Item = Bonus>>(bonuses: I) -> Self {
        let mut stack = Self::new();
        stack.extend(bonuses);
        stack
    }
}

/// Clamp range for a derived stat.
#[derive(Clone, Copy, Debug)]
pub struct StatBounds {
    pub min: i32,
    pub max: i32,
}

impl StatBounds {
    /// Floor of 1 keeps health-percentage conditions defined.
    pub const MAX_HEALTH: Self = Self { min: 1, max: 999_999 };
    pub const POWER: Self = Self { min: 0, max: 99_999 };
    pub const ARMOR: Self = Self { min: 0, max: 99_999 };
    /// Percent of baseline speed.
    pub const SPEED: Self = Self { min: 10, max: 500 };
    pub const MAX_RESOURCE: Self = Self { min: 0, max: 99_999 };
    /// Percentage points of crit and drop chance.
    pub const FORTUNE: Self = Self { min: 0, max: 100 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_bonuses_leave_base_untouched() {
        let stack = BonusStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.apply(42, 0, 100), 42);
    }

    #[test]
    fn flat_lands_before_increases() {
        let stack: BonusStack = [Bonus::increased(50), Bonus::flat(10)].into_iter().collect();
        assert_eq!(stack.apply(20, 0, 1000), 45);
    }

    #[test]
    fn increases_share_one_multiplier() {
        let stack: BonusStack = [Bonus::increased(50), Bonus::increased(50)].into_iter().collect();
        assert_eq!(stack.apply(100, 0, 1000), 200);
    }

    #[test]
    fn more_factors_compound() {
        let stack: BonusStack = [Bonus::more(50), Bonus::more(50)].into_iter().collect();
        assert_eq!(stack.apply(100, 0, 1000), 225);
    }

    #[test]
    fn result_is_clamped() {
        let stack: BonusStack = std::iter::once(Bonus::flat(-500)).collect();
        assert_eq!(stack.apply_bounded(100, StatBounds::MAX_HEALTH), 1);
    }

    #[test]
    fn multipliers_map_to_more() {
        assert_eq!(Bonus::from_multiplier(1.25), Bonus::More(25));
        assert_eq!(Bonus::from_multiplier(0.8), Bonus::More(-20));
    }
}
