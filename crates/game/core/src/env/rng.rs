//! Deterministic random number generation.
//!
//! Every random decision in combat (variance, crit, dodge, proc chance,
//! status chance, drop rolls, enemy intent) draws from a [`CombatRoller`].
//! Given the same seed and the same ordered sequence of actions, outcomes are
//! bit-identical across runs.

use std::collections::VecDeque;

/// Source of random rolls for combat resolution.
pub trait CombatRoller {
    /// Next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Bernoulli trial. Certain outcomes (`p ≥ 1`, `p ≤ 0`) consume no roll.
    fn chance(&mut self, probability: f64) -> bool {
        if probability >= 1.0 {
            return true;
        }
        if probability <= 0.0 || probability.is_nan() {
            return false;
        }
        self.next_unit() < probability
    }

    /// Uniform value in `[min, min + width]`. A zero width consumes no roll.
    fn spread(&mut self, min: f64, width: f64) -> f64 {
        if width <= 0.0 {
            return min;
        }
        min + self.next_unit() * width
    }

    /// Uniform index in `[0, len)`.
    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_u32() as usize) % len
    }
}

impl<R: CombatRoller + ?Sized> CombatRoller for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// Uses the PCG-XSH-RR variant: 32-bit output from 64-bit state.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Mixes a base seed with a roll counter and a stream id.
///
/// The constants come from SplitMix64 / FxHash and give a full avalanche so
/// neighbouring counters produce unrelated seeds.
pub fn compute_seed(seed: u64, counter: u64, stream: u32) -> u64 {
    let mut hash = seed;
    hash ^= counter.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (stream as u64).wrapping_mul(0x517cc1b727220a95);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

/// Seeded roller used by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeededRng {
    seed: u64,
    counter: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self { seed, counter: 0 }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of rolls drawn so far.
    pub fn rolls(&self) -> u64 {
        self.counter
    }
}

impl CombatRoller for SeededRng {
    fn next_u32(&mut self) -> u32 {
        let value = PcgRng::next_u32(compute_seed(self.seed, self.counter, 0));
        self.counter = self.counter.wrapping_add(1);
        value
    }
}

/// Roller that replays a fixed list of unit rolls.
///
/// Once the script runs out every roll returns `fallback`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    rolls: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRng {
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback: 0.5,
        }
    }

    /// Roller whose every roll is `value`.
    pub fn constant(value: f64) -> Self {
        Self::new([]).with_fallback(value)
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl CombatRoller for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_unit() * u32::MAX as f64) as u32
    }

    fn next_unit(&mut self) -> f64 {
        self.rolls
            .pop_front()
            .unwrap_or(self.fallback)
            .clamp(0.0, 1.0 - f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        let left: Vec<u32> = (0..16).map(|_| a.next_u32()).collect();
        let right: Vec<u32> = (0..16).map(|_| b.next_u32()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SeededRng::new(1);
        let mut b = SeededRng::new(2);
        let left: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let right: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn unit_rolls_stay_in_range() {
        let mut rng = SeededRng::new(7);
        for _ in 0..1000 {
            let roll = rng.next_unit();
            assert!((0.0..1.0).contains(&roll));
        }
    }

    #[test]
    fn certain_chances_consume_no_rolls() {
        let mut rng = SeededRng::new(7);
        assert!(rng.chance(1.0));
        assert!(!rng.chance(0.0));
        assert_eq!(rng.spread(1.0, 0.0), 1.0);
        assert_eq!(rng.rolls(), 0);
    }

    #[test]
    fn scripted_rolls_replay_in_order() {
        let mut rng = ScriptedRng::new([0.1, 0.9]).with_fallback(0.99);
        assert!(rng.chance(0.5));
        assert!(!rng.chance(0.5));
        assert!(!rng.chance(0.5));
        assert_eq!(rng.remaining(), 0);
    }
}
