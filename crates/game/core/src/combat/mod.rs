//! Damage resolution pipeline.
//!
//! Pure functions for turning stats and rolls into damage. Nothing here
//! touches triggers or the event stream.
//!
//! # Core Functions
//!
//! - `base_damage`: power minus mitigated armor, at least 1
//! - `roll_attack`: variance, crit and bonus damage for an auto-attack
//! - `check_dodge`: speed-based dodge roll
//! - `apply_damage`: shield absorption, then health
//! - `power_output` / `power_damage`: power scaling, execute and mitigation

pub mod damage;
pub mod hit;
pub mod mitigation;
pub mod power;

pub use damage::{DamageRoll, base_damage, calculate_damage, crit_chance, roll_attack};
pub use hit::{check_dodge, dodge_chance};
pub use mitigation::{DamageApplied, apply_damage};
pub use power::{execute_multiplier, power_damage, power_output, sacrifice_cost, split_hits};
