//! Environment facts the engine reads but never owns.
//!
//! Randomness is the only environmental input of the combat core: content
//! tables are passed in as an [`AbilityRegistry`](crate::ability::AbilityRegistry)
//! and time arrives as explicit elapsed durations.
mod rng;

pub use rng::{CombatRoller, PcgRng, ScriptedRng, SeededRng, compute_seed};
