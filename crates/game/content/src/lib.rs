//! Data-driven combat content and loaders.
//!
//! This crate houses the default content tables and loaders for RON/TOML
//! data files:
//! - Path abilities and item effects (`abilities.ron`)
//! - Activated powers and enemy abilities (`powers.ron`)
//! - Enemy templates with untrusted stat blocks (`enemies.ron`)
//! - Playable heroes (`heroes.ron`)
//! - Combat tuning (`config.toml`)
//!
//! Content is loaded once at startup into an immutable
//! [`AbilityRegistry`](combat_core::AbilityRegistry) and never appears in
//! combat state.

pub mod specs;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use specs::{EnemySpec, HeroSpec};

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, ConfigLoader, ContentBundle, ContentFactory, EnemyLoader, HeroLoader,
    PowerLoader, RegistryLoader, embedded,
};
