//! Content loaders for reading combat data from files.
//!
//! Every loader offers `load(path)` for files on disk and `parse(text)` for
//! embedded or in-memory content.

pub mod abilities;
pub mod config;
pub mod embedded;
pub mod enemies;
pub mod factory;
pub mod heroes;
pub mod powers;
pub mod registry;

pub use abilities::AbilityLoader;
pub use config::ConfigLoader;
pub use enemies::EnemyLoader;
pub use factory::{ContentBundle, ContentFactory};
pub use heroes::HeroLoader;
pub use powers::PowerLoader;
pub use registry::RegistryLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
