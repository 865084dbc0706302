//! Power and enemy ability loader.

use std::path::Path;

use combat_core::{EnemyAbilityDefinition, PowerDefinition};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// Power catalog structure for RON files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PowerCatalog {
    pub powers: Vec<PowerDefinition>,
    pub enemy_abilities: Vec<EnemyAbilityDefinition>,
}

/// Loader for power catalogs from RON files.
pub struct PowerLoader;

impl PowerLoader {
    /// Load powers and enemy abilities from a RON file.
    pub fn load(path: &Path) -> LoadResult<PowerCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<PowerCatalog> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse power catalog RON: {}", e))
    }
}
