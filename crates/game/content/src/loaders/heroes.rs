//! Hero loader.

use std::path::Path;

use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};
use crate::specs::HeroSpec;

/// Hero catalog structure for RON files.
#[derive(Debug, Clone, Deserialize)]
pub struct HeroCatalog {
    pub heroes: Vec<HeroSpec>,
}

/// Loader for playable heroes from RON files.
pub struct HeroLoader;

impl HeroLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<HeroSpec>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<HeroSpec>> {
        let catalog: HeroCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse hero catalog RON: {}", e))?;

        Ok(catalog.heroes)
    }
}
