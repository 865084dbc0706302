//! Content factory for building the registry and config from data files.

use std::path::{Path, PathBuf};

use combat_core::{AbilityDefinition, AbilityRegistry, CombatConfig, EnemyTemplate};

use crate::loaders::powers::PowerCatalog;
use crate::loaders::{
    AbilityLoader, ConfigLoader, EnemyLoader, HeroLoader, LoadResult, PowerLoader, RegistryLoader,
};
use crate::specs::HeroSpec;

/// Everything a combat engine needs to start.
#[derive(Clone, Debug)]
pub struct ContentBundle {
    pub config: CombatConfig,
    pub registry: AbilityRegistry,
    pub heroes: Vec<HeroSpec>,
}

impl ContentBundle {
    pub fn hero(&self, id: &str) -> Option<&HeroSpec> {
        self.heroes.iter().find(|hero| hero.id == id)
    }
}

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── abilities.ron
/// ├── powers.ron
/// ├── enemies.ron
/// └── heroes.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat tuning from `config.toml`.
    ///
    /// A missing file is not an error: the built-in defaults apply.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(target: "content::factory", path = %path.display(), "no config file, using defaults");
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load abilities from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<Vec<AbilityDefinition>> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    /// Load powers and enemy abilities from `powers.ron`.
    pub fn load_powers(&self) -> LoadResult<PowerCatalog> {
        PowerLoader::load(&self.data_dir.join("powers.ron"))
    }

    /// Load enemy templates from `enemies.ron`.
    pub fn load_enemies(&self) -> LoadResult<Vec<EnemyTemplate>> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"))
    }

    /// Load heroes from `heroes.ron`.
    pub fn load_heroes(&self) -> LoadResult<Vec<HeroSpec>> {
        HeroLoader::load(&self.data_dir.join("heroes.ron"))
    }

    /// Load and validate the registry.
    pub fn load_registry(&self) -> LoadResult<AbilityRegistry> {
        RegistryLoader::build(
            self.load_abilities()?,
            self.load_powers()?,
            self.load_enemies()?,
        )
    }

    /// Load everything.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let bundle = ContentBundle {
            config: self.load_config()?,
            registry: self.load_registry()?,
            heroes: self.load_heroes()?,
        };
        tracing::info!(
            target: "content::factory",
            dir = %self.data_dir.display(),
            entries = bundle.registry.len(),
            heroes = bundle.heroes.len(),
            "content loaded"
        );
        Ok(bundle)
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_factory_creation() {
        let factory = ContentFactory::new("/tmp/test");
        assert_eq!(factory.data_dir(), Path::new("/tmp/test"));
    }

    #[test]
    fn loads_a_minimal_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("abilities.ron"), "(abilities: [])").unwrap();
        fs::write(dir.path().join("powers.ron"), "()").unwrap();
        fs::write(
            dir.path().join("enemies.ron"),
            r#"(enemies: [(id: "slime", name: "Slime", stats: (max_health: 20))])"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("heroes.ron"),
            r#"(heroes: [(id: "squire", name: "Squire", path: "knight")])"#,
        )
        .unwrap();

        let bundle = ContentFactory::new(dir.path()).load_bundle().unwrap();
        assert_eq!(bundle.config, CombatConfig::default());
        assert_eq!(
            bundle.registry.enemy_template("slime").unwrap().stats.max_health,
            20
        );
        assert_eq!(bundle.hero("squire").unwrap().level, 1);
        assert!(bundle.hero("wizard").is_none());
    }

    #[test]
    fn missing_catalog_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentFactory::new(dir.path()).load_abilities().unwrap_err();
        assert!(err.to_string().contains("abilities.ron"));
    }
}
