//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their defaults, so a file only needs the values it
    /// changes.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.event_queue_capacity == 0 || config.combat_log_capacity == 0 {
            anyhow::bail!("event_queue_capacity and combat_log_capacity must be positive");
        }
        if config.cooldown_tick_ms == 0 || config.regen_tick_ms == 0 {
            anyhow::bail!("tick intervals must be positive");
        }
        Ok(config)
    }
}
