//! Enemy template loader.

use std::path::Path;

use combat_core::EnemyTemplate;
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};
use crate::specs::EnemySpec;

/// Enemy catalog structure for RON files.
#[derive(Debug, Clone, Deserialize)]
pub struct EnemyCatalog {
    pub enemies: Vec<EnemySpec>,
}

/// Loader for enemy templates from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    /// Load enemy templates from a RON file.
    ///
    /// Corrupt stat fields do not fail the load: they are replaced by
    /// defaults and reported through `tracing`.
    pub fn load(path: &Path) -> LoadResult<Vec<EnemyTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<EnemyTemplate>> {
        let catalog: EnemyCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy catalog RON: {}", e))?;

        let templates = catalog
            .enemies
            .into_iter()
            .map(|spec| {
                let (template, warnings) = spec.into_template();
                for warning in warnings {
                    tracing::warn!(
                        target: "content::enemies",
                        enemy = %template.id,
                        %warning,
                        "enemy stat replaced"
                    );
                }
                template
            })
            .collect();
        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{BaseStats, EnemyTier};

    #[test]
    fn lenient_stats_fall_back_to_defaults() {
        let enemies = EnemyLoader::parse(
            r#"(
                enemies: [
                    (
                        id: "bandit",
                        name: "Bandit",
                        tier: elite,
                        stats: (max_health: "60", power: "strong", armor: 4, speed: true),
                        rewards: (xp: 20, gold: 8, drop_chance: 0.1),
                    ),
                ],
            )"#,
        )
        .unwrap();

        let bandit = &enemies[0];
        assert_eq!(bandit.tier, EnemyTier::Elite);
        assert_eq!(bandit.stats.max_health, 60);
        assert_eq!(bandit.stats.power, BaseStats::DEFAULT_POWER);
        assert_eq!(bandit.stats.armor, 4);
        assert_eq!(bandit.stats.speed, BaseStats::DEFAULT_SPEED);
        assert_eq!(bandit.rewards.gold, 8);
    }
}
