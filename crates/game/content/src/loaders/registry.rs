//! Registry assembly from loaded catalogs.

use anyhow::Context;
use combat_core::{AbilityDefinition, AbilityRegistry, EnemyTemplate};

use crate::loaders::LoadResult;
use crate::loaders::powers::PowerCatalog;

/// Builds a validated [`AbilityRegistry`] from catalog contents.
pub struct RegistryLoader;

impl RegistryLoader {
    /// Inserts every definition and checks cross references.
    ///
    /// Duplicate ids and dangling references fail the whole load.
    pub fn build(
        abilities: Vec<AbilityDefinition>,
        powers: PowerCatalog,
        enemies: Vec<EnemyTemplate>,
    ) -> LoadResult<AbilityRegistry> {
        let mut registry = AbilityRegistry::new();
        for ability in abilities {
            registry
                .insert_ability(ability)
                .context("Failed to register ability")?;
        }
        for power in powers.powers {
            registry.insert_power(power).context("Failed to register power")?;
        }
        for ability in powers.enemy_abilities {
            registry
                .insert_enemy_ability(ability)
                .context("Failed to register enemy ability")?;
        }
        for enemy in enemies {
            registry.insert_enemy(enemy).context("Failed to register enemy")?;
        }
        registry.validate().context("Content validation failed")?;

        tracing::debug!(target: "content::registry", entries = registry.len(), "registry built");
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{BaseStats, EnemyTier, RewardTable};

    fn enemy(abilities: Vec<&str>) -> EnemyTemplate {
        EnemyTemplate {
            id: "imp".into(),
            name: "Imp".into(),
            tier: EnemyTier::Normal,
            stats: BaseStats::new(30, 5, 0, 110, 0),
            rewards: RewardTable::default(),
            abilities: abilities.into_iter().map(Into::into).collect(),
            passives: Vec::new(),
        }
    }

    #[test]
    fn dangling_enemy_ability_fails() {
        let err = RegistryLoader::build(Vec::new(), PowerCatalog::default(), vec![enemy(vec![
            "firebolt",
        ])])
        .unwrap_err();
        assert!(format!("{err:#}").contains("firebolt"));
    }

    #[test]
    fn duplicate_enemy_fails() {
        let result = RegistryLoader::build(
            Vec::new(),
            PowerCatalog::default(),
            vec![enemy(Vec::new()), enemy(Vec::new())],
        );
        assert!(result.is_err());
    }
}
