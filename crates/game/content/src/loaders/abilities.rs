//! Path ability and item effect loader.

use std::path::Path;

use combat_core::AbilityDefinition;
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// Ability catalog structure for RON files.
#[derive(Debug, Clone, Deserialize)]
pub struct AbilityCatalog {
    pub abilities: Vec<AbilityDefinition>,
}

/// Loader for ability catalogs from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Load ability catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<AbilityDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<AbilityDefinition>> {
        let catalog: AbilityCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;

        Ok(catalog.abilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{Condition, EffectPayload, TriggerKind};

    #[test]
    fn parses_triggers_conditions_and_payloads() {
        let abilities = AbilityLoader::parse(
            r#"(
                abilities: [
                    (
                        id: "second_wind",
                        name: "Second Wind",
                        effects: [
                            (
                                trigger: on_damaged,
                                condition: Some(HealthBelow(0.3)),
                                internal_cooldown: Some(10.0),
                                payload: Heal(MaxHealth(0.2)),
                            ),
                        ],
                    ),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(abilities.len(), 1);
        let effect = &abilities[0].effects[0];
        assert_eq!(effect.trigger, TriggerKind::OnDamaged);
        assert_eq!(effect.condition, Some(Condition::HealthBelow(0.3)));
        assert_eq!(effect.chance, None);
        assert!(matches!(effect.payload, EffectPayload::Heal(_)));
    }

    #[test]
    fn malformed_catalog_is_an_error() {
        let err = AbilityLoader::parse("(abilities: [ (id: 3) ])").unwrap_err();
        assert!(err.to_string().contains("ability catalog"));
    }
}
