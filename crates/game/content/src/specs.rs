//! Content-side blueprints that still need validation before use.
//!
//! Stat blocks in content files are untrusted: they go through
//! [`BaseStats::ingest`], which substitutes defaults for corrupt fields and
//! reports what it replaced.

use combat_core::stats::IngestWarning;
use combat_core::{
    AbilityId, AbilityRegistry, BaseStats, Combatant, EnemyTemplate, EnemyTier, PlayerProfile,
    RawStatBlock, RegistryError, ResourceKind, RewardTable,
};

/// Enemy entry as written in `enemies.ron`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct EnemySpec {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tier: EnemyTier,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: RawStatBlock,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rewards: RewardTable,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilityId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub passives: Vec<AbilityId>,
}

impl EnemySpec {
    /// Converts into a registry template, ingesting the stat block.
    pub fn into_template(self) -> (EnemyTemplate, Vec<IngestWarning>) {
        let (stats, warnings) = BaseStats::ingest(&self.stats);
        let template = EnemyTemplate {
            id: self.id,
            name: self.name,
            tier: self.tier,
            stats,
            rewards: self.rewards,
            abilities: self.abilities,
            passives: self.passives,
        };
        (template, warnings)
    }
}

/// Playable hero as written in `heroes.ron`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct HeroSpec {
    pub id: String,
    pub name: String,
    /// Progression path, e.g. `"berserker"`.
    pub path: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resource: ResourceKind,
    #[cfg_attr(feature = "serde", serde(default = "first_level"))]
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: RawStatBlock,
    /// Path abilities in acquisition order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilityId>,
    /// Activated powers available to this hero.
    #[cfg_attr(feature = "serde", serde(default))]
    pub powers: Vec<AbilityId>,
    /// Whether alternating powers build a combo.
    #[cfg_attr(feature = "serde", serde(default))]
    pub combo: bool,
}

#[cfg(feature = "serde")]
fn first_level() -> u32 {
    1
}

impl HeroSpec {
    /// Builds the player combatant and grants its abilities in order.
    pub fn spawn(
        &self,
        registry: &AbilityRegistry,
    ) -> Result<(Combatant, Vec<IngestWarning>), RegistryError> {
        for power in &self.powers {
            if registry.power(power).is_none() {
                return Err(RegistryError::UnknownReference {
                    owner: self.id.clone(),
                    kind: "power",
                    id: power.to_string(),
                });
            }
        }

        let (stats, warnings) = BaseStats::ingest(&self.stats);
        let mut profile = PlayerProfile::new(self.level, self.path.clone());
        if self.combo {
            profile = profile.with_combo();
        }
        let mut hero = Combatant::player(self.name.clone(), stats, self.resource, profile);
        for ability in &self.abilities {
            registry.grant(&mut hero, ability.clone())?;
        }
        Ok((hero, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::stats::{Bonus, RawValue};
    use combat_core::{AbilityDefinition, Effect, EffectPayload, StatKind, TriggerKind};

    #[test]
    fn corrupt_enemy_stats_are_replaced() {
        let spec = EnemySpec {
            id: "wisp".into(),
            name: "Wisp".into(),
            stats: RawStatBlock {
                max_health: RawValue::Number(40.0),
                power: RawValue::Text("lots".into()),
                armor: RawValue::Number(-3.0),
                ..RawStatBlock::default()
            },
            ..EnemySpec::default()
        };

        let (template, warnings) = spec.into_template();
        assert_eq!(template.stats.max_health, 40);
        assert_eq!(template.stats.health, 40);
        assert_eq!(template.stats.power, BaseStats::DEFAULT_POWER);
        assert_eq!(template.stats.armor, BaseStats::DEFAULT_ARMOR);
        let fields: Vec<_> = warnings.iter().map(|w| w.field).collect();
        assert!(fields.contains(&"power"));
        assert!(fields.contains(&"armor"));
    }

    #[test]
    fn hero_spawn_grants_passives() {
        let mut registry = AbilityRegistry::new();
        registry
            .insert_ability(AbilityDefinition::new(
                "iron_skin",
                "Iron Skin",
                vec![Effect::new(
                    TriggerKind::Passive,
                    EffectPayload::StatModifier {
                        stat: StatKind::Armor,
                        bonus: Bonus::Flat(5),
                        duration: None,
                    },
                )],
            ))
            .unwrap();

        let spec = HeroSpec {
            id: "guard".into(),
            name: "Guard".into(),
            path: "bulwark".into(),
            resource: ResourceKind::Zeal,
            level: 3,
            stats: RawStatBlock {
                max_health: RawValue::Number(120.0),
                armor: RawValue::Number(2.0),
                ..RawStatBlock::default()
            },
            abilities: vec!["iron_skin".into()],
            powers: Vec::new(),
            combo: true,
        };

        let (hero, _) = spec.spawn(&registry).unwrap();
        assert_eq!(hero.current_stats.armor, 7);
        assert_eq!(hero.resource_kind, ResourceKind::Zeal);
        let profile = hero.player_profile().unwrap();
        assert_eq!(profile.level, 3);
        assert!(profile.combo_enabled);
    }

    #[test]
    fn hero_with_unknown_power_is_rejected() {
        let spec = HeroSpec {
            id: "mage".into(),
            name: "Mage".into(),
            path: "arcanist".into(),
            resource: ResourceKind::Mana,
            level: 1,
            stats: RawStatBlock::default(),
            abilities: Vec::new(),
            powers: vec!["meteor".into()],
            combo: false,
        };
        assert!(matches!(
            spec.spawn(&AbilityRegistry::new()),
            Err(RegistryError::UnknownReference { kind: "power", .. })
        ));
    }
}
