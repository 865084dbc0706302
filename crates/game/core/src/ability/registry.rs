use std::collections::{BTreeMap, HashMap};

use super::{
    AbilityDefinition, AbilityId, EffectPayload, EnemyAbilityDefinition, EnemyTemplate,
    PowerDefinition, PowerModifierKind, PowerTuning, TriggerKind,
};
use crate::error::{CombatFault, ErrorSeverity};
use crate::state::{Combatant, EnemyProfile, EntityId};
use crate::stats::StatModifier;

/// Errors raised while building or querying the registry.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate {kind} id `{id}`")]
    Duplicate { kind: &'static str, id: String },

    #[error("{owner} references unknown {kind} `{id}`")]
    UnknownReference {
        owner: String,
        kind: &'static str,
        id: String,
    },

    #[error("{id}: {reason}")]
    InvalidValue { id: String, reason: &'static str },
}

impl CombatFault for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Duplicate { .. } => "REGISTRY_DUPLICATE",
            Self::UnknownReference { .. } => "REGISTRY_UNKNOWN_REFERENCE",
            Self::InvalidValue { .. } => "REGISTRY_INVALID_VALUE",
        }
    }
}

/// Immutable content tables keyed by string id.
///
/// Built once at startup (usually by `combat-content`) and shared read-only.
#[derive(Clone, Debug, Default)]
pub struct AbilityRegistry {
    abilities: HashMap<AbilityId, AbilityDefinition>,
    powers: HashMap<AbilityId, PowerDefinition>,
    enemy_abilities: HashMap<AbilityId, EnemyAbilityDefinition>,
    enemies: BTreeMap<String, EnemyTemplate>,
}

impl AbilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_ability(&mut self, ability: AbilityDefinition) -> Result<(), RegistryError> {
        if self.abilities.contains_key(&ability.id) {
            return Err(RegistryError::Duplicate {
                kind: "ability",
                id: ability.id.to_string(),
            });
        }
        self.abilities.insert(ability.id.clone(), ability);
        Ok(())
    }

    pub fn insert_power(&mut self, power: PowerDefinition) -> Result<(), RegistryError> {
        if self.powers.contains_key(&power.id) {
            return Err(RegistryError::Duplicate {
                kind: "power",
                id: power.id.to_string(),
            });
        }
        self.powers.insert(power.id.clone(), power);
        Ok(())
    }

    pub fn insert_enemy_ability(
        &mut self,
        ability: EnemyAbilityDefinition,
    ) -> Result<(), RegistryError> {
        if self.enemy_abilities.contains_key(&ability.id) {
            return Err(RegistryError::Duplicate {
                kind: "enemy ability",
                id: ability.id.to_string(),
            });
        }
        self.enemy_abilities.insert(ability.id.clone(), ability);
        Ok(())
    }

    pub fn insert_enemy(&mut self, template: EnemyTemplate) -> Result<(), RegistryError> {
        if self.enemies.contains_key(&template.id) {
            return Err(RegistryError::Duplicate {
                kind: "enemy",
                id: template.id.clone(),
            });
        }
        self.enemies.insert(template.id.clone(), template);
        Ok(())
    }

    pub fn ability(&self, id: &AbilityId) -> Option<&AbilityDefinition> {
        self.abilities.get(id)
    }

    pub fn power(&self, id: &AbilityId) -> Option<&PowerDefinition> {
        self.powers.get(id)
    }

    pub fn enemy_ability(&self, id: &AbilityId) -> Option<&EnemyAbilityDefinition> {
        self.enemy_abilities.get(id)
    }

    pub fn enemy_template(&self, id: &str) -> Option<&EnemyTemplate> {
        self.enemies.get(id)
    }

    /// Enemy template ids in sorted order.
    pub fn enemy_ids(&self) -> impl Iterator<Item = &str> {
        self.enemies.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.abilities.len() + self.powers.len() + self.enemy_abilities.len() + self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks cross references and value ranges.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for ability in self.abilities.values() {
            for effect in &ability.effects {
                if let Some(chance) = effect.chance {
                    if !(0.0..=1.0).contains(&chance) {
                        return Err(RegistryError::InvalidValue {
                            id: ability.id.to_string(),
                            reason: "proc chance must be within [0, 1]",
                        });
                    }
                }
                if effect.internal_cooldown.is_some_and(|icd| icd < 0.0) {
                    return Err(RegistryError::InvalidValue {
                        id: ability.id.to_string(),
                        reason: "internal cooldown must not be negative",
                    });
                }
                if let EffectPayload::PowerModifier(modifier) = &effect.payload {
                    if let Some(power) = &modifier.power {
                        if !self.powers.contains_key(power) {
                            return Err(RegistryError::UnknownReference {
                                owner: ability.id.to_string(),
                                kind: "power",
                                id: power.to_string(),
                            });
                        }
                    }
                }
            }
        }

        for power in self.powers.values() {
            if power.cost < 0.0 || power.cooldown < 0.0 {
                return Err(RegistryError::InvalidValue {
                    id: power.id.to_string(),
                    reason: "cost and cooldown must not be negative",
                });
            }
        }

        for template in self.enemies.values() {
            for ability in &template.abilities {
                if !self.enemy_abilities.contains_key(ability) {
                    return Err(RegistryError::UnknownReference {
                        owner: template.id.clone(),
                        kind: "enemy ability",
                        id: ability.to_string(),
                    });
                }
            }
            for passive in &template.passives {
                if !self.abilities.contains_key(passive) {
                    return Err(RegistryError::UnknownReference {
                        owner: template.id.clone(),
                        kind: "ability",
                        id: passive.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    // ========================================================================
    // Passive folding
    // ========================================================================

    /// Permanent stat modifiers contributed by the passive effects of `ability`.
    pub fn passive_modifiers(&self, ability: &AbilityId) -> Vec<StatModifier> {
        let Some(definition) = self.abilities.get(ability) else {
            return Vec::new();
        };
        definition
            .effects_for(TriggerKind::Passive)
            .filter_map(|(_, effect)| match &effect.payload {
                EffectPayload::StatModifier { stat, bonus, .. } => {
                    Some(StatModifier::new(*stat, *bonus, ability.as_str()))
                }
                _ => None,
            })
            .collect()
    }

    /// Grants an ability to a combatant and folds its passive modifiers into stats.
    ///
    /// Returns false if the combatant already owned it.
    pub fn grant(&self, combatant: &mut Combatant, ability: AbilityId) -> Result<bool, RegistryError> {
        if !self.abilities.contains_key(&ability) {
            return Err(RegistryError::UnknownReference {
                owner: combatant.name.clone(),
                kind: "ability",
                id: ability.to_string(),
            });
        }
        let modifiers = self.passive_modifiers(&ability);
        if !combatant.acquire(ability) {
            return Ok(false);
        }
        for modifier in modifiers {
            combatant.add_modifier(modifier);
        }
        Ok(true)
    }

    /// Passive power tuning of `owned` abilities for `power`.
    pub fn power_tuning(&self, owned: &[AbilityId], power: Option<&AbilityId>) -> PowerTuning {
        let mut percents = [0i32; 4];

        for ability in owned.iter().filter_map(|id| self.abilities.get(id)) {
            for (_, effect) in ability.effects_for(TriggerKind::Passive) {
                let EffectPayload::PowerModifier(modifier) = &effect.payload else {
                    continue;
                };
                let applies = match (&modifier.power, power) {
                    (None, _) => true,
                    (Some(target), Some(power)) => target == power,
                    (Some(_), None) => false,
                };
                if applies {
                    let slot = match modifier.kind {
                        PowerModifierKind::Cost => 0,
                        PowerModifierKind::Cooldown => 1,
                        PowerModifierKind::Damage => 2,
                        PowerModifierKind::CooldownRecovery => 3,
                    };
                    percents[slot] += modifier.percent;
                }
            }
        }

        let factor = |percent: i32| (1.0 + percent as f64 / 100.0).max(0.0);
        PowerTuning {
            cost: factor(percents[0]),
            cooldown: factor(percents[1]),
            damage: factor(percents[2]),
            recovery: factor(percents[3]),
        }
    }

    // ========================================================================
    // Spawning
    // ========================================================================

    /// Creates a fresh enemy combatant from a template.
    pub fn spawn_enemy(&self, template_id: &str, id: EntityId) -> Result<Combatant, RegistryError> {
        let template = self
            .enemies
            .get(template_id)
            .ok_or_else(|| RegistryError::UnknownReference {
                owner: "spawn".to_owned(),
                kind: "enemy",
                id: template_id.to_owned(),
            })?;

        let profile = EnemyProfile::new(template.id.clone(), template.tier, template.rewards)
            .with_abilities(template.abilities.iter().cloned());
        let mut enemy = Combatant::enemy(id, template.name.clone(), template.stats.clone(), profile);
        for passive in &template.passives {
            self.grant(&mut enemy, passive.clone())?;
        }
        Ok(enemy)
    }
}
