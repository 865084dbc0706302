//! Declarative ability, power and enemy definitions.
//!
//! Everything here is immutable content loaded once at startup. An ability is
//! a bundle of [`Effect`]s, each subscribing to one [`TriggerKind`], optionally
//! gated by a [`Condition`], a proc chance and an internal cooldown.
//!
//! ```text
//! AbilityDefinition
//!   └─ Effect { trigger, condition?, chance?, internal_cooldown?, payload }
//! ```
mod condition;
mod effect;
mod enemy;
mod power;
mod registry;
mod trigger;

use std::borrow::Borrow;
use std::fmt;

pub use condition::Condition;
pub use effect::{
    CounterOp, DamageModifierKind, EffectPayload, Magnitude, PowerModifier, PowerModifierKind,
    StatusApplication,
};
pub use enemy::{EnemyAbilityDefinition, EnemyAbilityKind, EnemyTemplate};
pub use power::{PowerCategory, PowerDefinition, PowerTuning};
pub use registry::{AbilityRegistry, RegistryError};
pub use trigger::{TriggerKind, TriggerSet};

/// String identifier of an ability, power or enemy ability.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AbilityId(String);

impl AbilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AbilityId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for AbilityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for AbilityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One trigger → condition → payload entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub trigger: TriggerKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: Option<Condition>,
    /// Proc chance in `[0, 1]`. Absent means always.
    #[cfg_attr(feature = "serde", serde(default))]
    pub chance: Option<f64>,
    /// Seconds before this effect may fire again.
    #[cfg_attr(feature = "serde", serde(default))]
    pub internal_cooldown: Option<f64>,
    pub payload: EffectPayload,
}

impl Effect {
    pub fn new(trigger: TriggerKind, payload: EffectPayload) -> Self {
        Self {
            trigger,
            condition: None,
            chance: None,
            internal_cooldown: None,
            payload,
        }
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_chance(mut self, chance: f64) -> Self {
        self.chance = Some(chance);
        self
    }

    pub fn with_internal_cooldown(mut self, seconds: f64) -> Self {
        self.internal_cooldown = Some(seconds);
        self
    }
}

/// Registry entry for a path ability or item effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDefinition {
    pub id: AbilityId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub effects: Vec<Effect>,
}

impl AbilityDefinition {
    pub fn new(id: impl Into<AbilityId>, name: impl Into<String>, effects: Vec<Effect>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            effects,
        }
    }

    /// Effects subscribed to `trigger`, with their index inside the ability.
    pub fn effects_for(&self, trigger: TriggerKind) -> impl Iterator<Item = (usize, &Effect)> {
        self.effects
            .iter()
            .enumerate()
            .filter(move |(_, effect)| effect.trigger == trigger)
    }
}
