//! Deterministic combat resolution shared by the runtime and offline tools.
//!
//! `combat-core` defines the canonical combat rules (combatant model, ability
//! format, trigger processing, damage pipeline, action executors, scheduler)
//! as pure APIs over in-memory state. Nothing here performs I/O or sleeps.
//! All state mutation of a live combat flows through [`engine::CombatEngine`],
//! and supporting crates depend on the types re-exported here.
pub mod ability;
pub mod action;
pub mod combat;
pub mod config;
pub mod death;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod rewards;
pub mod scheduler;
pub mod state;
pub mod stats;
pub mod trigger;

pub use ability::{
    AbilityDefinition, AbilityId, AbilityRegistry, Condition, Effect, EffectPayload,
    EnemyAbilityDefinition, EnemyAbilityKind, EnemyTemplate, PowerCategory, PowerDefinition,
    RegistryError, TriggerKind,
};
pub use action::{ActionContext, ActionOutcome, CombatAction, GateRefusal, execute};
pub use config::{CombatConfig, ResourceRule, ResourceTable};
pub use death::DeathGuard;
pub use engine::{
    CombatEngine, CombatError, CombatSnapshot, EnginePhase, PauseReason, PauseState, TickReport,
};
pub use env::{CombatRoller, ScriptedRng, SeededRng};
pub use error::{CombatFault, ErrorSeverity};
pub use events::{CombatLog, EventQueue, PresentationEvent, PresentationKind};
pub use rewards::{
    ItemDropRequest, ItemRarity, NullProgression, ProgressionResponse, ProgressionSink,
    RewardLedger, RewardSignal,
};
pub use state::{
    Combatant, CombatantKind, EnemyIntent, EnemyProfile, EnemyTier, EntityId, PlayerProfile,
    RewardTable, StatusEffect, StatusKind,
};
pub use stats::{BaseStats, CurrentStats, RawStatBlock, ResourceKind, StatKind, StatModifier};
