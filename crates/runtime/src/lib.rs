//! Async orchestration for a live combat.
//!
//! One worker task owns the [`combat_core::CombatEngine`] and serializes every
//! mutation; clients talk to it through a cloneable [`CombatHandle`]. Time is
//! driven by an explicit [`Ticker`] (or manual [`CombatHandle::tick`] calls),
//! and results fan out over a topic-based [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{CombatHandle, Result, RuntimeError};
pub use events::{CombatEvent, EventBus, Topic};
pub use runtime::{CombatRuntime, CombatRuntimeBuilder, RuntimeConfig};
pub use workers::Ticker;
