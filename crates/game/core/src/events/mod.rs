//! Presentation events and the combat log.
//!
//! Resolution is instantaneous; playback is not. Executors describe what an
//! animation layer should show as [`PresentationEvent`]s with relative
//! delays, and the engine schedules them on a bounded [`EventQueue`].
mod log;
mod presentation;
mod queue;

pub use log::CombatLog;
pub use presentation::{PresentationEvent, PresentationKind};
pub use queue::{EventQueue, QueuedEvent};
