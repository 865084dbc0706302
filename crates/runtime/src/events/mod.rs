//! Topic-based event bus for runtime events.
//!
//! Events are published to a topic and consumers subscribe only to the topics
//! they need.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::CombatEvent;
