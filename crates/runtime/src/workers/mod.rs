//! Worker tasks that back the runtime orchestration.
//!
//! The combat worker owns the engine and executes commands; the ticker feeds
//! it scheduler time.

mod combat;
mod ticker;

pub use combat::{Command, CombatWorker, EnemyCadence};
pub use ticker::Ticker;
