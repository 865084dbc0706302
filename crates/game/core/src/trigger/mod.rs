//! Trigger processing.
//!
//! Given a trigger and a context, every owned ability whose effects subscribe
//! to that trigger is evaluated and the results are folded into a single
//! [`TriggerResult`]. Results are data: applying them never re-enters the
//! processor, and a [`ResolutionGuard`] caps each trigger at one pass per
//! resolution unit, so reaction cascades are bounded.
mod context;
mod evaluate;
mod processor;
mod result;

pub use context::TriggerContext;
pub use processor::{TriggerProcessor, apply_result};
pub use result::TriggerResult;

use crate::ability::{TriggerKind, TriggerSet};

/// Tracks which triggers already fired for one actor in one resolution unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolutionGuard {
    fired: TriggerSet,
}

impl ResolutionGuard {
    /// Marks `trigger` as fired. Returns false if it already had.
    pub fn enter(&mut self, trigger: TriggerKind) -> bool {
        let flag = trigger.flag();
        if self.fired.contains(flag) {
            return false;
        }
        self.fired.insert(flag);
        true
    }

    pub fn has_fired(&self, trigger: TriggerKind) -> bool {
        self.fired.contains(trigger.flag())
    }

    /// Starts a new resolution unit (e.g. the next hit of a multi-hit).
    pub fn reset(&mut self) {
        self.fired = TriggerSet::empty();
    }
}
