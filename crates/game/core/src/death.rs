//! Exactly-once terminal transitions.

use std::collections::BTreeSet;

use crate::state::EntityId;

/// Identity-keyed latch for the defeated transition.
///
/// Claims are made synchronously at decision time, so two resolutions that
/// both read a pre-death snapshot still agree on a single winner. The engine
/// releases an enemy's claim when that enemy is reaped or replaced, and
/// clears every claim on a full reset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathGuard {
    claimed: BTreeSet<EntityId>,
}

impl DeathGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true exactly once per id until that id is reset.
    pub fn try_claim(&mut self, id: EntityId) -> bool {
        let claimed = self.claimed.insert(id);
        if !claimed {
            tracing::debug!(target: "combat::death", %id, "duplicate death signal swallowed");
        }
        claimed
    }

    pub fn is_claimed(&self, id: EntityId) -> bool {
        self.claimed.contains(&id)
    }

    /// Releases one id (e.g. the player after a respawn).
    pub fn reset(&mut self, id: EntityId) {
        self.claimed.remove(&id);
    }

    pub fn reset_all(&mut self) {
        self.claimed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_once_per_identity() {
        let mut guard = DeathGuard::new();
        assert!(guard.try_claim(EntityId(3)));
        assert!(!guard.try_claim(EntityId(3)));
        assert!(guard.try_claim(EntityId(4)));
    }

    #[test]
    fn reset_releases_a_single_identity() {
        let mut guard = DeathGuard::new();
        guard.try_claim(EntityId::PLAYER);
        guard.try_claim(EntityId(1));

        guard.reset(EntityId::PLAYER);
        assert!(!guard.is_claimed(EntityId::PLAYER));
        assert!(guard.is_claimed(EntityId(1)));
        assert!(guard.try_claim(EntityId::PLAYER));
    }
}
