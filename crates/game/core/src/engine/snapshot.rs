use super::{EnginePhase, PauseState};
use crate::state::Combatant;

/// Read-only copy of the engine state handed to observers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSnapshot {
    pub player: Combatant,
    pub enemy: Option<Combatant>,
    pub pause: PauseState,
    pub phase: EnginePhase,
    pub clock_ms: u64,
    pub queued_events: usize,
    pub player_defeated: bool,
}

impl CombatSnapshot {
    /// SHA-256 of the bincode encoding.
    ///
    /// Equal snapshots hash equal, so observers can drop notifications for
    /// ticks that changed nothing.
    #[cfg(feature = "serde")]
    pub fn state_root(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        if let Ok(bytes) = bincode::serialize(self) {
            hasher.update(&bytes);
        }
        hasher.finalize().into()
    }
}
