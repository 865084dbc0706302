/// Why combat is paused. Later variants take precedence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PauseReason {
    Manual,
    ItemDrop,
    LevelUp,
}

/// The single pause representation: paused iff a reason is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PauseState(Option<PauseReason>);

impl PauseState {
    pub fn running() -> Self {
        Self(None)
    }

    pub fn is_paused(&self) -> bool {
        self.0.is_some()
    }

    pub fn reason(&self) -> Option<PauseReason> {
        self.0
    }

    /// Pauses for `reason` unless a higher-priority reason is already set.
    /// Returns the reason in effect afterwards.
    pub fn request(&mut self, reason: PauseReason) -> PauseReason {
        let effective = self.0.map_or(reason, |current| current.max(reason));
        self.0 = Some(effective);
        effective
    }

    /// Clears the pause and returns the reason it had.
    pub fn clear(&mut self) -> Option<PauseReason> {
        self.0.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_up_outranks_item_drop() {
        let mut pause = PauseState::running();
        assert!(!pause.is_paused());

        pause.request(PauseReason::ItemDrop);
        assert_eq!(pause.request(PauseReason::LevelUp), PauseReason::LevelUp);
        assert_eq!(pause.request(PauseReason::ItemDrop), PauseReason::LevelUp);
        assert_eq!(pause.request(PauseReason::Manual), PauseReason::LevelUp);
        assert!(pause.is_paused());

        assert_eq!(pause.clear(), Some(PauseReason::LevelUp));
        assert!(!pause.is_paused());
    }

    #[test]
    fn reasons_parse_from_snake_case() {
        assert_eq!("item_drop".parse::<PauseReason>().unwrap(), PauseReason::ItemDrop);
        assert_eq!(PauseReason::LevelUp.to_string(), "level_up");
    }
}
