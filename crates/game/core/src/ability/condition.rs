use crate::state::StatusKind;

/// Predicate gating whether a triggered effect fires.
///
/// Fractions are in `[0, 1]` (0.3 = 30%). Evaluation lives in
/// [`trigger::evaluate`](crate::trigger).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    /// Actor health fraction strictly below the threshold.
    HealthBelow(f64),
    /// Actor health fraction strictly above the threshold.
    HealthAbove(f64),
    ResourceBelow(f64),
    ResourceAbove(f64),
    /// Opponent health fraction strictly below the threshold. False without an opponent.
    OpponentHealthBelow(f64),
    /// Named actor counter is at least the given value.
    CounterAtLeast { counter: String, value: i64 },
    /// The triggering hit was a critical hit.
    WasCritical,
    /// Actor (or opponent, when `on_opponent`) carries the status.
    HasStatus { status: StatusKind, on_opponent: bool },
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn counter_at_least(counter: impl Into<String>, value: i64) -> Self {
        Self::CounterAtLeast {
            counter: counter.into(),
            value,
        }
    }

    /// Combo count gate for combo-style abilities.
    pub fn combo_at_least(value: i64) -> Self {
        Self::counter_at_least(Self::COMBO_COUNTER, value)
    }

    /// Pseudo-counter resolved from the player's combo state.
    pub const COMBO_COUNTER: &'static str = "combo";
}
