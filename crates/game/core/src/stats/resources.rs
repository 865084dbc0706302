//! Path resources.
//!
//! Every combatant spends one resource on powers. Mages use mana; other
//! progression paths swap it for a path-specific alternative whose gain and
//! regeneration rules come from [`ResourceTable`](crate::config::ResourceTable).

/// Resource pool kind used to pay for powers.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResourceKind {
    /// Regenerates steadily over time.
    #[default]
    Mana,
    /// Built by hitting and being hit.
    Fury,
    /// Slow-recharging discrete charges.
    Charges,
    /// Built by landing hits, trickles back slowly.
    Momentum,
    /// Holy resource for paladin paths.
    Zeal,
}

impl ResourceKind {
    /// Whether this resource is shown to players as discrete units.
    pub const fn is_discrete(self) -> bool {
        matches!(self, Self::Charges)
    }
}
