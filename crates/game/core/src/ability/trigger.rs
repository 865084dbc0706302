use bitflags::bitflags;

/// Named event points ability effects subscribe to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TriggerKind {
    CombatStart,
    TurnStart,
    OnHit,
    OnCrit,
    OnDamaged,
    OnPowerUse,
    OnDodge,
    OnKill,
    /// Never fires. Passive payloads feed stat and power tuning instead.
    Passive,
}

impl TriggerKind {
    pub const fn flag(self) -> TriggerSet {
        match self {
            Self::CombatStart => TriggerSet::COMBAT_START,
            Self::TurnStart => TriggerSet::TURN_START,
            Self::OnHit => TriggerSet::ON_HIT,
            Self::OnCrit => TriggerSet::ON_CRIT,
            Self::OnDamaged => TriggerSet::ON_DAMAGED,
            Self::OnPowerUse => TriggerSet::ON_POWER_USE,
            Self::OnDodge => TriggerSet::ON_DODGE,
            Self::OnKill => TriggerSet::ON_KILL,
            Self::Passive => TriggerSet::PASSIVE,
        }
    }
}

bitflags! {
    /// Set of triggers, used to bound reaction cascades.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TriggerSet: u16 {
        const COMBAT_START = 1 << 0;
        const TURN_START = 1 << 1;
        const ON_HIT = 1 << 2;
        const ON_CRIT = 1 << 3;
        const ON_DAMAGED = 1 << 4;
        const ON_POWER_USE = 1 << 5;
        const ON_DODGE = 1 << 6;
        const ON_KILL = 1 << 7;
        const PASSIVE = 1 << 8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn trigger_names_are_snake_case() {
        assert_eq!(TriggerKind::OnPowerUse.to_string(), "on_power_use");
        assert_eq!(TriggerKind::from_str("turn_start").unwrap(), TriggerKind::TurnStart);
    }

    #[test]
    fn every_trigger_has_a_distinct_flag() {
        let all = TriggerKind::iter().fold(TriggerSet::empty(), |acc, t| {
            assert!(!acc.contains(t.flag()));
            acc | t.flag()
        });
        assert_eq!(all, TriggerSet::all());
    }
}
