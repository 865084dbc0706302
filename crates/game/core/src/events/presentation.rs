use crate::ability::AbilityId;
use crate::state::{EntityId, StatusKind};

/// What the presentation layer should play.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PresentationKind {
    Attack,
    Dodge,
    PowerCast(AbilityId),
    PowerHit(AbilityId),
    EnemyAbility(AbilityId),
    StatusTick(StatusKind),
    StatusApplied(StatusKind),
    Stunned,
    Heal,
    Shield,
    Reflect,
    /// An ability proc from the trigger system.
    Proc(AbilityId),
    Death,
}

/// Timed descriptor for one animation beat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresentationEvent {
    pub kind: PresentationKind,
    pub source: EntityId,
    pub target: EntityId,
    pub damage: Option<i32>,
    pub is_crit: Option<bool>,
    /// Offset from the start of the action, already scaled by game speed.
    pub delay_ms: u64,
    pub target_died: bool,
}

impl PresentationEvent {
    pub fn new(kind: PresentationKind, source: EntityId, target: EntityId) -> Self {
        Self {
            kind,
            source,
            target,
            damage: None,
            is_crit: None,
            delay_ms: 0,
            target_died: false,
        }
    }

    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn with_crit(mut self, is_crit: bool) -> Self {
        self.is_crit = Some(is_crit);
        self
    }

    pub fn at(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}
