use crate::ability::AbilityId;
use crate::state::Combatant;

/// Facts about the event being processed.
#[derive(Clone, Copy, Debug)]
pub struct TriggerContext<'a> {
    pub actor: &'a Combatant,
    pub opponent: Option<&'a Combatant>,
    /// Damage dealt or taken by the triggering event.
    pub damage: Option<i32>,
    pub is_crit: bool,
    pub power_used: Option<&'a AbilityId>,
}

impl<'a> TriggerContext<'a> {
    pub fn new(actor: &'a Combatant) -> Self {
        Self {
            actor,
            opponent: None,
            damage: None,
            is_crit: false,
            power_used: None,
        }
    }

    pub fn against(mut self, opponent: &'a Combatant) -> Self {
        self.opponent = Some(opponent);
        self
    }

    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn critical(mut self, is_crit: bool) -> Self {
        self.is_crit = is_crit;
        self
    }

    pub fn with_power(mut self, power: &'a AbilityId) -> Self {
        self.power_used = Some(power);
        self
    }
}
