use crate::ability::AbilityId;
use crate::state::{Buff, Combatant, StatusEffect};

/// Aggregated outcome of one trigger pass.
///
/// Numeric fields are summed across every effect that fired and are applied
/// by the caller. Stateful changes to the actor (counters, internal
/// cooldowns, buffs, shields, cleanse, attack modifiers) are already applied
/// to the returned `actor` copy.
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerResult {
    pub heal_amount: i32,
    /// Extra damage to the opponent.
    pub damage_amount: i32,
    pub mana_restored: f64,
    /// Statuses that passed their own chance roll, for the opponent.
    pub status_to_apply: Vec<StatusEffect>,
    /// Damage sent back to the source of the triggering hit.
    pub reflected_damage: i32,
    /// Timed stat reductions for the opponent.
    pub enemy_debuffs: Vec<Buff>,
    /// Shield granted to the actor (already applied to `actor`).
    pub shield_granted: i32,
    pub logs: Vec<String>,
    /// Abilities that fired, in processing order.
    pub fired: Vec<AbilityId>,
    pub actor: Combatant,
}

impl TriggerResult {
    pub fn empty(actor: Combatant) -> Self {
        Self {
            heal_amount: 0,
            damage_amount: 0,
            mana_restored: 0.0,
            status_to_apply: Vec::new(),
            reflected_damage: 0,
            enemy_debuffs: Vec::new(),
            shield_granted: 0,
            logs: Vec::new(),
            fired: Vec::new(),
            actor,
        }
    }

    /// True when no effect fired.
    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }

    pub fn into_actor(self) -> Combatant {
        self.actor
    }
}
