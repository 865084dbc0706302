//! Enemy intent selection.

use crate::ability::{AbilityRegistry, EnemyAbilityKind};
use crate::env::CombatRoller;
use crate::state::{Combatant, EnemyIntent};

/// Picks the enemy's next action.
///
/// Walks abilities in priority order and takes the first one that is off
/// cooldown, useful right now, and passes its use-chance roll. Falls back to
/// a basic attack.
pub fn choose_intent(
    enemy: &Combatant,
    registry: &AbilityRegistry,
    rng: &mut dyn CombatRoller,
) -> EnemyIntent {
    let Some(profile) = enemy.enemy_profile() else {
        return EnemyIntent::Attack;
    };

    for id in &profile.abilities {
        if !profile.ability_ready(id) {
            continue;
        }
        let Some(ability) = registry.enemy_ability(id) else {
            tracing::warn!(target: "combat::intent", ability = %id, "unknown enemy ability; skipping");
            continue;
        };
        let useful = match ability.kind {
            EnemyAbilityKind::Heal { .. } => enemy.health() < enemy.max_health(),
            EnemyAbilityKind::Shield { .. } => !enemy.is_shielded(),
            EnemyAbilityKind::Enrage { .. } => profile.enrage.is_none(),
            _ => true,
        };
        if useful && rng.chance(ability.chance) {
            return EnemyIntent::Ability(id.clone());
        }
    }

    EnemyIntent::Attack
}
