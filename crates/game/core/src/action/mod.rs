//! Action executors.
//!
//! Every discrete combat action runs the same pipeline:
//!
//! ```text
//! gate → pre-effects → resolve → terminal check → emit
//! ```
//!
//! - `gate`: refusals (paused, dying, cooldown, cost) return before any clone
//!   is touched; a stunned actor runs pre-effects only
//! - `pre_effects`: status damage, buff expiry, `turn_start`
//! - resolve: `strike`, `power_cast` or `enemy_turn`
//! - `terminal`: [`DeathGuard`]-gated defeated transition
//!
//! Executors take immutable snapshots and return new ones in an
//! [`ActionOutcome`]; nothing is committed until the caller accepts it.

mod encounter;
mod enemy_turn;
mod gate;
mod intent;
mod power_cast;
mod pre_effects;
mod resolution;
mod strike;
mod terminal;

pub use encounter::open_encounter;
pub use gate::{GateDecision, GateRefusal};
pub use intent::choose_intent;
pub use strike::DODGE_COUNTER;

use resolution::Resolution;

use crate::ability::{AbilityId, AbilityRegistry};
use crate::config::CombatConfig;
use crate::death::DeathGuard;
use crate::env::CombatRoller;
use crate::events::{PresentationEvent, PresentationKind};
use crate::rewards::RewardSignal;
use crate::state::Combatant;

/// A discrete combat action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombatAction {
    HeroAttack,
    EnemyAttack,
    CastPower(AbilityId),
}

impl CombatAction {
    pub fn is_player_action(&self) -> bool {
        !matches!(self, Self::EnemyAttack)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HeroAttack => "hero_attack",
            Self::EnemyAttack => "enemy_attack",
            Self::CastPower(_) => "cast_power",
        }
    }
}

/// Everything an executor reads besides the two combatants.
pub struct ActionContext<'a> {
    pub registry: &'a AbilityRegistry,
    pub config: &'a CombatConfig,
    pub rng: &'a mut dyn CombatRoller,
    pub guard: &'a mut DeathGuard,
    pub paused: bool,
}

/// New snapshots and side outputs of one action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    pub player: Combatant,
    pub enemy: Combatant,
    /// Presentation beats in play order.
    pub events: Vec<PresentationEvent>,
    pub logs: Vec<String>,
    /// Set exactly once per enemy identity.
    pub rewards: Option<RewardSignal>,
    pub player_defeated: bool,
    /// Set when the gate refused; snapshots are then the unmodified inputs.
    pub refusal: Option<GateRefusal>,
    pub stunned: bool,
}

impl ActionOutcome {
    fn refused(player: &Combatant, enemy: &Combatant, refusal: GateRefusal) -> Self {
        Self {
            player: player.clone(),
            enemy: enemy.clone(),
            events: Vec::new(),
            logs: Vec::new(),
            rewards: None,
            player_defeated: false,
            refusal: Some(refusal),
            stunned: false,
        }
    }

    pub fn is_refused(&self) -> bool {
        self.refusal.is_some()
    }
}

/// Runs `action` against snapshots of both combatants.
pub fn execute(
    action: &CombatAction,
    player: &Combatant,
    enemy: &Combatant,
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    let player_acts = action.is_player_action();
    let (actor, opponent) = if player_acts {
        (player, enemy)
    } else {
        (enemy, player)
    };

    let decision = match gate::check(action, actor, opponent, ctx) {
        Ok(decision) => decision,
        Err(refusal) => {
            tracing::debug!(
                target: "combat::action",
                action = action.as_str(),
                actor = %actor.id,
                %refusal,
                "action refused"
            );
            return ActionOutcome::refused(player, enemy, refusal);
        }
    };

    let mut res = Resolution::new(actor.clone(), opponent.clone());
    pre_effects::run(&mut res, ctx);
    terminal::settle(&mut res, ctx);

    let stunned = decision == GateDecision::Stunned;
    if res.is_over() {
        return res.into_outcome(player_acts, stunned);
    }

    if stunned {
        let (id, line) = (res.actor.id, format!("{} is stunned", res.actor.name));
        res.log(line);
        res.emit(
            ctx.config,
            0,
            PresentationEvent::new(PresentationKind::Stunned, id, id),
        );
        return res.into_outcome(player_acts, stunned);
    }

    match action {
        CombatAction::HeroAttack => strike::hero_attack(&mut res, ctx),
        CombatAction::EnemyAttack => enemy_turn::enemy_attack(&mut res, ctx),
        CombatAction::CastPower(id) => power_cast::cast_power(&mut res, ctx, id),
    }
    terminal::settle(&mut res, ctx);

    res.into_outcome(player_acts, false)
}
