//! Working state for one action.

use super::ActionOutcome;
use crate::ability::{AbilityId, AbilityRegistry, TriggerKind};
use crate::combat::{DamageApplied, apply_damage};
use crate::config::CombatConfig;
use crate::env::CombatRoller;
use crate::events::{PresentationEvent, PresentationKind};
use crate::rewards::RewardSignal;
use crate::state::{Combatant, EntityId};
use crate::trigger::{ResolutionGuard, TriggerContext, TriggerProcessor, apply_result};

/// Which combatant of the resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Actor,
    Opponent,
}

impl Side {
    fn other(self) -> Self {
        match self {
            Self::Actor => Self::Opponent,
            Self::Opponent => Self::Actor,
        }
    }
}

/// Trigger firing request.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Reaction<'p> {
    pub trigger: TriggerKind,
    pub damage: Option<i32>,
    pub is_crit: bool,
    pub power: Option<&'p AbilityId>,
}

impl<'p> Reaction<'p> {
    pub fn new(trigger: TriggerKind) -> Self {
        Self {
            trigger,
            damage: None,
            is_crit: false,
            power: None,
        }
    }

    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn critical(mut self, is_crit: bool) -> Self {
        self.is_crit = is_crit;
        self
    }

    pub fn with_power(mut self, power: &'p AbilityId) -> Self {
        self.power = Some(power);
        self
    }
}

/// Cloned combatants plus everything the action produced so far.
///
/// Executors mutate the clones; the caller's snapshots stay untouched until
/// the outcome is committed.
#[derive(Debug)]
pub(crate) struct Resolution {
    pub actor: Combatant,
    pub opponent: Combatant,
    pub events: Vec<PresentationEvent>,
    pub logs: Vec<String>,
    pub rewards: Option<RewardSignal>,
    pub player_defeated: bool,
    /// Unscaled presentation offset of the last emitted event.
    timeline_ms: u64,
    guards: [ResolutionGuard; 2],
}

impl Resolution {
    pub fn new(actor: Combatant, opponent: Combatant) -> Self {
        Self {
            actor,
            opponent,
            events: Vec::new(),
            logs: Vec::new(),
            rewards: None,
            player_defeated: false,
            timeline_ms: 0,
            guards: [ResolutionGuard::default(); 2],
        }
    }

    pub fn side(&self, side: Side) -> &Combatant {
        match side {
            Side::Actor => &self.actor,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Actor => &mut self.actor,
            Side::Opponent => &mut self.opponent,
        }
    }

    fn split(&mut self, side: Side) -> (&mut Combatant, &mut Combatant, &mut ResolutionGuard) {
        let [actor_guard, opponent_guard] = &mut self.guards;
        match side {
            Side::Actor => (&mut self.actor, &mut self.opponent, actor_guard),
            Side::Opponent => (&mut self.opponent, &mut self.actor, opponent_guard),
        }
    }

    /// True once either side entered the dying state.
    pub fn is_over(&self) -> bool {
        self.actor.is_dying || self.opponent.is_dying
    }

    pub fn log(&mut self, line: impl Into<String>) {
        self.logs.push(line.into());
    }

    /// Appends an event `gap_ms` after the previous one.
    pub fn emit(&mut self, config: &CombatConfig, gap_ms: u64, event: PresentationEvent) {
        self.timeline_ms = self.timeline_ms.saturating_add(gap_ms);
        let delay = config.scaled_delay(self.timeline_ms);
        self.events.push(event.at(delay));
    }

    /// Starts a new resolution unit (next hit of a multi-hit).
    pub fn reset_guards(&mut self) {
        for guard in &mut self.guards {
            guard.reset();
        }
    }

    /// Fires a trigger for `side` against the other side and applies the result.
    ///
    /// Returns the damage to reflect back at the other side.
    pub fn react(
        &mut self,
        side: Side,
        reaction: Reaction<'_>,
        registry: &AbilityRegistry,
        config: &CombatConfig,
        rng: &mut dyn CombatRoller,
    ) -> i32 {
        let (holder, other, guard) = self.split(side);
        let result = {
            let mut ctx = TriggerContext::new(holder)
                .against(other)
                .critical(reaction.is_crit);
            if let Some(damage) = reaction.damage {
                ctx = ctx.with_damage(damage);
            }
            if let Some(power) = reaction.power {
                ctx = ctx.with_power(power);
            }
            TriggerProcessor::new(registry).process_guarded(reaction.trigger, &ctx, guard, rng)
        };
        if result.is_empty() {
            return 0;
        }

        let reflected = result.reflected_damage;
        let fired = result.fired.clone();
        let (updated, logs) = apply_result(result, Some(other));
        *holder = updated;

        let (source, target) = (self.side(side).id, self.side(side.other()).id);
        self.logs.extend(logs);
        for ability in fired {
            self.emit(config, 0, PresentationEvent::new(PresentationKind::Proc(ability), source, target));
        }
        reflected
    }

    /// Sends reflected damage from `side` back to the other side.
    pub fn reflect(&mut self, side: Side, amount: i32, config: &CombatConfig) -> DamageApplied {
        if amount <= 0 {
            return DamageApplied::default();
        }
        let source = self.side(side).id;
        let (name, target_name) = (self.side(side).name.clone(), self.side(side.other()).name.clone());
        let target = self.side_mut(side.other());
        let applied = apply_damage(target, amount);
        let target_id = target.id;
        self.log(format!("{name} reflects {} damage to {target_name}", applied.total()));
        self.emit(
            config,
            0,
            PresentationEvent::new(PresentationKind::Reflect, source, target_id)
                .with_damage(applied.total()),
        );
        applied
    }

    /// Marks the last damaging event against `target` as lethal.
    pub fn mark_lethal(&mut self, target: EntityId) {
        if let Some(event) = self
            .events
            .iter_mut()
            .rev()
            .find(|e| e.target == target && e.damage.is_some())
        {
            event.target_died = true;
        }
    }

    pub fn into_outcome(self, actor_is_player: bool, stunned: bool) -> ActionOutcome {
        let (player, enemy) = if actor_is_player {
            (self.actor, self.opponent)
        } else {
            (self.opponent, self.actor)
        };
        ActionOutcome {
            player,
            enemy,
            events: self.events,
            logs: self.logs,
            rewards: self.rewards,
            player_defeated: self.player_defeated,
            refusal: None,
            stunned,
        }
    }
}
