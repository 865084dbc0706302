//! Combat engine state machine.
//!
//! The [`CombatEngine`] is the single owner of one combat instance. Every
//! mutation goes through it, one call at a time:
//!
//! ```text
//! Idle ─ action/tick ─▶ Resolving ─ commit ─▶ Emitting ─ queue events ─▶ Idle
//! ```
//!
//! Actions run the pure executors in [`crate::action`] against snapshots of
//! both combatants and commit the returned snapshots. The scheduler is driven
//! only by explicit [`CombatEngine::tick`] calls; presentation delay is data on
//! the [`EventQueue`], never a sleep.
mod errors;
mod pause;
mod phase;
mod snapshot;

pub use errors::CombatError;
pub use pause::{PauseReason, PauseState};
pub use phase::EnginePhase;
pub use snapshot::CombatSnapshot;

use std::sync::Arc;

use crate::ability::{AbilityId, AbilityRegistry};
use crate::action::{ActionContext, ActionOutcome, CombatAction, execute, open_encounter};
use crate::config::CombatConfig;
use crate::death::DeathGuard;
use crate::env::SeededRng;
use crate::events::{CombatLog, EventQueue, PresentationEvent};
use crate::rewards::{ItemRarity, NullProgression, ProgressionSink};
use crate::scheduler::{Cadence, tick_combatant};
use crate::state::{Combatant, EntityId};

/// What one scheduler call did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// True if either combatant changed.
    pub changed: bool,
    pub logs: Vec<String>,
    /// Enemy removed because its death animation finished.
    pub reaped: Option<EntityId>,
}

/// Owner of one combat instance.
pub struct CombatEngine<S: ProgressionSink = NullProgression> {
    config: CombatConfig,
    registry: Arc<AbilityRegistry>,
    player: Combatant,
    /// Player as handed to [`CombatEngine::new`]; restored by `reset`.
    initial_player: Combatant,
    enemy: Option<Combatant>,
    rng: SeededRng,
    guard: DeathGuard,
    pause: PauseState,
    phase: EnginePhase,
    cadence: Cadence,
    events: EventQueue,
    log: CombatLog,
    clock_ms: u64,
    dying_since_ms: Option<u64>,
    next_enemy_id: EntityId,
    player_defeated: bool,
    sink: S,
}

impl CombatEngine<NullProgression> {
    /// Engine whose rewards go nowhere.
    pub fn detached(
        config: CombatConfig,
        registry: Arc<AbilityRegistry>,
        player: Combatant,
        seed: u64,
    ) -> Self {
        Self::new(config, registry, player, seed, NullProgression)
    }
}

impl<S: ProgressionSink> CombatEngine<S> {
    pub fn new(
        config: CombatConfig,
        registry: Arc<AbilityRegistry>,
        mut player: Combatant,
        seed: u64,
        sink: S,
    ) -> Self {
        player.recompute_stats();
        Self {
            events: EventQueue::new(config.event_queue_capacity),
            log: CombatLog::new(config.combat_log_capacity),
            config,
            registry,
            initial_player: player.clone(),
            player,
            enemy: None,
            rng: SeededRng::new(seed),
            guard: DeathGuard::new(),
            pause: PauseState::running(),
            phase: EnginePhase::Idle,
            cadence: Cadence::new(),
            clock_ms: 0,
            dying_since_ms: None,
            next_enemy_id: EntityId::PLAYER.next(),
            player_defeated: false,
            sink,
        }
    }

    // ========================================================================
    // Encounter lifecycle
    // ========================================================================

    /// Spawns a fresh enemy from `template` and opens the encounter.
    ///
    /// Any previous enemy is discarded. Each spawn gets a new id, so the
    /// death latch of the previous enemy never blocks the new one.
    pub fn start_encounter(&mut self, template: &str) -> Result<EntityId, CombatError> {
        self.phase = self.phase.advance(EnginePhase::Resolving)?;
        let result = self.open(template);
        self.phase = EnginePhase::Idle;
        result
    }

    fn open(&mut self, template: &str) -> Result<EntityId, CombatError> {
        if self.player_defeated {
            return Err(CombatError::PlayerDefeated);
        }
        let id = self.next_enemy_id;
        let enemy = self.registry.spawn_enemy(template, id)?;
        self.next_enemy_id = id.next();

        if let Some(previous) = self.enemy.take() {
            self.guard.reset(previous.id);
        }
        self.player.reset_for_encounter();
        self.cadence.reset();
        self.dying_since_ms = None;

        let outcome = {
            let mut ctx = ActionContext {
                registry: &self.registry,
                config: &self.config,
                rng: &mut self.rng,
                guard: &mut self.guard,
                paused: false,
            };
            open_encounter(&self.player, &enemy, &mut ctx)
        };
        tracing::info!(target: "combat::engine", %id, template, "encounter started");

        self.commit(&outcome);
        self.phase = EnginePhase::Emitting;
        self.queue(outcome.events);
        self.log.extend(outcome.logs);
        Ok(id)
    }

    /// Removes the enemy once its death animation window has elapsed.
    pub fn reap_dying(&mut self) -> Option<EntityId> {
        let since = self.dying_since_ms?;
        let window = self.config.scaled_delay(self.config.death_animation_ms);
        if self.clock_ms < since.saturating_add(window) {
            return None;
        }
        let enemy = self.enemy.take()?;
        self.dying_since_ms = None;
        self.guard.reset(enemy.id);
        tracing::debug!(target: "combat::engine", id = %enemy.id, "enemy reaped");
        Some(enemy.id)
    }

    /// Drops the encounter, queued events and log and restores the player.
    pub fn reset(&mut self) -> Result<(), CombatError> {
        if !self.phase.is_idle() {
            return Err(CombatError::NotIdle { phase: self.phase });
        }
        let purged = self.events.purge();
        self.log.clear();
        self.guard.reset_all();
        self.pause.clear();
        self.cadence.reset();
        self.player = self.initial_player.clone();
        self.enemy = None;
        self.dying_since_ms = None;
        self.player_defeated = false;
        tracing::info!(target: "combat::engine", purged, "combat reset");
        Ok(())
    }

    // ========================================================================
    // Actions
    // ========================================================================

    pub fn hero_attack(&mut self) -> Result<ActionOutcome, CombatError> {
        self.run(CombatAction::HeroAttack)
    }

    pub fn cast_power(&mut self, power: &AbilityId) -> Result<ActionOutcome, CombatError> {
        self.run(CombatAction::CastPower(power.clone()))
    }

    pub fn enemy_attack(&mut self) -> Result<ActionOutcome, CombatError> {
        self.run(CombatAction::EnemyAttack)
    }

    /// Runs one action and commits its outcome.
    ///
    /// Gate refusals are not errors: they come back as an outcome with
    /// `refusal` set and nothing committed.
    pub fn run(&mut self, action: CombatAction) -> Result<ActionOutcome, CombatError> {
        self.phase = self.phase.advance(EnginePhase::Resolving)?;
        let Some(enemy) = self.enemy.as_ref() else {
            self.phase = EnginePhase::Idle;
            return Err(CombatError::NoEncounter);
        };

        let outcome = {
            let mut ctx = ActionContext {
                registry: &self.registry,
                config: &self.config,
                rng: &mut self.rng,
                guard: &mut self.guard,
                paused: self.pause.is_paused(),
            };
            execute(&action, &self.player, enemy, &mut ctx)
        };
        if outcome.is_refused() {
            self.phase = self.phase.advance(EnginePhase::Idle)?;
            return Ok(outcome);
        }

        self.commit(&outcome);
        self.phase = self.phase.advance(EnginePhase::Emitting)?;
        self.queue(outcome.events.iter().cloned());
        self.log.extend(outcome.logs.iter().cloned());
        self.phase = self.phase.advance(EnginePhase::Idle)?;
        Ok(outcome)
    }

    fn commit(&mut self, outcome: &ActionOutcome) {
        self.player = outcome.player.clone();
        if outcome.enemy.is_dying && self.dying_since_ms.is_none() {
            self.dying_since_ms = Some(self.clock_ms);
        }
        self.enemy = Some(outcome.enemy.clone());

        if outcome.player_defeated {
            self.player_defeated = true;
            tracing::info!(target: "combat::engine", "player defeated");
        }

        if let Some(reward) = &outcome.rewards {
            let response = self.sink.grant(reward);
            let legendary = reward
                .item_drop
                .as_ref()
                .is_some_and(|drop| drop.rarity == ItemRarity::Legendary);
            if legendary {
                self.pause.request(PauseReason::ItemDrop);
            }
            if response.leveled_up {
                self.pause.request(PauseReason::LevelUp);
            }
            tracing::debug!(
                target: "combat::engine",
                xp = reward.xp,
                gold = reward.gold,
                legendary,
                leveled_up = response.leveled_up,
                "reward granted"
            );
        }
    }

    fn queue(&mut self, events: impl IntoIterator<Item = PresentationEvent>) {
        for event in events {
            if let Some(dropped) = self.events.push(self.clock_ms, event) {
                tracing::debug!(
                    target: "combat::engine",
                    seq = dropped.seq,
                    "event queue full; dropped oldest"
                );
            }
        }
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Advances the scheduler by `elapsed_ms`. A paused engine does nothing.
    pub fn tick(&mut self, elapsed_ms: u64) -> Result<TickReport, CombatError> {
        if self.pause.is_paused() {
            return Ok(TickReport::default());
        }
        self.phase = self.phase.advance(EnginePhase::Resolving)?;
        self.clock_ms = self.clock_ms.saturating_add(elapsed_ms);

        let mut report = TickReport::default();
        let budget = self.cadence.advance(elapsed_ms, &self.config);
        if !budget.is_empty() {
            if let Some(next) = tick_combatant(&self.player, budget, &self.config, &self.registry) {
                self.player = next.combatant;
                report.logs.extend(next.logs);
                report.changed = true;
            }
            if let Some(enemy) = self.enemy.as_ref() {
                if let Some(next) = tick_combatant(enemy, budget, &self.config, &self.registry) {
                    self.enemy = Some(next.combatant);
                    report.logs.extend(next.logs);
                    report.changed = true;
                }
            }
        }
        report.reaped = self.reap_dying();
        report.changed |= report.reaped.is_some();

        self.phase = self.phase.advance(EnginePhase::Emitting)?;
        self.log.extend(report.logs.iter().cloned());
        self.phase = self.phase.advance(EnginePhase::Idle)?;
        Ok(report)
    }

    /// Events whose presentation time has come, in play order.
    pub fn pop_ready_events(&mut self) -> Vec<PresentationEvent> {
        self.events.pop_ready(self.clock_ms)
    }

    // ========================================================================
    // Pause
    // ========================================================================

    pub fn pause(&mut self, reason: PauseReason) -> PauseReason {
        self.pause.request(reason)
    }

    pub fn resume(&mut self) -> Option<PauseReason> {
        self.pause.clear()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn snapshot(&self) -> CombatSnapshot {
        CombatSnapshot {
            player: self.player.clone(),
            enemy: self.enemy.clone(),
            pause: self.pause,
            phase: self.phase,
            clock_ms: self.clock_ms,
            queued_events: self.events.len(),
            player_defeated: self.player_defeated,
        }
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn enemy(&self) -> Option<&Combatant> {
        self.enemy.as_ref()
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn registry(&self) -> &AbilityRegistry {
        &self.registry
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub fn pause_state(&self) -> PauseState {
        self.pause
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn is_player_defeated(&self) -> bool {
        self.player_defeated
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{EnemyTemplate, PowerCategory, PowerDefinition};
    use crate::rewards::RewardLedger;
    use crate::state::{EnemyTier, PlayerProfile, RewardTable};
    use crate::stats::{BaseStats, ResourceKind};

    fn create_test_registry() -> Arc<AbilityRegistry> {
        let mut registry = AbilityRegistry::new();
        registry
            .insert_enemy(EnemyTemplate {
                id: "slime".into(),
                name: "Slime".into(),
                tier: EnemyTier::Normal,
                stats: BaseStats::new(30, 4, 0, 100, 0),
                rewards: RewardTable {
                    xp: 60,
                    gold: 5,
                    drop_chance: 0.0,
                },
                abilities: Vec::new(),
                passives: Vec::new(),
            })
            .unwrap();
        registry
            .insert_power(PowerDefinition {
                id: "smite".into(),
                name: "Smite".into(),
                cost: 10.0,
                cooldown: 2.0,
                value: 1.0,
                category: PowerCategory::Strike,
                status: None,
            })
            .unwrap();
        Arc::new(registry)
    }

    fn create_test_player() -> Combatant {
        Combatant::player(
            "Hero",
            BaseStats::new(100, 40, 0, 100, 50),
            ResourceKind::Mana,
            PlayerProfile::new(1, "cleric"),
        )
    }

    fn create_test_engine() -> CombatEngine<RewardLedger> {
        CombatEngine::new(
            CombatConfig::deterministic(),
            create_test_registry(),
            create_test_player(),
            7,
            RewardLedger::new(50),
        )
    }

    #[test]
    fn actions_without_encounter_are_errors() {
        let mut engine = create_test_engine();
        assert_eq!(engine.hero_attack(), Err(CombatError::NoEncounter));
        assert!(engine.phase().is_idle());
    }

    #[test]
    fn unknown_template_is_a_registry_error() {
        let mut engine = create_test_engine();
        assert!(matches!(
            engine.start_encounter("dragon"),
            Err(CombatError::Registry(_))
        ));
        assert!(engine.phase().is_idle());
    }

    #[test]
    fn lethal_opener_commits_the_defeat() {
        use crate::ability::{AbilityDefinition, Effect, EffectPayload, Magnitude, TriggerKind};

        let mut registry = (*create_test_registry()).clone();
        registry
            .insert_ability(AbilityDefinition::new(
                "opener",
                "Opener",
                vec![Effect::new(
                    TriggerKind::CombatStart,
                    EffectPayload::Damage(Magnitude::Flat(45)),
                )],
            ))
            .unwrap();
        let mut player = create_test_player();
        registry.grant(&mut player, "opener".into()).unwrap();
        let mut engine = CombatEngine::new(
            CombatConfig::deterministic(),
            Arc::new(registry),
            player,
            7,
            RewardLedger::new(50),
        );

        let id = engine.start_encounter("slime").unwrap();
        let enemy = engine.enemy().unwrap();
        assert!(enemy.is_dying);
        assert_eq!(enemy.health(), 0);
        assert_eq!(engine.sink().grants.len(), 1);
        assert_eq!(engine.pause_state().reason(), Some(PauseReason::LevelUp));

        engine.resume();
        let report = engine.tick(5_000).unwrap();
        assert_eq!(report.reaped, Some(id));
        assert_eq!(engine.sink().grants.len(), 1);
    }

    #[test]
    fn kill_grants_rewards_and_pauses_on_level_up() {
        let mut engine = create_test_engine();
        let id = engine.start_encounter("slime").unwrap();
        assert_eq!(id, EntityId(1));

        let outcome = engine.hero_attack().unwrap();
        assert!(outcome.enemy.is_dying);
        assert_eq!(engine.sink().grants.len(), 1);
        assert_eq!(engine.sink().level, 2);
        assert_eq!(engine.pause_state().reason(), Some(PauseReason::LevelUp));

        // Paused: further actions are refused and ticks are no-ops.
        let refused = engine.hero_attack().unwrap();
        assert!(refused.is_refused());
        assert_eq!(engine.tick(5_000).unwrap(), TickReport::default());
        assert_eq!(engine.sink().grants.len(), 1);
    }

    #[test]
    fn dying_enemy_is_reaped_after_animation() {
        let mut engine = create_test_engine();
        engine.start_encounter("slime").unwrap();
        engine.hero_attack().unwrap();
        engine.resume();

        let window = engine.config().scaled_delay(engine.config().death_animation_ms);
        let early = engine.tick(window - 1).unwrap();
        assert_eq!(early.reaped, None);
        let late = engine.tick(1).unwrap();
        assert_eq!(late.reaped, Some(EntityId(1)));
        assert!(engine.enemy().is_none());

        // The next spawn gets a fresh id.
        assert_eq!(engine.start_encounter("slime").unwrap(), EntityId(2));
    }

    #[test]
    fn cast_power_starts_cooldown_and_ticks_down() {
        let mut engine = create_test_engine();
        engine.start_encounter("slime").unwrap();
        let smite = AbilityId::from("smite");

        engine.cast_power(&smite).unwrap();
        let before = engine.player().cooldown(&smite);
        assert!(before > 0.0);

        let tick_ms = engine.config().cooldown_tick_ms;
        let report = engine.tick(tick_ms).unwrap();
        assert!(report.changed);
        assert!(engine.player().cooldown(&smite) < before);
    }

    #[test]
    fn events_become_ready_after_their_delay() {
        let mut engine = create_test_engine();
        engine.start_encounter("slime").unwrap();
        engine.run(CombatAction::EnemyAttack).unwrap();

        let queued = engine.events().len();
        assert!(queued > 0);
        let last_due = engine.events().iter().map(|e| e.due_ms).max().unwrap();
        engine.tick(last_due).unwrap();
        assert_eq!(engine.pop_ready_events().len(), queued);
        assert!(engine.events().is_empty());
    }

    #[test]
    fn reset_restores_initial_player() {
        let mut engine = create_test_engine();
        engine.start_encounter("slime").unwrap();
        engine.enemy_attack().unwrap();
        engine.reset().unwrap();

        assert_eq!(engine.player(), &engine.initial_player);
        assert!(engine.enemy().is_none());
        assert!(engine.log().is_empty());
        assert!(engine.events().is_empty());
        assert!(!engine.is_paused());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn snapshot_root_tracks_changes() {
        let mut engine = create_test_engine();
        engine.start_encounter("slime").unwrap();
        let before = engine.snapshot().state_root();
        assert_eq!(engine.snapshot().state_root(), before);

        engine.enemy_attack().unwrap();
        assert_ne!(engine.snapshot().state_root(), before);
    }
}
