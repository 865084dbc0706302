//! Combat worker that owns the authoritative [`CombatEngine`].
//!
//! Receives commands from [`CombatHandle`](crate::CombatHandle), runs them
//! against the engine one at a time and publishes [`CombatEvent`]s.

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use combat_core::{
    ActionOutcome, CombatAction, CombatEngine, CombatSnapshot, EntityId, PauseReason,
    ProgressionSink, TickReport,
};

use crate::api::Result;
use crate::events::{CombatEvent, EventBus};

/// Commands that can be sent to the combat worker
pub enum Command {
    StartEncounter {
        template: String,
        reply: oneshot::Sender<Result<EntityId>>,
    },
    Act {
        action: CombatAction,
        reply: oneshot::Sender<Result<ActionOutcome>>,
    },
    /// Scheduler time. The ticker sends these without a reply channel.
    Tick {
        elapsed_ms: u64,
        reply: Option<oneshot::Sender<Result<TickReport>>>,
    },
    Pause {
        reason: PauseReason,
        reply: oneshot::Sender<PauseReason>,
    },
    Resume {
        reply: oneshot::Sender<Option<PauseReason>>,
    },
    Snapshot {
        reply: oneshot::Sender<CombatSnapshot>,
    },
    Log {
        reply: oneshot::Sender<Vec<String>>,
    },
    Reset {
        reply: oneshot::Sender<Result<()>>,
    },
    Shutdown,
}

/// Accumulates scheduler time towards the enemy's next automatic attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyCadence {
    /// Interval for an enemy with speed 100, before the global speed multiplier.
    pub base_interval_ms: u64,
    pub enabled: bool,
    elapsed_ms: u64,
}

impl EnemyCadence {
    pub fn new(base_interval_ms: u64, enabled: bool) -> Self {
        Self {
            base_interval_ms,
            enabled,
            elapsed_ms: 0,
        }
    }

    /// Faster enemies attack more often: `base × 100 / speed`.
    pub fn interval_ms(&self, speed: i32) -> u64 {
        self.base_interval_ms.saturating_mul(100) / speed.max(1) as u64
    }

    /// Adds `elapsed_ms`; returns true when an attack is due.
    pub fn advance(&mut self, elapsed_ms: u64, interval_ms: u64) -> bool {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms < interval_ms.max(1) {
            return false;
        }
        self.elapsed_ms -= interval_ms.max(1);
        true
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }
}

/// Background task that processes combat commands.
pub struct CombatWorker<S: ProgressionSink> {
    engine: CombatEngine<S>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    cadence: EnemyCadence,
    last_root: Option<[u8; 32]>,
}

impl<S: ProgressionSink> CombatWorker<S> {
    pub fn new(
        engine: CombatEngine<S>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        cadence: EnemyCadence,
    ) -> Self {
        Self {
            engine,
            command_rx,
            event_bus,
            cadence,
            last_root: None,
        }
    }

    /// Main worker loop. Ends on `Shutdown` or when every sender is gone.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            if matches!(cmd, Command::Shutdown) {
                debug!(target: "runtime::worker", "shutdown requested");
                break;
            }
            self.handle_command(cmd);
        }
        debug!(target: "runtime::worker", clock_ms = self.engine.clock_ms(), "combat worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::StartEncounter { template, reply } => {
                let result = self.start_encounter(&template);
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "StartEncounter reply channel closed (caller dropped)");
                }
            }
            Command::Act { action, reply } => {
                let result = self.act(action);
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "Act reply channel closed (caller dropped)");
                }
            }
            Command::Tick { elapsed_ms, reply } => {
                let result = self.tick(elapsed_ms);
                match reply {
                    Some(reply) => {
                        if reply.send(result).is_err() {
                            debug!(target: "runtime::worker", "Tick reply channel closed (caller dropped)");
                        }
                    }
                    None => {
                        if let Err(error) = result {
                            tracing::warn!(target: "runtime::worker", %error, "scheduled tick failed");
                        }
                    }
                }
            }
            Command::Pause { reason, reply } => {
                let effective = self.engine.pause(reason);
                self.event_bus.publish(CombatEvent::Paused(effective));
                self.publish_state();
                let _ = reply.send(effective);
            }
            Command::Resume { reply } => {
                let cleared = self.engine.resume();
                if let Some(reason) = cleared {
                    self.event_bus.publish(CombatEvent::Resumed(reason));
                    self.publish_state();
                }
                let _ = reply.send(cleared);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.engine.snapshot());
            }
            Command::Log { reply } => {
                let _ = reply.send(self.engine.log().iter().map(str::to_owned).collect());
            }
            Command::Reset { reply } => {
                let result = self.engine.reset().map_err(Into::into);
                self.cadence.reset();
                self.publish_state();
                let _ = reply.send(result);
            }
            Command::Shutdown => {}
        }
    }

    fn start_encounter(&mut self, template: &str) -> Result<EntityId> {
        let was_paused = self.engine.is_paused();
        let enemy = self.engine.start_encounter(template)?;
        self.cadence.reset();
        self.event_bus.publish(CombatEvent::EncounterStarted {
            enemy,
            template: template.to_owned(),
            clock_ms: self.engine.clock_ms(),
        });
        if !was_paused {
            if let Some(reason) = self.engine.pause_state().reason() {
                self.event_bus.publish(CombatEvent::Paused(reason));
            }
        }
        self.flush_presentation();
        self.publish_state();
        Ok(enemy)
    }

    fn act(&mut self, action: CombatAction) -> Result<ActionOutcome> {
        let was_paused = self.engine.is_paused();
        let outcome = self.engine.run(action.clone())?;
        let clock_ms = self.engine.clock_ms();

        if let Some(refusal) = &outcome.refusal {
            debug!(
                target: "runtime::worker",
                action = action.as_str(),
                %refusal,
                "action refused"
            );
            self.event_bus.publish(CombatEvent::ActionRefused {
                action,
                refusal: refusal.clone(),
                clock_ms,
            });
            return Ok(outcome);
        }

        if let Some(reward) = &outcome.rewards {
            self.event_bus.publish(CombatEvent::RewardGranted(reward.clone()));
        }
        if outcome.player_defeated {
            self.event_bus.publish(CombatEvent::PlayerDefeated { clock_ms });
        }
        self.event_bus.publish(CombatEvent::ActionResolved {
            action,
            outcome: Box::new(outcome.clone()),
            clock_ms,
        });
        if !was_paused {
            if let Some(reason) = self.engine.pause_state().reason() {
                self.event_bus.publish(CombatEvent::Paused(reason));
            }
        }
        self.flush_presentation();
        self.publish_state();
        Ok(outcome)
    }

    fn tick(&mut self, elapsed_ms: u64) -> Result<TickReport> {
        let report = self.engine.tick(elapsed_ms)?;
        let clock_ms = self.engine.clock_ms();
        if !report.logs.is_empty() {
            self.event_bus.publish(CombatEvent::Ticked {
                logs: report.logs.clone(),
                clock_ms,
            });
        }
        if let Some(enemy) = report.reaped {
            self.event_bus.publish(CombatEvent::EnemyReaped { enemy, clock_ms });
        }

        if self.enemy_attack_due(elapsed_ms) {
            self.act(CombatAction::EnemyAttack)?;
        }
        self.flush_presentation();
        self.publish_state();
        Ok(report)
    }

    fn enemy_attack_due(&mut self, elapsed_ms: u64) -> bool {
        if !self.cadence.enabled || self.engine.is_paused() || self.engine.is_player_defeated() {
            return false;
        }
        let Some(enemy) = self.engine.enemy() else {
            return false;
        };
        if enemy.is_dying {
            return false;
        }
        let interval = self
            .engine
            .config()
            .scaled_delay(self.cadence.interval_ms(enemy.current_stats.speed));
        self.cadence.advance(elapsed_ms, interval)
    }

    fn flush_presentation(&mut self) {
        let ready = self.engine.pop_ready_events();
        if !ready.is_empty() {
            self.event_bus.publish(CombatEvent::Presentation(ready));
        }
    }

    /// Publishes the snapshot if its digest changed since the last one sent.
    fn publish_state(&mut self) {
        let snapshot = self.engine.snapshot();
        let root = snapshot.state_root();
        if self.last_root == Some(root) {
            return;
        }
        self.last_root = Some(root);
        tracing::trace!(target: "runtime::worker", root = %hex::encode(root), "state changed");
        self.event_bus.publish(CombatEvent::StateChanged {
            root,
            snapshot: Box::new(snapshot),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faster_enemies_attack_sooner() {
        let cadence = EnemyCadence::new(2_000, true);
        assert_eq!(cadence.interval_ms(100), 2_000);
        assert_eq!(cadence.interval_ms(200), 1_000);
        assert_eq!(cadence.interval_ms(50), 4_000);
        assert_eq!(cadence.interval_ms(0), 200_000);
    }

    #[test]
    fn cadence_carries_the_remainder() {
        let mut cadence = EnemyCadence::new(1_000, true);
        assert!(!cadence.advance(600, 1_000));
        assert!(cadence.advance(600, 1_000));
        assert!(!cadence.advance(700, 1_000));
        assert!(cadence.advance(100, 1_000));
        cadence.reset();
        assert!(!cadence.advance(999, 1_000));
    }
}
