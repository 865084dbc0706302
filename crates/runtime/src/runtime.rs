//! High-level runtime orchestrator.
//!
//! The runtime owns the combat worker and the ticker, wires up command/event
//! channels, and exposes a builder-based API for clients to drive a combat.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use combat_content::ContentBundle;
use combat_core::{
    AbilityRegistry, CombatConfig, CombatEngine, Combatant, NullProgression, ProgressionSink,
};

use crate::api::{CombatHandle, Result, RuntimeError};
use crate::events::{CombatEvent, EventBus, Topic};
use crate::workers::{Command, CombatWorker, EnemyCadence, Ticker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// RNG seed. A random one is drawn when absent.
    pub seed: Option<u64>,
    /// Whether the worker attacks for the enemy on its own cadence.
    pub auto_enemy: bool,
    /// Enemy attack interval at speed 100, before the global speed multiplier.
    pub enemy_attack_interval_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            seed: None,
            auto_enemy: true,
            enemy_attack_interval_ms: 2_000,
        }
    }
}

/// Running combat: a worker task plus its ticker.
///
/// [`CombatHandle`] provides a cloneable façade for clients.
pub struct CombatRuntime {
    handle: CombatHandle,
    ticker: Ticker,
    worker_handle: JoinHandle<()>,
    seed: u64,
}

impl CombatRuntime {
    /// Create a new runtime builder
    pub fn builder() -> CombatRuntimeBuilder<NullProgression> {
        CombatRuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> CombatHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<CombatEvent> {
        self.handle.subscribe(topic)
    }

    /// Seed the engine RNG was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut Ticker {
        &mut self.ticker
    }

    /// Shutdown the runtime gracefully.
    ///
    /// Commands already queued are processed first; later ones fail with
    /// [`RuntimeError::CommandChannelClosed`].
    pub async fn shutdown(mut self) -> Result<()> {
        self.ticker.stop();
        self.handle.shutdown().await?;
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;
        Ok(())
    }
}

/// Builder for [`CombatRuntime`] with flexible configuration.
pub struct CombatRuntimeBuilder<S> {
    config: RuntimeConfig,
    registry: Option<Arc<AbilityRegistry>>,
    player: Option<Combatant>,
    sink: S,
}

impl CombatRuntimeBuilder<NullProgression> {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            registry: None,
            player: None,
            sink: NullProgression,
        }
    }
}

impl<S> CombatRuntimeBuilder<S>
where
    S: ProgressionSink + Send + 'static,
{
    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn combat_config(mut self, combat: CombatConfig) -> Self {
        self.config.combat = combat;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn auto_enemy(mut self, enabled: bool) -> Self {
        self.config.auto_enemy = enabled;
        self
    }

    pub fn registry(mut self, registry: impl Into<Arc<AbilityRegistry>>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    /// Uses the registry and combat tuning of a loaded content bundle.
    pub fn content(mut self, bundle: ContentBundle) -> Self {
        self.config.combat = bundle.config;
        self.registry = Some(Arc::new(bundle.registry));
        self
    }

    /// Set the player combatant (required)
    pub fn player(mut self, player: Combatant) -> Self {
        self.player = Some(player);
        self
    }

    /// Route rewards to a progression sink instead of discarding them.
    pub fn progression<T>(self, sink: T) -> CombatRuntimeBuilder<T>
    where
        T: ProgressionSink + Send + 'static,
    {
        CombatRuntimeBuilder {
            config: self.config,
            registry: self.registry,
            player: self.player,
            sink,
        }
    }

    /// Build the runtime and spawn its worker. The ticker is left stopped.
    pub async fn build(self) -> Result<CombatRuntime> {
        let player = self.player.ok_or(RuntimeError::MissingPlayer)?;
        let registry = self.registry.unwrap_or_default();
        let seed = self.config.seed.unwrap_or_else(rand::random);

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = CombatHandle::new(command_tx.clone(), event_bus.clone());

        let tick_period = Duration::from_millis(self.config.combat.cooldown_tick_ms);
        let cadence = EnemyCadence::new(self.config.enemy_attack_interval_ms, self.config.auto_enemy);
        let engine = CombatEngine::new(self.config.combat, registry, player, seed, self.sink);
        let worker = CombatWorker::new(engine, command_rx, event_bus, cadence);

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });
        tracing::info!(target: "runtime::worker", seed, "combat runtime started");

        Ok(CombatRuntime {
            handle,
            ticker: Ticker::new(command_tx, tick_period),
            worker_handle,
            seed,
        })
    }
}
