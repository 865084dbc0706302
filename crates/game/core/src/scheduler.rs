//! Fixed-cadence timers: regen, cooldowns, buff and shield expiry.
//!
//! The scheduler runs independently of actions. Callers feed it wall-clock
//! elapsed time; it converts that into whole ticks at the configured
//! cadences and applies them to each combatant. A tick that changes nothing
//! returns `None` so downstream consumers can skip the update.

use crate::ability::AbilityRegistry;
use crate::config::CombatConfig;
use crate::state::Combatant;

/// Seconds to apply this tick, per timer family.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickBudget {
    pub cooldown_secs: Option<f64>,
    pub regen_secs: Option<f64>,
}

impl TickBudget {
    pub fn is_empty(&self) -> bool {
        self.cooldown_secs.is_none() && self.regen_secs.is_none()
    }
}

/// Accumulates elapsed time into whole cadence ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cadence {
    cooldown_ms: u64,
    regen_ms: u64,
}

impl Cadence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `elapsed_ms` and returns the ticks that became due.
    pub fn advance(&mut self, elapsed_ms: u64, config: &CombatConfig) -> TickBudget {
        TickBudget {
            cooldown_secs: Self::drain(&mut self.cooldown_ms, elapsed_ms, config.cooldown_tick_ms),
            regen_secs: Self::drain(&mut self.regen_ms, elapsed_ms, config.regen_tick_ms),
        }
    }

    fn drain(acc: &mut u64, elapsed_ms: u64, tick_ms: u64) -> Option<f64> {
        let tick_ms = tick_ms.max(1);
        *acc = acc.saturating_add(elapsed_ms);
        let ticks = *acc / tick_ms;
        if ticks == 0 {
            return None;
        }
        *acc -= ticks * tick_ms;
        Some((ticks * tick_ms) as f64 / 1000.0)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Updated combatant plus expiry log lines.
#[derive(Clone, Debug, PartialEq)]
pub struct TickOutcome {
    pub combatant: Combatant,
    pub logs: Vec<String>,
}

/// Lowest cooldown recovery rate, so a positive cooldown always shrinks.
const MIN_RECOVERY: f64 = 0.1;

/// Applies one scheduler tick to a combatant.
///
/// Returns `None` if nothing changed. Dying combatants are frozen.
pub fn tick_combatant(
    combatant: &Combatant,
    budget: TickBudget,
    config: &CombatConfig,
    registry: &AbilityRegistry,
) -> Option<TickOutcome> {
    if budget.is_empty() || combatant.is_dying {
        return None;
    }

    let speed = config.speed_multiplier.max(0.0);
    let mut next = combatant.clone();
    let mut logs = Vec::new();

    if let Some(secs) = budget.cooldown_secs {
        let dt = secs * speed;
        tick_cooldowns(&mut next, dt, config, registry);
        tick_durations(&mut next, dt, &mut logs);
    }

    if let Some(secs) = budget.regen_secs {
        let rule = config.resources.get(next.resource_kind);
        if rule.regen_per_second > 0.0 && next.resource() < next.max_resource() {
            next.restore_resource(rule.regen_per_second * secs * speed);
        }
    }

    if next == *combatant {
        return None;
    }
    tracing::trace!(target: "combat::scheduler", id = %next.id, "tick applied");
    Some(TickOutcome {
        combatant: next,
        logs,
    })
}

fn tick_cooldowns(
    combatant: &mut Combatant,
    dt: f64,
    config: &CombatConfig,
    registry: &AbilityRegistry,
) {
    if dt <= 0.0 {
        return;
    }
    let epsilon = config.cooldown_epsilon;
    let owned = combatant.owned_abilities.clone();

    combatant.cooldowns.retain(|power, remaining| {
        let recovery = registry
            .power_tuning(&owned, Some(power))
            .recovery
            .max(MIN_RECOVERY);
        *remaining -= dt * recovery;
        *remaining >= epsilon
    });
    combatant.internal_cooldowns.retain(|_, remaining| {
        *remaining -= dt;
        *remaining >= epsilon
    });
}

fn tick_durations(combatant: &mut Combatant, dt: f64, logs: &mut Vec<String>) {
    if dt <= 0.0 {
        return;
    }

    let mut expired = false;
    for buff in &mut combatant.active_buffs {
        buff.remaining -= dt;
    }
    combatant.active_buffs.retain(|buff| {
        if buff.is_expired() {
            logs.push(format!("{}'s {} from {} fades", combatant.name, buff.stat, buff.source));
            expired = true;
            return false;
        }
        true
    });
    if expired {
        combatant.recompute_stats();
    }

    if let Some(shield) = combatant.shield.as_mut() {
        shield.remaining -= dt;
        if !shield.is_active() {
            combatant.shield = None;
            logs.push(format!("{}'s shield fades", combatant.name));
        }
    }
}
