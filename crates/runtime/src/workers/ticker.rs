//! Wall-clock driver for the combat scheduler.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::Command;

/// Periodically sends `Tick` commands to the combat worker.
///
/// Nothing runs until [`Ticker::start`]; [`Ticker::stop`] (or drop) halts it.
/// Each tick carries the measured wall time since the previous one.
pub struct Ticker {
    command_tx: mpsc::Sender<Command>,
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl Ticker {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, period: Duration) -> Self {
        Self {
            command_tx,
            period: period.max(Duration::from_millis(1)),
            task: None,
        }
    }

    /// Spawns the tick task. Returns false if it was already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        let command_tx = self.command_tx.clone();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            let mut clock = WallClock::new(Instant::now());
            loop {
                interval.tick().await;
                let elapsed_ms = clock.elapsed_ms(Instant::now());
                let tick = Command::Tick {
                    elapsed_ms,
                    reply: None,
                };
                if command_tx.send(tick).await.is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(target: "runtime::ticker", period_ms = period.as_millis() as u64, "ticker started");
        true
    }

    /// Aborts the tick task. Returns false if it was not running.
    pub fn stop(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                tracing::debug!(target: "runtime::ticker", "ticker stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Converts wall time into whole milliseconds without losing the remainder.
///
/// The sub-millisecond part of each interval carries into the next one, so
/// the summed ticks never fall behind the wall clock by a full millisecond.
#[derive(Clone, Copy, Debug)]
struct WallClock {
    last: Instant,
    carry: Duration,
}

impl WallClock {
    fn new(start: Instant) -> Self {
        Self {
            last: start,
            carry: Duration::ZERO,
        }
    }

    fn elapsed_ms(&mut self, now: Instant) -> u64 {
        let total = self.carry + now.saturating_duration_since(self.last);
        self.last = now;
        let whole = total.as_millis() as u64;
        self.carry = total - Duration::from_millis(whole);
        whole
    }
}
