//! Play a hero through a sequence of encounters.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast::{self, error::TryRecvError};

use combat_core::{AbilityId, CombatAction, RewardLedger};
use combat_runtime::{CombatEvent, CombatHandle, CombatRuntime, RuntimeConfig, Topic};

use super::load_content;

/// Fight a sequence of encounters
#[derive(Parser)]
pub struct Duel {
    /// Hero id from the content
    #[arg(long, default_value = "berserker")]
    pub hero: String,

    /// Enemy template to fight; repeat for a gauntlet
    #[arg(short, long = "enemy", value_name = "TEMPLATE", default_values_t = [String::from("rat")])]
    pub enemies: Vec<String>,

    /// RNG seed (falls back to COMBAT_SIM_SEED, then a random seed)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Content directory (defaults to the embedded content)
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Hero actions before giving up
    #[arg(long, default_value_t = 300)]
    pub max_rounds: u32,

    /// Scheduler time between hero actions
    #[arg(long, default_value_t = 500)]
    pub step_ms: u64,

    /// Drive time with the wall-clock ticker instead of manual ticks
    #[arg(long)]
    pub realtime: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Combat log lines
    Text,
    /// One JSON event per line
    Json,
}

/// How a duel ended.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DuelSummary {
    pub victories: u32,
    pub defeated: bool,
    pub rounds: u32,
    pub xp: u32,
    pub gold: u32,
    pub items: u32,
}

impl Duel {
    pub async fn execute(self) -> Result<()> {
        let bundle = load_content(self.data_dir.as_deref())?;
        let spec = bundle
            .hero(&self.hero)
            .with_context(|| format!("unknown hero `{}`", self.hero))?
            .clone();
        let (player, warnings) = spec
            .spawn(&bundle.registry)
            .with_context(|| format!("hero `{}` failed to spawn", spec.id))?;
        for warning in warnings {
            tracing::warn!(hero = %spec.id, %warning, "hero stat replaced");
        }

        let seed = self.seed.or_else(seed_from_env);
        let mut config = RuntimeConfig {
            combat: bundle.config.clone(),
            seed,
            ..RuntimeConfig::default()
        };
        // Keep every event between drains.
        config.event_buffer_size = config.event_buffer_size.max(1_024);

        let mut runtime = CombatRuntime::builder()
            .config(config)
            .content(bundle)
            .player(player)
            .progression(RewardLedger::new(100))
            .build()
            .await?;
        println!("seed: {}", runtime.seed());

        let handle = runtime.handle();
        let mut printer = Printer::new(&handle, self.format);
        if self.realtime {
            runtime.ticker_mut().start();
        }

        let plan = Plan {
            enemies: self.enemies.clone(),
            powers: spec.powers.clone(),
            max_rounds: self.max_rounds,
            step: Duration::from_millis(self.step_ms),
            realtime: self.realtime,
        };
        let summary = run(&handle, &plan, &mut printer).await?;
        let root = handle.snapshot().await?.state_root();
        runtime.shutdown().await?;

        println!(
            "result: {} | victories {}/{} | rounds {} | xp {} | gold {} | items {} | state {}",
            if summary.defeated { "defeat" } else { "survived" },
            summary.victories,
            plan.enemies.len(),
            summary.rounds,
            summary.xp,
            summary.gold,
            summary.items,
            hex::encode(root),
        );
        Ok(())
    }
}

fn seed_from_env() -> Option<u64> {
    std::env::var("COMBAT_SIM_SEED").ok()?.trim().parse().ok()
}

/// What the scripted hero does.
pub struct Plan {
    pub enemies: Vec<String>,
    /// Powers tried in order before falling back to an auto-attack.
    pub powers: Vec<AbilityId>,
    pub max_rounds: u32,
    pub step: Duration,
    pub realtime: bool,
}

/// Runs the plan to completion against a live runtime.
pub async fn run(handle: &CombatHandle, plan: &Plan, printer: &mut Printer) -> Result<DuelSummary> {
    let mut summary = DuelSummary::default();

    'encounters: for template in &plan.enemies {
        let enemy = handle.start_encounter(template.as_str()).await?;
        tracing::info!(%enemy, template, "encounter");

        loop {
            if summary.rounds >= plan.max_rounds {
                tracing::warn!(rounds = summary.rounds, "round limit reached");
                break 'encounters;
            }
            summary.rounds += 1;

            act(handle, plan).await?;
            advance(handle, plan).await?;
            printer.drain(&mut summary)?;

            let snapshot = handle.snapshot().await?;
            if snapshot.player_defeated {
                summary.defeated = true;
                break 'encounters;
            }
            if snapshot.pause.is_paused() {
                // Dismiss level-up and loot prompts.
                handle.resume().await?;
            }
            match snapshot.enemy {
                Some(enemy) if !enemy.is_dying => {}
                _ => break,
            }
        }

        // Let the death animation play out before the next spawn.
        loop {
            let snapshot = handle.snapshot().await?;
            if snapshot.enemy.is_none() {
                break;
            }
            if snapshot.pause.is_paused() {
                handle.resume().await?;
            }
            advance(handle, plan).await?;
            printer.drain(&mut summary)?;
        }
        summary.victories += 1;
    }

    printer.drain(&mut summary)?;
    Ok(summary)
}

async fn act(handle: &CombatHandle, plan: &Plan) -> Result<()> {
    for power in &plan.powers {
        let outcome = handle.act(CombatAction::CastPower(power.clone())).await?;
        if !outcome.is_refused() {
            return Ok(());
        }
    }
    handle.hero_attack().await?;
    Ok(())
}

async fn advance(handle: &CombatHandle, plan: &Plan) -> Result<()> {
    if plan.realtime {
        tokio::time::sleep(plan.step).await;
    } else {
        handle.tick(plan.step.as_millis() as u64).await?;
    }
    Ok(())
}

/// Prints events as they arrive.
pub struct Printer {
    combat: broadcast::Receiver<CombatEvent>,
    rewards: broadcast::Receiver<CombatEvent>,
    format: OutputFormat,
    quiet: bool,
}

impl Printer {
    pub fn new(handle: &CombatHandle, format: OutputFormat) -> Self {
        Self {
            combat: handle.subscribe(Topic::Combat),
            rewards: handle.subscribe(Topic::Rewards),
            format,
            quiet: false,
        }
    }

    /// Collects events without printing them.
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    fn drain(&mut self, summary: &mut DuelSummary) -> Result<()> {
        loop {
            let event = match self.rewards.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "reward events dropped");
                    continue;
                }
            };
            if let CombatEvent::RewardGranted(reward) = &event {
                summary.xp += reward.xp;
                summary.gold += reward.gold;
                summary.items += u32::from(reward.item_drop.is_some());
            }
            self.print(&event)?;
        }

        loop {
            let event = match self.combat.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "combat events dropped");
                    continue;
                }
            };
            self.print(&event)?;
        }
        Ok(())
    }

    fn print(&self, event: &CombatEvent) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(event)?),
            OutputFormat::Text => match event {
                CombatEvent::EncounterStarted { template, .. } => {
                    println!("== {template} ==");
                }
                CombatEvent::ActionResolved { outcome, .. } => {
                    for line in &outcome.logs {
                        println!("{line}");
                    }
                }
                CombatEvent::Ticked { logs, .. } => {
                    for line in logs {
                        println!("  {line}");
                    }
                }
                CombatEvent::RewardGranted(reward) => {
                    let drop = match &reward.item_drop {
                        Some(item) => format!(", {} item", item.rarity),
                        None => String::new(),
                    };
                    println!("+{} xp, +{} gold{drop}", reward.xp, reward.gold);
                }
                CombatEvent::PlayerDefeated { .. } => println!("The hero has fallen."),
                _ => {}
            },
        }
        Ok(())
    }
}
