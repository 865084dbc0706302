//! Headless combat simulator.
//!
//! Loads content (embedded or from a data directory), spawns a combat
//! runtime and plays a hero through a list of encounters, printing the
//! combat log as it happens.
//!
//! ```bash
//! cargo run -p combat-sim -- duel --hero arcanist --enemy rat --enemy troll --seed 7
//! cargo run -p combat-sim -- list
//! cargo run -p combat-sim -- validate crates/game/content/data
//! ```

mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use commands::{Duel, List, Validate};

/// Headless combat simulator
#[derive(Parser)]
#[command(name = "combat-sim")]
#[command(about = "Run combat encounters without a frontend", long_about = None)]
#[command(version)]
struct Cli {
    /// Also write logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Fight a sequence of encounters
    Duel(Duel),

    /// List heroes, enemies and powers
    List(List),

    /// Load and validate a content directory
    Validate(Validate),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for RUST_LOG and COMBAT_SIM_SEED)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = logging::setup_logging(cli.log_file.as_deref())?;

    match cli.command {
        Command::Duel(cmd) => cmd.execute().await,
        Command::List(cmd) => cmd.execute(),
        Command::Validate(cmd) => cmd.execute(),
    }
}
