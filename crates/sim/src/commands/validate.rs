//! Validate a content directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::load_content;

/// Load and validate a content directory
#[derive(Parser)]
pub struct Validate {
    /// Content directory to check
    #[arg(value_name = "DIR")]
    data_dir: PathBuf,
}

impl Validate {
    pub fn execute(self) -> Result<()> {
        let bundle = load_content(Some(&self.data_dir))
            .with_context(|| format!("{} is not valid content", self.data_dir.display()))?;

        for spec in &bundle.heroes {
            let (_, warnings) = spec
                .spawn(&bundle.registry)
                .with_context(|| format!("hero `{}`", spec.id))?;
            for warning in warnings {
                println!("warning: hero `{}`: {}", spec.id, warning);
            }
        }

        println!(
            "ok: {} registry entries, {} heroes",
            bundle.registry.len(),
            bundle.heroes.len()
        );
        Ok(())
    }
}
