//! List the available content.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use super::load_content;

/// List heroes, enemies and powers
#[derive(Parser)]
pub struct List {
    /// Content directory (defaults to the embedded content)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

impl List {
    pub fn execute(self) -> Result<()> {
        let bundle = load_content(self.data_dir.as_deref())?;

        println!("Heroes:");
        for hero in &bundle.heroes {
            println!(
                "  {:<12} {:<12} {:<9} powers: {}",
                hero.id,
                hero.path,
                hero.resource,
                hero.powers
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        println!("Enemies:");
        let mut ids: Vec<&str> = bundle.registry.enemy_ids().collect();
        ids.sort_unstable();
        for id in ids {
            if let Some(template) = bundle.registry.enemy_template(id) {
                println!(
                    "  {:<12} {:<18} {:<7} hp {:>4}  power {:>3}  armor {:>3}  speed {:>3}",
                    template.id,
                    template.name,
                    template.tier,
                    template.stats.max_health,
                    template.stats.power,
                    template.stats.armor,
                    template.stats.speed,
                );
            }
        }
        Ok(())
    }
}
