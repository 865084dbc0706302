//! Simulator subcommands.

mod duel;
mod list;
mod validate;

pub use duel::Duel;
pub use list::List;
pub use validate::Validate;

use std::path::Path;

use anyhow::Result;
use combat_content::{ContentBundle, ContentFactory, embedded};

/// Loads content from `data_dir`, or the embedded defaults when absent.
pub fn load_content(data_dir: Option<&Path>) -> Result<ContentBundle> {
    match data_dir {
        Some(dir) => ContentFactory::new(dir).load_bundle(),
        None => embedded::bundle(),
    }
}
