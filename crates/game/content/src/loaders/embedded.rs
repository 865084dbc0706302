//! Default content compiled into the binary.

use crate::loaders::{
    AbilityLoader, ConfigLoader, ContentBundle, EnemyLoader, HeroLoader, LoadResult, PowerLoader,
    RegistryLoader,
};

pub const CONFIG: &str = include_str!("../../data/config.toml");
pub const ABILITIES: &str = include_str!("../../data/abilities.ron");
pub const POWERS: &str = include_str!("../../data/powers.ron");
pub const ENEMIES: &str = include_str!("../../data/enemies.ron");
pub const HEROES: &str = include_str!("../../data/heroes.ron");

/// Parses and validates the built-in content.
pub fn bundle() -> LoadResult<ContentBundle> {
    let registry = RegistryLoader::build(
        AbilityLoader::parse(ABILITIES)?,
        PowerLoader::parse(POWERS)?,
        EnemyLoader::parse(ENEMIES)?,
    )?;
    Ok(ContentBundle {
        config: ConfigLoader::parse(CONFIG)?,
        registry,
        heroes: HeroLoader::parse(HEROES)?,
    })
}
