//! Content loaders for reading combat data from files.
//!
//! This module provides loaders that convert RON/TOML files into the
//! registries and catalogs the combat core consumes. Every catalog also has
//! an embedded copy under `data/` so hosts and tests can run without files.

pub mod config;
pub mod equipment;
pub mod factory;
pub mod scenario;
pub mod skills;
pub mod tags;

pub use config::ConfigLoader;
pub use equipment::{EquipmentFile, EquipmentLoader};
pub use factory::ContentFactory;
pub use scenario::ScenarioLoader;
pub use skills::{SkillFile, SkillLoader};
pub use tags::{TagCatalog, TagLoader};

use std::path::Path;

use ron::extensions::Extensions;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Parses RON content with newtype ids (`CombatantId`, `ItemId`, `Team`)
/// written as bare numbers.
pub(crate) fn parse_ron<T>(content: &str, what: &str) -> LoadResult<T>
where
    T: serde::de::DeserializeOwned,
{
    ron::Options::default()
        .with_default_extension(Extensions::UNWRAP_NEWTYPES)
        .from_str(content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} RON: {}", what, e))
}
