//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat balance configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing CombatConfig
    ///
    /// # Returns
    ///
    /// Returns a CombatConfig. Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::load_str(&content)
    }

    /// Load the configuration shipped with this crate.
    pub fn load_embedded() -> LoadResult<CombatConfig> {
        Self::load_str(include_str!("../../data/combat.toml"))
    }

    pub fn load_str(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse combat config TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid combat config: {}", e))?;

        if config.trigger_depth > CombatConfig::MAX_TRIGGER_DEPTH {
            tracing::warn!(
                "trigger_depth {} exceeds the limit of {}; it will be clamped",
                config.trigger_depth,
                CombatConfig::MAX_TRIGGER_DEPTH
            );
        }
        Ok(config)
    }

    /// Like [`Self::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> LoadResult<CombatConfig> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!("{} not found, using default combat config", path.display());
            Ok(CombatConfig::default())
        }
    }
}
