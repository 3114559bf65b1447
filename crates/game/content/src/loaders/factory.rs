//! Content factory for building combat collaborators from data files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use combat_core::{CombatConfig, EquipmentCatalog, TagRegistry};

use crate::loaders::{
    ConfigLoader, EquipmentLoader, LoadResult, ScenarioLoader, SkillLoader, TagLoader,
};
use crate::scenario::Scenario;
use crate::skills::SkillBook;

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// ├── tags.ron
/// ├── skills.ron
/// ├── equipment.ron
/// └── scenarios/
///     └── arena.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data directory shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
    }

    /// Load combat configuration from `combat.toml`, or defaults if absent.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("combat.toml");
        ConfigLoader::load_or_default(&path)
    }

    /// Load and validate the tag catalog from `tags.ron`.
    pub fn load_tags(&self) -> LoadResult<Arc<TagRegistry>> {
        let path = self.data_dir.join("tags.ron");
        TagLoader::load(&path)
    }

    /// Load the skill book from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<SkillBook> {
        let path = self.data_dir.join("skills.ron");
        SkillLoader::load(&path)
    }

    /// Load weapons and armor from `equipment.ron`.
    pub fn load_equipment(&self) -> LoadResult<EquipmentCatalog> {
        let path = self.data_dir.join("equipment.ron");
        EquipmentLoader::load(&path)
    }

    /// Load a scenario from `scenarios/{name}.ron`.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the scenario file (without `.ron` extension)
    pub fn load_scenario(&self, name: &str) -> LoadResult<Scenario> {
        let path = self
            .data_dir
            .join("scenarios")
            .join(format!("{}.ron", name));
        ScenarioLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use combat_core::{EquipmentOracle, ItemId, TagId};

    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn bundled_content_loads() {
        let factory = ContentFactory::bundled();
        let tags = factory.load_tags().unwrap();
        assert!(tags.contains(TagId::Chain));
        assert_eq!(factory.load_config().unwrap(), CombatConfig::default());
        assert!(factory.load_skills().unwrap().get("fireball").is_some());
        assert!(factory.load_equipment().unwrap().weapon(ItemId(1)).is_some());
        assert_eq!(factory.load_scenario("arena").unwrap().name, "arena");
    }

    #[test]
    fn reads_from_a_custom_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("skills.ron"),
            r#"(skills: [(id: "jab", tags: ["physical"], base_damage: 4.0)])"#,
        )
        .unwrap();
        fs::write(dir.path().join("combat.toml"), "crit_multiplier = 1.5\n").unwrap();

        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_skills().unwrap().len(), 1);
        assert_eq!(factory.load_config().unwrap().crit_multiplier, 1.5);
        assert!(factory.load_tags().is_err());
        assert!(factory.load_scenario("missing").is_err());
    }
}
