//! Tag catalog loader.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use combat_core::{TagDefinition, TagId, TagRegistry};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Tag catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagCatalog {
    #[serde(default)]
    pub aliases: BTreeMap<String, TagId>,
    pub tags: Vec<TagDefinition>,
}

impl TagCatalog {
    /// Validates the catalog into an immutable registry.
    ///
    /// # Errors
    ///
    /// Returns the registry validation error with the offending tag.
    pub fn build(self) -> LoadResult<TagRegistry> {
        let mut builder = TagRegistry::builder();
        for definition in self.tags {
            builder.add(definition);
        }
        for (alias, target) in self.aliases {
            builder.add_alias(alias, target);
        }
        builder
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid tag catalog: {}", e))
    }
}

/// Loader for the tag catalog.
pub struct TagLoader;

impl TagLoader {
    /// Load and validate a tag catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a TagCatalog
    ///
    /// # Returns
    ///
    /// Returns the validated registry, ready to share between resolvers.
    pub fn load(path: &Path) -> LoadResult<Arc<TagRegistry>> {
        let content = read_file(path)?;
        Self::load_str(&content)
    }

    /// Load the catalog shipped with this crate.
    pub fn load_embedded() -> LoadResult<Arc<TagRegistry>> {
        Self::load_str(include_str!("../../data/tags.ron"))
    }

    pub fn load_str(content: &str) -> LoadResult<Arc<TagRegistry>> {
        let catalog: TagCatalog = parse_ron(content, "tag catalog")?;
        let registry = catalog.build()?;
        tracing::debug!(
            "loaded tag catalog: {} tags, {} aliases",
            registry.len(),
            registry.aliases().count()
        );
        Ok(Arc::new(registry))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn embedded_catalog_matches_builtin() {
        let registry = TagLoader::load_embedded().unwrap();
        assert_eq!(*registry, TagRegistry::standard());
    }

    #[test]
    fn loads_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
                aliases: {{ "zap": lightning }},
                tags: [
                    (id: lightning, effect: damage(lightning)),
                    (id: chain, effect: geometry(chain(chain_count: 3, chain_range: 4.0, chain_falloff: 0.5)), priority: 70),
                ],
            )"#
        )
        .unwrap();

        let registry = TagLoader::load(file.path()).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("zap"), Some(TagId::Lightning));
        assert_eq!(registry.get(TagId::Chain).map(|d| d.priority), Some(70));
    }

    #[test]
    fn rejects_one_sided_conflicts() {
        let content = r#"(
            tags: [
                (id: burn, effect: status((duration: 4.0, tick_rate: 1.0, magnitude: 5.0, chance: 1.0, policy: additive)), conflicts: [freeze]),
                (id: freeze, effect: status((duration: 2.0, tick_rate: 1.0, magnitude: 1.0, chance: 1.0, policy: none))),
            ],
        )"#;
        let error = TagLoader::load_str(content).unwrap_err();
        assert!(error.to_string().contains("Invalid tag catalog"));
    }

    #[test]
    fn rejects_effect_of_wrong_category() {
        let content = "(tags: [(id: fire, effect: trigger(on_hit))])";
        assert!(TagLoader::load_str(content).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = TagLoader::load(&dir.path().join("tags.ron")).unwrap_err();
        assert!(error.to_string().contains("Failed to read file"));
    }
}
