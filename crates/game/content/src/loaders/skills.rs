//! Skill book loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};
use crate::skills::{SkillBook, SkillDefinition};

/// Skill book structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillFile {
    pub skills: Vec<SkillDefinition>,
}

/// Loader for the skill book.
pub struct SkillLoader;

impl SkillLoader {
    /// Load skills from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a SkillFile
    ///
    /// # Returns
    ///
    /// Returns a SkillBook keyed by skill id.
    pub fn load(path: &Path) -> LoadResult<SkillBook> {
        let content = read_file(path)?;
        Self::load_str(&content)
    }

    /// Load the skills shipped with this crate.
    pub fn load_embedded() -> LoadResult<SkillBook> {
        Self::load_str(include_str!("../../data/skills.ron"))
    }

    /// Tags are kept as written; unknown ones are reported by the resolver
    /// when the skill is used, not here.
    pub fn load_str(content: &str) -> LoadResult<SkillBook> {
        let file: SkillFile = parse_ron(content, "skill book")?;
        let mut book = SkillBook::new();
        for skill in file.skills {
            if skill.id.trim().is_empty() {
                return Err(anyhow::anyhow!("Skill with an empty id"));
            }
            if !(skill.base_damage.is_finite() && skill.base_damage >= 0.0) {
                return Err(anyhow::anyhow!(
                    "Skill {} has invalid base damage {}",
                    skill.id,
                    skill.base_damage
                ));
            }
            let id = skill.id.clone();
            if book.insert(skill).is_some() {
                return Err(anyhow::anyhow!("Duplicate skill id {}", id));
            }
        }
        tracing::debug!("loaded {} skills", book.len());
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use combat_core::{
        ActionTarget, CombatantId, Geometry, SourceOverrides, TagId, TagRegistry, TagResolver,
        TriggerCondition,
    };

    use super::*;

    #[test]
    fn embedded_skills_resolve_cleanly() {
        let book = SkillLoader::load_embedded().unwrap();
        assert!(book.len() >= 8);

        let registry = TagRegistry::standard();
        for id in book.ids() {
            let skill = book.get(id).unwrap();
            let riders = skill.triggered.iter().flat_map(|effect| &effect.tags);
            for raw in skill.tags.iter().chain(riders) {
                assert!(registry.lookup(raw).is_some(), "{id}: unknown tag {raw}");
            }
        }
    }

    #[test]
    fn fireball_carries_its_rider() {
        let book = SkillLoader::load_embedded().unwrap();
        let request = book
            .request("fireball", CombatantId(1), ActionTarget::Combatant(CombatantId(2)))
            .unwrap();
        assert_eq!(request.base_damage, 30.0);
        assert_eq!(request.triggered.len(), 1);

        let resolver = TagResolver::new(Arc::new(TagRegistry::standard()));
        let rider = &request.triggered[0];
        let spec = resolver.resolve(&rider.tags, &SourceOverrides::new());
        assert_eq!(spec.trigger, Some(TriggerCondition::OnCrit));
    }

    #[test]
    fn overrides_are_parsed_per_tag() {
        let content = r#"(
            skills: [
                (
                    id: "storm",
                    tags: ["lightning", "chain"],
                    base_damage: 20.0,
                    overrides: { chain: { chain_count: 4 } },
                ),
            ],
        )"#;
        let book = SkillLoader::load_str(content).unwrap();
        let skill = book.get("storm").unwrap();
        assert!(skill.overrides.contains_key(&TagId::Chain));

        let resolver = TagResolver::new(Arc::new(TagRegistry::standard()));
        let spec = resolver.resolve(&skill.tags, &skill.overrides);
        assert!(matches!(
            spec.geometry,
            Geometry::Chain { chain_count: 4, .. }
        ));
    }

    #[test]
    fn duplicate_skill_ids_are_rejected() {
        let content = r#"(
            skills: [
                (id: "strike", tags: ["physical"]),
                (id: "strike", tags: ["fire"]),
            ],
        )"#;
        let error = SkillLoader::load_str(content).unwrap_err();
        assert!(error.to_string().contains("Duplicate skill id strike"));
    }
}
