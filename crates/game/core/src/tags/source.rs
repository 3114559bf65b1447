use std::collections::BTreeMap;

use super::{ParamOverrides, TagId};

/// Overrides for every tag of one skill, weapon or enchantment.
pub type SourceOverrides = BTreeMap<TagId, ParamOverrides>;

/// A tagged effect as authored in content: a raw tag list, per-tag
/// parameter overrides and the damage it deals.
///
/// Enchantments and triggered skill effects use this shape. The first
/// trigger tag in `tags` decides when the effect fires.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EffectDefinition {
    pub name: String,
    pub tags: Vec<String>,
    pub overrides: SourceOverrides,
    pub base_damage: f32,
}

impl EffectDefinition {
    pub fn new(name: impl Into<String>, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            tags: tags.into_iter().map(Into::into).collect(),
            overrides: SourceOverrides::new(),
            base_damage: 0.0,
        }
    }

    pub fn with_base_damage(mut self, base_damage: f32) -> Self {
        self.base_damage = base_damage;
        self
    }

    pub fn with_override(mut self, tag: TagId, overrides: ParamOverrides) -> Self {
        self.overrides.insert(tag, overrides);
        self
    }
}
