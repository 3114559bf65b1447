//! Immutable, validated tag table.
//!
//! A [`TagRegistry`] is built once at load time through
//! [`TagRegistryBuilder`], which rejects malformed catalogs, and is then
//! shared read-only (typically as `Arc<TagRegistry>`) by every resolver.

use std::collections::BTreeMap;

use crate::error::{CombatError, ErrorSeverity};

use super::params::ParamError;
use super::{TagCategory, TagDefinition, TagId};

/// Errors raised while validating a tag catalog.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("tag `{0}` is defined more than once")]
    DuplicateTag(TagId),

    #[error("tag `{tag}` belongs to category `{expected}` but its effect does not")]
    CategoryMismatch { tag: TagId, expected: TagCategory },

    #[error("tag `{tag}` has an invalid parameter: {source}")]
    InvalidParameter {
        tag: TagId,
        #[source]
        source: ParamError,
    },

    #[error("tag `{tag}` has an invalid synergy with `{partner}`: {source}")]
    InvalidSynergy {
        tag: TagId,
        partner: TagId,
        #[source]
        source: ParamError,
    },

    #[error("tag `{tag}` references unregistered tag `{referenced}`")]
    UnknownReference { tag: TagId, referenced: TagId },

    #[error("tag `{0}` lists itself as a conflict")]
    SelfConflict(TagId),

    #[error("`{tag}` conflicts with `{other}` but not the other way round")]
    AsymmetricConflict { tag: TagId, other: TagId },

    #[error("alias `{alias}` targets unregistered tag `{target}`")]
    AliasToUnregistered { alias: String, target: TagId },

    #[error("alias `{0}` shadows a canonical tag id")]
    AliasShadowsTag(String),
}

impl CombatError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use RegistryError::*;
        match self {
            DuplicateTag(_) => "REGISTRY_DUPLICATE_TAG",
            CategoryMismatch { .. } => "REGISTRY_CATEGORY_MISMATCH",
            InvalidParameter { .. } => "REGISTRY_INVALID_PARAMETER",
            InvalidSynergy { .. } => "REGISTRY_INVALID_SYNERGY",
            UnknownReference { .. } => "REGISTRY_UNKNOWN_REFERENCE",
            SelfConflict(_) => "REGISTRY_SELF_CONFLICT",
            AsymmetricConflict { .. } => "REGISTRY_ASYMMETRIC_CONFLICT",
            AliasToUnregistered { .. } => "REGISTRY_ALIAS_UNREGISTERED",
            AliasShadowsTag(_) => "REGISTRY_ALIAS_SHADOWS_TAG",
        }
    }
}

/// Validated tag catalog plus alias table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TagRegistry {
    definitions: BTreeMap<TagId, TagDefinition>,
    aliases: BTreeMap<String, TagId>,
}

impl TagRegistry {
    pub fn builder() -> TagRegistryBuilder {
        TagRegistryBuilder::default()
    }

    /// Assembles a registry from parts that are already known to be valid.
    pub(super) fn from_parts(
        definitions: BTreeMap<TagId, TagDefinition>,
        aliases: BTreeMap<String, TagId>,
    ) -> Self {
        Self {
            definitions,
            aliases,
        }
    }

    pub fn get(&self, id: TagId) -> Option<&TagDefinition> {
        self.definitions.get(&id)
    }

    pub fn contains(&self, id: TagId) -> bool {
        self.definitions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn definitions(&self) -> impl Iterator<Item = &TagDefinition> {
        self.definitions.values()
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, TagId)> {
        self.aliases.iter().map(|(alias, &id)| (alias.as_str(), id))
    }

    /// Maps a raw tag string to a registered canonical id.
    ///
    /// Matching is case-insensitive; aliases are expanded first. Returns
    /// `None` for strings that name no registered tag.
    pub fn lookup(&self, raw: &str) -> Option<TagId> {
        let key = raw.trim().to_ascii_lowercase();
        let id = match self.aliases.get(&key) {
            Some(&target) => target,
            None => TagId::parse(&key)?,
        };
        self.contains(id).then_some(id)
    }

    /// True when `a` and `b` may not co-occur.
    pub fn conflicts(&self, a: TagId, b: TagId) -> bool {
        self.get(a).is_some_and(|def| def.conflicts_with_tag(b))
    }
}

/// Collects definitions and aliases, then validates them as a whole.
#[derive(Clone, Debug, Default)]
pub struct TagRegistryBuilder {
    definitions: Vec<TagDefinition>,
    aliases: Vec<(String, TagId)>,
}

impl TagRegistryBuilder {
    pub fn define(mut self, definition: TagDefinition) -> Self {
        self.add(definition);
        self
    }

    pub fn add(&mut self, definition: TagDefinition) {
        self.definitions.push(definition);
    }

    pub fn alias(mut self, alias: impl Into<String>, target: TagId) -> Self {
        self.add_alias(alias, target);
        self
    }

    pub fn add_alias(&mut self, alias: impl Into<String>, target: TagId) {
        self.aliases.push((alias.into(), target));
    }

    /// Validates the collected catalog.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistryError`] found; nothing is partially built.
    pub fn build(self) -> Result<TagRegistry, RegistryError> {
        let mut definitions = BTreeMap::new();
        for definition in self.definitions {
            let tag = definition.id;
            if !definition.effect.fits(tag.category()) {
                return Err(RegistryError::CategoryMismatch {
                    tag,
                    expected: tag.category(),
                });
            }
            definition
                .effect
                .validate()
                .map_err(|source| RegistryError::InvalidParameter { tag, source })?;
            if definitions.insert(tag, definition).is_some() {
                return Err(RegistryError::DuplicateTag(tag));
            }
        }

        for definition in definitions.values() {
            validate_references(definition, &definitions)?;
        }

        let mut aliases = BTreeMap::new();
        for (alias, target) in self.aliases {
            let alias = alias.trim().to_ascii_lowercase();
            if TagId::parse(&alias).is_some() {
                return Err(RegistryError::AliasShadowsTag(alias));
            }
            if !definitions.contains_key(&target) {
                return Err(RegistryError::AliasToUnregistered { alias, target });
            }
            aliases.insert(alias, target);
        }

        Ok(TagRegistry {
            definitions,
            aliases,
        })
    }
}

fn validate_references(
    definition: &TagDefinition,
    all: &BTreeMap<TagId, TagDefinition>,
) -> Result<(), RegistryError> {
    let tag = definition.id;
    for &other in &definition.conflicts {
        if other == tag {
            return Err(RegistryError::SelfConflict(tag));
        }
        let Some(other_def) = all.get(&other) else {
            return Err(RegistryError::UnknownReference {
                tag,
                referenced: other,
            });
        };
        if !other_def.conflicts_with_tag(tag) {
            return Err(RegistryError::AsymmetricConflict { tag, other });
        }
    }
    for rule in &definition.synergies {
        if !all.contains_key(&rule.partner) {
            return Err(RegistryError::UnknownReference {
                tag,
                referenced: rule.partner,
            });
        }
        // The bonus must address a real parameter and keep it valid.
        let mut probe = definition.effect;
        probe
            .apply_bonus(rule.param, rule.bonus)
            .map_err(|source| RegistryError::InvalidSynergy {
                tag,
                partner: rule.partner,
                source,
            })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::DamageType;
    use crate::status::StackingPolicy;
    use crate::tags::{Geometry, ParamKey, StatusParams, SynergyBonus, TagEffect};

    fn burn() -> TagDefinition {
        TagDefinition::new(
            TagId::Burn,
            TagEffect::Status(StatusParams::new(4.0, 1.0, 5.0, StackingPolicy::Additive)),
        )
    }

    fn freeze() -> TagDefinition {
        TagDefinition::new(
            TagId::Freeze,
            TagEffect::Status(StatusParams::new(2.0, 1.0, 1.0, StackingPolicy::None)),
        )
    }

    fn fire() -> TagDefinition {
        TagDefinition::new(TagId::Fire, TagEffect::Damage(DamageType::Fire))
    }

    #[test]
    fn builds_symmetric_catalog() {
        let registry = TagRegistry::builder()
            .define(burn().conflicts_with([TagId::Freeze]))
            .define(freeze().conflicts_with([TagId::Burn]))
            .define(fire())
            .alias("Blaze", TagId::Fire)
            .build()
            .unwrap();
        assert_eq!(registry.len(), 3);
        assert!(registry.conflicts(TagId::Burn, TagId::Freeze));
        assert_eq!(registry.lookup("BLAZE"), Some(TagId::Fire));
        assert_eq!(registry.lookup("fire"), Some(TagId::Fire));
        // Known id but not registered in this catalog.
        assert_eq!(registry.lookup("frost"), None);
    }

    #[test]
    fn rejects_duplicates() {
        let err = TagRegistry::builder()
            .define(fire())
            .define(fire())
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTag(TagId::Fire));
        assert_eq!(err.error_code(), "REGISTRY_DUPLICATE_TAG");
    }

    #[test]
    fn rejects_category_mismatch() {
        let err = TagRegistry::builder()
            .define(TagDefinition::new(
                TagId::Chain,
                TagEffect::Damage(DamageType::Lightning),
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::CategoryMismatch { tag: TagId::Chain, .. }));
    }

    #[test]
    fn rejects_asymmetric_and_self_conflicts() {
        let err = TagRegistry::builder()
            .define(burn().conflicts_with([TagId::Freeze]))
            .define(freeze())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::AsymmetricConflict {
                tag: TagId::Burn,
                other: TagId::Freeze
            }
        );

        let err = TagRegistry::builder()
            .define(burn().conflicts_with([TagId::Burn]))
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::SelfConflict(TagId::Burn));
    }

    #[test]
    fn rejects_unregistered_references() {
        let err = TagRegistry::builder()
            .define(burn().with_synergy(
                TagId::Fire,
                ParamKey::Magnitude,
                SynergyBonus::Percent(0.25),
            ))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::UnknownReference {
                tag: TagId::Burn,
                referenced: TagId::Fire
            }
        );
    }

    #[test]
    fn rejects_synergy_on_missing_parameter() {
        let err = TagRegistry::builder()
            .define(burn().with_synergy(TagId::Fire, ParamKey::Radius, SynergyBonus::Flat(1.0)))
            .define(fire())
            .build()
            .unwrap_err();
        assert_eq!(err.error_code(), "REGISTRY_INVALID_SYNERGY");
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let err = TagRegistry::builder()
            .define(TagDefinition::new(
                TagId::Circle,
                TagEffect::Geometry(Geometry::Circle {
                    radius: 0.0,
                    falloff: Default::default(),
                }),
            ))
            .build()
            .unwrap_err();
        assert_eq!(err.error_code(), "REGISTRY_INVALID_PARAMETER");
    }

    #[test]
    fn rejects_diminishing_status_without_cap() {
        let uncapped = StatusParams::new(1.0, 1.0, 1.0, StackingPolicy::Diminishing);
        let err = TagRegistry::builder()
            .define(TagDefinition::new(TagId::Stun, TagEffect::Status(uncapped)))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::InvalidParameter {
                tag: TagId::Stun,
                source: ParamError::UncappedDiminishing,
            }
        );

        let registry = TagRegistry::builder()
            .define(TagDefinition::new(
                TagId::Stun,
                TagEffect::Status(uncapped.with_max_stacks(5)),
            ))
            .build();
        assert!(registry.is_ok());
    }

    #[test]
    fn rejects_bad_aliases() {
        let err = TagRegistry::builder()
            .define(fire())
            .alias("frost", TagId::Fire)
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::AliasShadowsTag("frost".into()));

        let err = TagRegistry::builder()
            .define(fire())
            .alias("ice", TagId::Frost)
            .build()
            .unwrap_err();
        assert_eq!(err.error_code(), "REGISTRY_ALIAS_UNREGISTERED");
    }
}
