//! Tag resolution: raw tag strings to a normalized effect spec.
//!
//! Resolution is a pure function of the registry and its input. It never
//! fails: unknown tags and malformed overrides are logged and skipped, and
//! an empty list yields a single-target physical spec.

use std::sync::Arc;

use crate::combat::DamageType;
use crate::status::StatusKind;

use super::params::{ContextFilter, Geometry, SpecialEffect, StatusParams, TriggerCondition};
use super::{SourceOverrides, TagEffect, TagId, TagRegistry};

/// A status entry of a resolved spec, with overrides and synergies applied.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedStatus {
    pub kind: StatusKind,
    pub params: StatusParams,
}

/// Normalized description of one skill, weapon or enchantment activation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedEffectSpec {
    /// Surviving canonical tags in declaration order.
    pub tags: Vec<TagId>,
    pub geometry: Geometry,
    pub damage_types: Vec<DamageType>,
    pub statuses: Vec<ResolvedStatus>,
    pub specials: Vec<SpecialEffect>,
    pub trigger: Option<TriggerCondition>,
    pub context: ContextFilter,
}

impl ResolvedEffectSpec {
    pub fn has_tag(&self, tag: TagId) -> bool {
        self.tags.contains(&tag)
    }

    pub fn primary_damage_type(&self) -> DamageType {
        self.damage_types
            .first()
            .copied()
            .unwrap_or(DamageType::Physical)
    }

    pub fn lifesteal(&self) -> Option<f32> {
        self.specials.iter().find_map(|special| match *special {
            SpecialEffect::Lifesteal { fraction } => Some(fraction),
            _ => None,
        })
    }

    pub fn knockback(&self) -> Option<f32> {
        self.specials.iter().find_map(|special| match *special {
            SpecialEffect::Knockback { distance } => Some(distance),
            _ => None,
        })
    }
}

impl Default for ResolvedEffectSpec {
    /// The minimal spec: single target, physical, no statuses, enemy context.
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            geometry: Geometry::SingleTarget,
            damage_types: vec![DamageType::Physical],
            statuses: Vec::new(),
            specials: Vec::new(),
            trigger: None,
            context: ContextFilter::Enemy,
        }
    }
}

/// Turns raw tag lists into [`ResolvedEffectSpec`]s against a shared registry.
#[derive(Clone, Debug)]
pub struct TagResolver {
    registry: Arc<TagRegistry>,
}

impl TagResolver {
    pub fn new(registry: Arc<TagRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    /// Resolves a raw tag list.
    ///
    /// 1. aliases expand and unknown tags drop out (duplicates keep their first slot)
    /// 2. a tag conflicting with an earlier surviving tag is dropped
    /// 3. per-tag overrides, then synergy bonuses, are applied to parameters
    /// 4. the highest-priority geometry wins; ties go to the earlier tag
    pub fn resolve<S: AsRef<str>>(
        &self,
        raw: &[S],
        overrides: &SourceOverrides,
    ) -> ResolvedEffectSpec {
        let tags = self.surviving_tags(raw);

        let mut spec = ResolvedEffectSpec {
            tags: Vec::with_capacity(tags.len()),
            damage_types: Vec::new(),
            ..ResolvedEffectSpec::default()
        };
        let mut geometry: Option<(u8, Geometry)> = None;
        let mut context: Option<ContextFilter> = None;

        for &tag in &tags {
            let Some(definition) = self.registry.get(tag) else {
                continue;
            };
            let mut effect = definition.effect;

            if let Some(params) = overrides.get(&tag) {
                for (&key, &value) in params {
                    if let Err(err) = effect.apply_override(key, value) {
                        tracing::warn!(
                            "override {}={:?} on `{}` ignored: {}",
                            key,
                            value,
                            tag,
                            err
                        );
                    }
                }
            }
            for rule in &definition.synergies {
                if !tags.contains(&rule.partner) {
                    continue;
                }
                if let Err(err) = effect.apply_bonus(rule.param, rule.bonus) {
                    tracing::warn!("synergy `{}`+`{}` skipped: {}", tag, rule.partner, err);
                }
            }

            spec.tags.push(tag);
            match effect {
                TagEffect::Geometry(shape) => {
                    let better = geometry.is_none_or(|(best, _)| definition.priority > best);
                    if better {
                        geometry = Some((definition.priority, shape));
                    }
                }
                TagEffect::Damage(damage) => spec.damage_types.push(damage),
                TagEffect::Status(params) => match StatusKind::from_tag(tag) {
                    Some(kind) => spec.statuses.push(ResolvedStatus { kind, params }),
                    None => tracing::warn!("status tag `{}` has no status kind", tag),
                },
                TagEffect::Special(special) => spec.specials.push(special),
                TagEffect::Trigger(condition) => {
                    if let Some(first) = spec.trigger {
                        tracing::warn!("trigger `{}` ignored, `{}` already set", condition, first);
                    } else {
                        spec.trigger = Some(condition);
                    }
                }
                TagEffect::Context(filter) => {
                    context.get_or_insert(filter);
                }
            }
        }

        if let Some((_, shape)) = geometry {
            spec.geometry = shape;
        }
        if spec.damage_types.is_empty() {
            spec.damage_types.push(DamageType::Physical);
        }
        spec.context = context.unwrap_or_default();
        spec
    }

    /// Canonical, registered, deduplicated and conflict-free tags in input order.
    fn surviving_tags<S: AsRef<str>>(&self, raw: &[S]) -> Vec<TagId> {
        let mut kept: Vec<TagId> = Vec::with_capacity(raw.len());
        for name in raw {
            let name = name.as_ref();
            let Some(tag) = self.registry.lookup(name) else {
                tracing::warn!("unknown tag `{}` ignored", name);
                continue;
            };
            if kept.contains(&tag) {
                continue;
            }
            if let Some(&earlier) = kept.iter().find(|&&k| self.registry.conflicts(k, tag)) {
                tracing::debug!("tag `{}` dropped: conflicts with `{}`", tag, earlier);
                continue;
            }
            kept.push(tag);
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{ParamKey, ParamOverrides, ParamValue};

    fn resolver() -> TagResolver {
        TagResolver::new(Arc::new(TagRegistry::standard()))
    }

    fn resolve(tags: &[&str]) -> ResolvedEffectSpec {
        resolver().resolve(tags, &SourceOverrides::new())
    }

    #[test]
    fn empty_list_is_minimal_spec() {
        let spec = resolve(&[]);
        assert_eq!(spec, ResolvedEffectSpec::default());
        assert_eq!(spec.geometry, Geometry::SingleTarget);
        assert_eq!(spec.damage_types, vec![DamageType::Physical]);
    }

    #[test]
    fn unknown_tags_are_ignored() {
        let spec = resolve(&["fire", "sparkly", "burn"]);
        assert_eq!(spec.tags, vec![TagId::Fire, TagId::Burn]);
    }

    #[test]
    fn duplicates_collapse_to_first() {
        let spec = resolve(&["frost", "ice", "cold", "Frost"]);
        assert_eq!(spec.tags, vec![TagId::Frost]);
        assert_eq!(spec.damage_types, vec![DamageType::Frost]);
    }

    #[test]
    fn later_conflicting_tag_is_dropped() {
        let spec = resolve(&["freeze", "burn"]);
        assert_eq!(spec.statuses.len(), 1);
        assert_eq!(spec.statuses[0].kind, StatusKind::Freeze);

        let spec = resolve(&["burn", "freeze"]);
        assert_eq!(spec.statuses[0].kind, StatusKind::Burn);
    }

    #[test]
    fn highest_priority_geometry_wins() {
        let spec = resolve(&["projectile", "circle", "cone"]);
        assert!(matches!(spec.geometry, Geometry::Circle { .. }));
        let spec = resolve(&["chain", "circle"]);
        assert!(matches!(spec.geometry, Geometry::Chain { .. }));
    }

    #[test]
    fn synergies_apply_after_overrides() {
        let mut overrides = SourceOverrides::new();
        let mut burn = ParamOverrides::new();
        burn.insert(ParamKey::Magnitude, ParamValue::Number(8.0));
        overrides.insert(TagId::Burn, burn);

        let spec = resolver().resolve(&["burn", "fire"], &overrides);
        assert!((spec.statuses[0].params.magnitude - 10.0).abs() < 1e-5);
    }

    #[test]
    fn invalid_override_keeps_default() {
        let mut overrides = SourceOverrides::new();
        let mut burn = ParamOverrides::new();
        burn.insert(ParamKey::Chance, ParamValue::Number(3.0));
        burn.insert(ParamKey::Radius, ParamValue::Number(2.0));
        overrides.insert(TagId::Burn, burn);

        let spec = resolver().resolve(&["burn"], &overrides);
        assert_eq!(spec.statuses[0].params.chance, 1.0);
    }

    #[test]
    fn only_first_trigger_and_context_survive() {
        let spec = resolve(&["on_crit", "on_hit", "ally", "enemy"]);
        assert_eq!(spec.trigger, Some(TriggerCondition::OnCrit));
        assert_eq!(spec.context, ContextFilter::Ally);
        assert!(!spec.has_tag(TagId::Enemy));
    }

    #[test]
    fn specials_are_collected() {
        let spec = resolve(&["vampiric", "knockback"]);
        assert_eq!(spec.lifesteal(), Some(0.15));
        assert_eq!(spec.knockback(), Some(2.0));
    }
}
