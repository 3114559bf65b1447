//! Tag definitions: the immutable rows of the registry.

use crate::combat::DamageType;

use super::params::{
    ContextFilter, Geometry, ParamError, ParamKey, ParamSlot, ParamValue, SpecialEffect,
    StatusParams, SynergyBonus, TriggerCondition,
};
use super::{TagCategory, TagId};

/// Typed payload of a tag, one variant per category.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TagEffect {
    Geometry(Geometry),
    Damage(DamageType),
    Status(StatusParams),
    Special(SpecialEffect),
    Trigger(TriggerCondition),
    Context(ContextFilter),
}

impl TagEffect {
    /// Whether this payload may back a tag of the given category.
    pub fn fits(&self, category: TagCategory) -> bool {
        matches!(
            (self, category),
            (TagEffect::Geometry(_), TagCategory::Geometry)
                | (TagEffect::Damage(_), TagCategory::DamageType)
                | (TagEffect::Status(_), TagCategory::StatusDebuff | TagCategory::StatusBuff)
                | (TagEffect::Special(_), TagCategory::Special)
                | (TagEffect::Trigger(_), TagCategory::Trigger)
                | (TagEffect::Context(_), TagCategory::Context)
        )
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        match self {
            TagEffect::Geometry(geometry) => geometry.validate(),
            TagEffect::Status(params) => params.validate(),
            TagEffect::Special(special) => special.validate(),
            TagEffect::Damage(_) | TagEffect::Trigger(_) | TagEffect::Context(_) => Ok(()),
        }
    }

    fn slot(&mut self, key: ParamKey) -> Option<ParamSlot<'_>> {
        match self {
            TagEffect::Geometry(geometry) => geometry.slot(key),
            TagEffect::Status(params) => params.slot(key),
            TagEffect::Special(special) => special.slot(key),
            TagEffect::Damage(_) | TagEffect::Trigger(_) | TagEffect::Context(_) => None,
        }
    }

    /// Replaces one parameter. On error `self` is left untouched.
    pub fn apply_override(&mut self, key: ParamKey, value: ParamValue) -> Result<(), ParamError> {
        let mut next = *self;
        next.slot(key)
            .ok_or(ParamError::NotApplicable(key))?
            .set(key, value)?;
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Adds a synergy bonus to one parameter. On error `self` is left untouched.
    pub fn apply_bonus(&mut self, key: ParamKey, bonus: SynergyBonus) -> Result<(), ParamError> {
        let mut next = *self;
        next.slot(key)
            .ok_or(ParamError::NotApplicable(key))?
            .add(key, bonus)?;
        next.validate()?;
        *self = next;
        Ok(())
    }
}

/// Parameter bonus unlocked when `partner` is also present in a tag list.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynergyRule {
    pub partner: TagId,
    pub param: ParamKey,
    pub bonus: SynergyBonus,
}

/// One tag of the registry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagDefinition {
    pub id: TagId,
    pub effect: TagEffect,
    /// Tags that may not co-occur with this one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub conflicts: Vec<TagId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub synergies: Vec<SynergyRule>,
    /// Geometry selection priority; higher wins. Ignored for other categories.
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: u8,
}

impl TagDefinition {
    pub fn new(id: TagId, effect: TagEffect) -> Self {
        Self {
            id,
            effect,
            conflicts: Vec::new(),
            synergies: Vec::new(),
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn conflicts_with(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.conflicts.extend(tags);
        self
    }

    pub fn with_synergy(mut self, partner: TagId, param: ParamKey, bonus: SynergyBonus) -> Self {
        self.synergies.push(SynergyRule {
            partner,
            param,
            bonus,
        });
        self
    }

    pub fn category(&self) -> TagCategory {
        self.id.category()
    }

    pub fn conflicts_with_tag(&self, other: TagId) -> bool {
        self.conflicts.contains(&other)
    }
}
