//! Skill definitions and the skill book.
//!
//! A skill is a named, reusable action template: its tags, per-tag
//! overrides, base damage and riders. Hosts turn a skill plus an attacker
//! and a target into an [`ActionRequest`].

use std::collections::BTreeMap;

use combat_core::{ActionRequest, ActionTarget, CombatantId, EffectDefinition, SourceOverrides};

/// One skill as authored in `skills.ron`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: String,
    pub tags: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_damage: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub overrides: SourceOverrides,
    /// Riders evaluated on hit, crit or kill.
    #[cfg_attr(feature = "serde", serde(default))]
    pub triggered: Vec<EffectDefinition>,
}

impl SkillDefinition {
    pub fn new(id: impl Into<String>, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            id: id.into(),
            tags: tags.into_iter().map(Into::into).collect(),
            base_damage: 0.0,
            overrides: SourceOverrides::new(),
            triggered: Vec::new(),
        }
    }

    pub fn with_base_damage(mut self, base_damage: f32) -> Self {
        self.base_damage = base_damage;
        self
    }

    pub fn with_triggered(mut self, effect: EffectDefinition) -> Self {
        self.triggered.push(effect);
        self
    }

    /// Builds the request for one use of this skill.
    pub fn request(&self, attacker: CombatantId, target: ActionTarget) -> ActionRequest {
        ActionRequest {
            attacker,
            tags: self.tags.clone(),
            overrides: self.overrides.clone(),
            base_damage: self.base_damage,
            target,
            triggered: self.triggered.clone(),
        }
    }
}

/// Skills keyed by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkillBook {
    skills: BTreeMap<String, SkillDefinition>,
}

impl SkillBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a skill, returning the definition it replaced.
    pub fn insert(&mut self, skill: SkillDefinition) -> Option<SkillDefinition> {
        self.skills.insert(skill.id.clone(), skill)
    }

    pub fn get(&self, id: &str) -> Option<&SkillDefinition> {
        self.skills.get(id)
    }

    /// Builds the request for `attacker` using skill `id` on `target`.
    ///
    /// Returns `None` for an unknown skill id.
    pub fn request(
        &self,
        id: &str,
        attacker: CombatantId,
        target: ActionTarget,
    ) -> Option<ActionRequest> {
        self.get(id).map(|skill| skill.request(attacker, target))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.skills.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl FromIterator<SkillDefinition> for SkillBook {
    fn from_iter<I: IntoIterator<Item = SkillDefinition>>(iter: I) -> Self {
        let mut book = Self::new();
        for skill in iter {
            book.insert(skill);
        }
        book
    }
}
