use crate::state::CombatantId;
use crate::tags::{EffectDefinition, ParamKey, ParamValue, SourceOverrides, TagId};
use crate::targeting::ActionTarget;

/// One attack or skill use submitted to [`super::CombatEngine::resolve_action`].
///
/// `tags` are the skill's raw tags; the attacker's weapon tags are appended
/// during resolution. `triggered` holds extra effects that fire on hit,
/// crit or kill on top of the weapon's enchantments.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRequest {
    pub attacker: CombatantId,
    pub tags: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub overrides: SourceOverrides,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_damage: f32,
    pub target: ActionTarget,
    #[cfg_attr(feature = "serde", serde(default))]
    pub triggered: Vec<EffectDefinition>,
}

impl ActionRequest {
    pub fn new(
        attacker: CombatantId,
        tags: impl IntoIterator<Item = impl Into<String>>,
        target: ActionTarget,
    ) -> Self {
        Self {
            attacker,
            tags: tags.into_iter().map(Into::into).collect(),
            overrides: SourceOverrides::new(),
            base_damage: 0.0,
            target,
            triggered: Vec::new(),
        }
    }

    pub fn with_base_damage(mut self, base_damage: f32) -> Self {
        self.base_damage = base_damage;
        self
    }

    /// Overrides one parameter of one tag for this request only.
    pub fn with_override(mut self, tag: TagId, key: ParamKey, value: ParamValue) -> Self {
        self.overrides.entry(tag).or_default().insert(key, value);
        self
    }

    pub fn with_overrides(mut self, overrides: SourceOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_triggered(mut self, effect: EffectDefinition) -> Self {
        self.triggered.push(effect);
        self
    }

    /// Same request aimed elsewhere.
    pub fn retarget(mut self, target: ActionTarget) -> Self {
        self.target = target;
        self
    }
}
