//! Conditional follow-up effects attached to an action.
//!
//! Weapon enchantments and skill riders are resolved once per action into a
//! flat list of `condition -> effect` edges. The orchestrator walks the
//! edges after every hit and bounds how deep the walk may recurse.

use crate::tags::{EffectDefinition, ResolvedEffectSpec, TagResolver, TriggerCondition};

/// A resolved effect waiting for its trigger condition.
#[derive(Clone, Debug, PartialEq)]
pub struct TriggeredEffect {
    pub name: String,
    pub spec: ResolvedEffectSpec,
    pub base_damage: f32,
}

/// What happened on one hit, as far as trigger conditions care.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitOutcome {
    pub crit: bool,
    pub killed: bool,
}

impl HitOutcome {
    pub fn satisfies(self, condition: TriggerCondition) -> bool {
        match condition {
            TriggerCondition::OnHit => true,
            TriggerCondition::OnCrit => self.crit,
            TriggerCondition::OnKill => self.killed,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriggerGraph {
    edges: Vec<(TriggerCondition, TriggeredEffect)>,
}

impl TriggerGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves every effect definition into an edge.
    ///
    /// The effect's own trigger tag picks the condition; effects without
    /// one fire on hit.
    pub fn build<'a>(
        resolver: &TagResolver,
        effects: impl IntoIterator<Item = &'a EffectDefinition>,
    ) -> Self {
        let mut graph = Self::new();
        for effect in effects {
            let spec = resolver.resolve(&effect.tags, &effect.overrides);
            let condition = spec.trigger.unwrap_or(TriggerCondition::OnHit);
            graph.add(
                condition,
                TriggeredEffect {
                    name: effect.name.clone(),
                    spec,
                    base_damage: effect.base_damage,
                },
            );
        }
        graph
    }

    pub fn add(&mut self, condition: TriggerCondition, effect: TriggeredEffect) {
        self.edges.push((condition, effect));
    }

    /// Edges whose condition the hit satisfies, in declaration order.
    pub fn fired(
        &self,
        outcome: HitOutcome,
    ) -> impl Iterator<Item = (TriggerCondition, &TriggeredEffect)> + '_ {
        self.edges
            .iter()
            .filter(move |(condition, _)| outcome.satisfies(*condition))
            .map(|(condition, effect)| (*condition, effect))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
