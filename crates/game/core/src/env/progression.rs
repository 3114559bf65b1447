use std::collections::BTreeMap;

use crate::state::CombatantId;

/// Permanent bonuses owned by the progression collaborator (titles, feats).
///
/// Queried by the damage pipeline, never computed here.
pub trait ProgressionOracle: Send + Sync {
    /// Damage multiplier granted by titles and permanent unlocks.
    fn title_multiplier(&self, combatant: CombatantId) -> f32;
}

/// Progression oracle for encounters without any permanent bonuses.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgression;

impl ProgressionOracle for NoProgression {
    fn title_multiplier(&self, _combatant: CombatantId) -> f32 {
        1.0
    }
}

/// Fixed table of title multipliers keyed by combatant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TitleTable {
    multipliers: BTreeMap<CombatantId, f32>,
}

impl TitleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, combatant: CombatantId, multiplier: f32) -> Self {
        self.multipliers.insert(combatant, multiplier);
        self
    }
}

impl ProgressionOracle for TitleTable {
    fn title_multiplier(&self, combatant: CombatantId) -> f32 {
        self.multipliers.get(&combatant).copied().unwrap_or(1.0)
    }
}
