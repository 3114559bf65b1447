//! Scenario loader.

use std::collections::BTreeSet;
use std::path::Path;

use crate::loaders::{LoadResult, parse_ron, read_file};
use crate::scenario::Scenario;

/// Loader for scripted encounters.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load a scenario from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a Scenario
    ///
    /// # Returns
    ///
    /// Returns the scenario with its script ordered by time.
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::load_str(&content)
    }

    pub fn load_str(content: &str) -> LoadResult<Scenario> {
        let mut scenario: Scenario = parse_ron(content, "scenario")?;

        if !(scenario.duration.is_finite() && scenario.duration > 0.0) {
            return Err(anyhow::anyhow!(
                "Scenario {} has invalid duration {}",
                scenario.name,
                scenario.duration
            ));
        }

        let mut ids = BTreeSet::new();
        for spec in &scenario.combatants {
            if !ids.insert(spec.id) {
                return Err(anyhow::anyhow!(
                    "Scenario {} spawns {} twice",
                    scenario.name,
                    spec.id
                ));
            }
        }

        for action in &scenario.script {
            if !ids.contains(&action.attacker) {
                return Err(anyhow::anyhow!(
                    "Scenario {} scripts unknown attacker {}",
                    scenario.name,
                    action.attacker
                ));
            }
            if !(action.at.is_finite() && action.at >= 0.0) {
                return Err(anyhow::anyhow!(
                    "Scenario {} schedules {} at invalid time {}",
                    scenario.name,
                    action.skill,
                    action.at
                ));
            }
            if action.at >= scenario.duration {
                tracing::warn!(
                    "scenario {}: {} at {}s is past the end ({}s) and will never run",
                    scenario.name,
                    action.skill,
                    action.at,
                    scenario.duration
                );
            }
        }

        scenario.sort_script();
        Ok(scenario)
    }
}
