//! Scripted encounters: who fights, where they stand and what they do when.

use combat_core::{
    ActionTarget, Attributes, Combatant, CombatantId, Encounter, Loadout, Position, TagId, Team,
};

/// Initial state of one combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnSpec {
    pub id: CombatantId,
    pub team: Team,
    pub position: Position,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Attributes,
    pub health: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub class_tags: Vec<TagId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loadout: Loadout,
}

impl SpawnSpec {
    pub fn to_combatant(&self) -> Combatant {
        Combatant::new(
            self.id,
            self.team,
            self.position,
            self.attributes,
            self.health,
        )
        .with_mana(self.mana)
        .with_class_tags(self.class_tags.iter().copied())
        .with_loadout(self.loadout.clone())
    }
}

/// A skill use scheduled at `at` seconds into the encounter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScriptedAction {
    pub at: f32,
    pub attacker: CombatantId,
    pub skill: String,
    pub target: ActionTarget,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    pub name: String,
    /// Default RNG seed; hosts may override it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: u64,
    /// Simulated length in seconds.
    pub duration: f32,
    pub combatants: Vec<SpawnSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub script: Vec<ScriptedAction>,
}

impl Scenario {
    /// Spawns every combatant into `encounter`.
    pub fn spawn_into(&self, encounter: &mut Encounter) {
        for spec in &self.combatants {
            encounter.spawn(spec.to_combatant());
        }
    }

    /// Builds a fresh encounter seeded with `seed` and populated by this scenario.
    pub fn encounter(&self, seed: u64) -> Encounter {
        let mut encounter = Encounter::new(seed);
        self.spawn_into(&mut encounter);
        encounter
    }

    /// Orders the script by time; actions scheduled together keep file order.
    pub fn sort_script(&mut self) {
        self.script.sort_by(|a, b| a.at.total_cmp(&b.at));
    }

    /// Actions scheduled in `[from, to)`, in script order.
    pub fn due(&self, from: f32, to: f32) -> impl Iterator<Item = &ScriptedAction> {
        self.script
            .iter()
            .filter(move |action| action.at >= from && action.at < to)
    }

    pub fn spawn_spec(&self, id: CombatantId) -> Option<&SpawnSpec> {
        self.combatants.iter().find(|spec| spec.id == id)
    }
}
