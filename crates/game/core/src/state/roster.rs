//! Combatant roster for one encounter.

use super::{Combatant, CombatantId};

/// All combatants of an encounter, in spawn order.
///
/// Lookups are linear; rosters are small (tens of combatants) and spawn
/// order doubles as a stable iteration order for deterministic ticking.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    combatants: Vec<Combatant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a combatant, replacing any existing one with the same id.
    pub fn insert(&mut self, combatant: Combatant) {
        match self.combatants.iter_mut().find(|c| c.id == combatant.id) {
            Some(existing) => *existing = combatant,
            None => self.combatants.push(combatant),
        }
    }

    /// Removes a combatant (despawn) and returns it.
    pub fn remove(&mut self, id: CombatantId) -> Option<Combatant> {
        let index = self.combatants.iter().position(|c| c.id == id)?;
        Some(self.combatants.remove(index))
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn contains(&self, id: CombatantId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.combatants.iter_mut()
    }

    /// Living combatants only.
    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(|c| c.is_alive())
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}

impl FromIterator<Combatant> for Roster {
    fn from_iter<T: IntoIterator<Item = Combatant>>(iter: T) -> Self {
        let mut roster = Roster::new();
        for combatant in iter {
            roster.insert(combatant);
        }
        roster
    }
}
