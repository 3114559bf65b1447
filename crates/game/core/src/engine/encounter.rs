use crate::combat::CombatEvent;
use crate::state::{Combatant, CombatantId, Roster, Tick};

/// Mutable state of one fight.
///
/// Owns every combatant, the fixed-step clock and the queue of events
/// waiting for rendering, audio and telemetry consumers. All mutation goes
/// through [`super::CombatEngine`].
#[derive(Clone, Debug, Default)]
pub struct Encounter {
    pub(super) roster: Roster,
    pub(super) clock: Tick,
    /// Frame time not yet consumed by a fixed step.
    pub(super) accumulator: f32,
    pub(super) nonce: u64,
    seed: u64,
    pub(super) outbox: Vec<CombatEvent>,
}

impl Encounter {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Adds a combatant, replacing any previous one with the same id.
    pub fn spawn(&mut self, combatant: Combatant) {
        tracing::debug!("spawned {} at {}", combatant.id, combatant.position);
        self.roster.insert(combatant);
    }

    /// Removes a combatant together with its active statuses.
    pub fn despawn(&mut self, id: CombatantId) -> Option<Combatant> {
        let removed = self.roster.remove(id);
        if removed.is_some() {
            tracing::debug!("despawned {}", id);
        }
        removed
    }

    /// Despawns every dead combatant, returning their ids.
    pub fn remove_dead(&mut self) -> Vec<CombatantId> {
        let dead: Vec<CombatantId> = self
            .roster
            .iter()
            .filter(|c| !c.is_alive())
            .map(|c| c.id)
            .collect();
        for &id in &dead {
            self.roster.remove(id);
        }
        dead
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.roster.get(id)
    }

    /// Direct access for hosts that move combatants between actions.
    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.roster.get_mut(id)
    }

    pub fn clock(&self) -> Tick {
        self.clock
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of actions resolved so far.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Returns the nonce for a new action and advances the counter.
    pub(super) fn next_nonce(&mut self) -> u64 {
        let nonce = self.nonce;
        self.nonce += 1;
        nonce
    }

    /// Events emitted since the last drain.
    pub fn events(&self) -> &[CombatEvent] {
        &self.outbox
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// True while at least two teams still have a living combatant.
    pub fn is_contested(&self) -> bool {
        let mut teams = self.roster.living().map(|c| c.team);
        match teams.next() {
            Some(first) => teams.any(|team| team != first),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Attributes, Position, Team};

    fn unit(id: u32, team: Team) -> Combatant {
        Combatant::new(CombatantId(id), team, Position::ORIGIN, Attributes::default(), 10)
    }

    #[test]
    fn lifecycle() {
        let mut encounter = Encounter::new(7);
        encounter.spawn(unit(1, Team::PLAYER));
        encounter.spawn(unit(2, Team::HOSTILE));
        assert!(encounter.is_contested());

        encounter.combatant_mut(CombatantId(2)).unwrap().kill();
        assert!(!encounter.is_contested());
        assert_eq!(encounter.remove_dead(), vec![CombatantId(2)]);
        assert!(encounter.combatant(CombatantId(2)).is_none());

        assert!(encounter.despawn(CombatantId(1)).is_some());
        assert!(encounter.despawn(CombatantId(1)).is_none());
        assert!(encounter.roster().is_empty());
    }

    #[test]
    fn nonce_advances_per_action() {
        let mut encounter = Encounter::new(0);
        assert_eq!(encounter.next_nonce(), 0);
        assert_eq!(encounter.next_nonce(), 1);
        assert_eq!(encounter.nonce(), 2);
    }
}
