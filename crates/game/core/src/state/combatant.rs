//! Combatant state owned by the combat subsystem for the duration of an encounter.

use crate::env::ItemId;
use crate::status::{DerivedMultipliers, StatusEffects, StatusKind};
use crate::tags::TagId;

use super::{CombatantId, Position, Team};

/// The six base attributes of a combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Attributes {
    pub strength: i32,
    pub defense: i32,
    pub vitality: i32,
    pub luck: i32,
    pub agility: i32,
    pub intelligence: i32,
}

impl Attributes {
    pub const fn new(
        strength: i32,
        defense: i32,
        vitality: i32,
        luck: i32,
        agility: i32,
        intelligence: i32,
    ) -> Self {
        Self {
            strength,
            defense,
            vitality,
            luck,
            agility,
            intelligence,
        }
    }
}

/// Integer resource meter (health, mana).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    /// Current value as a fraction of the maximum (0.0 for an empty meter).
    pub fn fraction(&self) -> f32 {
        if self.maximum == 0 {
            0.0
        } else {
            self.current as f32 / self.maximum as f32
        }
    }
}

/// References into the external equipment store.
///
/// The combat core never owns item data; it only looks definitions up
/// through [`crate::env::EquipmentOracle`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Loadout {
    pub weapon: Option<ItemId>,
    pub off_hand: Option<ItemId>,
    pub armor: Vec<ItemId>,
}

/// A participant in combat.
///
/// The active status set is private: it is mutated only by
/// [`crate::status::StatusEngine`], which keeps the cached
/// [`DerivedMultipliers`] in sync after every change.
#[derive(Clone, Debug)]
pub struct Combatant {
    pub id: CombatantId,
    pub team: Team,
    pub position: Position,
    pub attributes: Attributes,
    pub health: ResourceMeter,
    pub mana: ResourceMeter,
    /// Class tags used for the class-affinity damage bonus.
    pub class_tags: Vec<TagId>,
    pub loadout: Loadout,
    statuses: StatusEffects,
    derived: DerivedMultipliers,
    alive: bool,
}

impl Combatant {
    pub fn new(
        id: CombatantId,
        team: Team,
        position: Position,
        attributes: Attributes,
        max_health: u32,
    ) -> Self {
        Self {
            id,
            team,
            position,
            attributes,
            health: ResourceMeter::full(max_health),
            mana: ResourceMeter::default(),
            class_tags: Vec::new(),
            loadout: Loadout::default(),
            statuses: StatusEffects::empty(),
            derived: DerivedMultipliers::NEUTRAL,
            alive: max_health > 0,
        }
    }

    pub fn with_mana(mut self, max_mana: u32) -> Self {
        self.mana = ResourceMeter::full(max_mana);
        self
    }

    pub fn with_class_tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.class_tags = tags.into_iter().collect();
        self
    }

    pub fn with_loadout(mut self, loadout: Loadout) -> Self {
        self.loadout = loadout;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Subtracts damage from health and returns the amount actually removed.
    ///
    /// Reaching zero health marks the combatant dead and clears its statuses.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        if !self.alive {
            return 0;
        }
        let applied = amount.min(self.health.current);
        self.health.current -= applied;
        if self.health.current == 0 {
            self.kill();
        }
        applied
    }

    /// Restores health up to the maximum and returns the amount restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.alive {
            return 0;
        }
        let missing = self.health.maximum - self.health.current;
        let restored = amount.min(missing);
        self.health.current += restored;
        restored
    }

    /// Marks the combatant dead, dropping every active status immediately.
    pub fn kill(&mut self) {
        self.alive = false;
        self.health.current = 0;
        self.statuses.clear();
        self.refresh_derived();
    }

    pub fn statuses(&self) -> &StatusEffects {
        &self.statuses
    }

    pub(crate) fn statuses_mut(&mut self) -> &mut StatusEffects {
        &mut self.statuses
    }

    pub fn derived(&self) -> &DerivedMultipliers {
        &self.derived
    }

    /// Recomputes cached multipliers from the active status set.
    pub fn refresh_derived(&mut self) {
        self.derived = DerivedMultipliers::from_statuses(&self.statuses);
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.statuses.contains(kind)
    }

    // ========================================================================
    // Status queries (AI, input gating, damage pipeline)
    // ========================================================================

    pub fn is_stunned(&self) -> bool {
        self.derived.is_stunned()
    }

    pub fn is_rooted(&self) -> bool {
        self.derived.is_rooted()
    }

    pub fn is_frozen(&self) -> bool {
        self.derived.is_frozen()
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.derived.move_speed
    }

    pub fn attack_speed_multiplier(&self) -> f32 {
        self.derived.attack_speed
    }

    pub fn damage_taken_multiplier(&self) -> f32 {
        self.derived.damage_taken
    }

    pub fn damage_dealt_multiplier(&self) -> f32 {
        self.derived.damage_dealt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy() -> Combatant {
        Combatant::new(
            CombatantId(1),
            Team::HOSTILE,
            Position::ORIGIN,
            Attributes::default(),
            50,
        )
    }

    #[test]
    fn damage_clamps_to_zero_and_kills() {
        let mut c = dummy();
        assert_eq!(c.take_damage(20), 20);
        assert_eq!(c.health.current, 30);
        assert_eq!(c.take_damage(100), 30);
        assert!(!c.is_alive());
        assert_eq!(c.take_damage(5), 0);
    }

    #[test]
    fn heal_is_capped_and_ignored_when_dead() {
        let mut c = dummy();
        c.take_damage(10);
        assert_eq!(c.heal(25), 10);
        assert_eq!(c.health.current, 50);
        c.kill();
        assert_eq!(c.heal(10), 0);
    }

    #[test]
    fn new_combatant_has_neutral_multipliers() {
        let c = dummy();
        assert!(!c.is_stunned());
        assert_eq!(c.speed_multiplier(), 1.0);
        assert_eq!(c.damage_taken_multiplier(), 1.0);
    }
}
