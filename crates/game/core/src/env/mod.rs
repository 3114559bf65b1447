//! Traits describing read-only collaborator data.
//!
//! Oracles expose the equipment store, permanent progression bonuses and the
//! deterministic RNG. The [`CombatEnv`] aggregate bundles them so the damage
//! pipeline and orchestrator can reach everything they need without hard
//! coupling to concrete implementations.
mod error;
mod items;
mod progression;
mod rng;

pub use error::OracleError;
pub use items::{
    ArmorDefinition, EquipmentCatalog, EquipmentOracle, HandType, ItemId, WeaponDefinition,
};
pub use progression::{NoProgression, ProgressionOracle, TitleTable};
pub use rng::{PcgRng, RngOracle, RollContext, compute_seed};

use crate::state::Combatant;

static DEFAULT_RNG: PcgRng = PcgRng;
static DEFAULT_PROGRESSION: NoProgression = NoProgression;

/// Aggregates read-only oracles required by the combat pipeline.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    equipment: Option<&'a dyn EquipmentOracle>,
    progression: &'a dyn ProgressionOracle,
    rng: &'a dyn RngOracle,
}

impl<'a> CombatEnv<'a> {
    pub fn new(
        equipment: Option<&'a dyn EquipmentOracle>,
        progression: &'a dyn ProgressionOracle,
        rng: &'a dyn RngOracle,
    ) -> Self {
        Self {
            equipment,
            progression,
            rng,
        }
    }

    /// Environment with no equipment store, no titles and the PCG generator.
    pub fn empty() -> CombatEnv<'static> {
        CombatEnv {
            equipment: None,
            progression: &DEFAULT_PROGRESSION,
            rng: &DEFAULT_RNG,
        }
    }

    pub fn with_equipment(mut self, equipment: &'a dyn EquipmentOracle) -> Self {
        self.equipment = Some(equipment);
        self
    }

    pub fn with_progression(mut self, progression: &'a dyn ProgressionOracle) -> Self {
        self.progression = progression;
        self
    }

    pub fn with_rng(mut self, rng: &'a dyn RngOracle) -> Self {
        self.rng = rng;
        self
    }

    /// Returns the EquipmentOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::EquipmentNotAvailable` if no store was provided.
    pub fn equipment(&self) -> Result<&'a dyn EquipmentOracle, OracleError> {
        self.equipment.ok_or(OracleError::EquipmentNotAvailable)
    }

    pub fn progression(&self) -> &'a dyn ProgressionOracle {
        self.progression
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    /// Looks up the weapon a combatant has equipped.
    ///
    /// `Ok(None)` means nothing is equipped.
    ///
    /// # Errors
    ///
    /// Returns an error when a weapon is referenced but cannot be resolved.
    pub fn weapon_of(
        &self,
        combatant: &Combatant,
    ) -> Result<Option<&'a WeaponDefinition>, OracleError> {
        let Some(id) = combatant.loadout.weapon else {
            return Ok(None);
        };
        self.equipment()?
            .weapon(id)
            .map(Some)
            .ok_or(OracleError::WeaponNotFound(id))
    }

    /// Sums the defense of every armor piece a combatant wears.
    ///
    /// # Errors
    ///
    /// Returns the first lookup failure; callers usually log it and fall
    /// back to zero armor.
    pub fn armor_defense(&self, combatant: &Combatant) -> Result<i32, OracleError> {
        if combatant.loadout.armor.is_empty() {
            return Ok(0);
        }
        let store = self.equipment()?;
        combatant.loadout.armor.iter().try_fold(0i32, |total, &id| {
            store
                .armor(id)
                .map(|armor| total.saturating_add(armor.defense))
                .ok_or(OracleError::ArmorNotFound(id))
        })
    }
}

impl core::fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CombatEnv")
            .field("equipment", &self.equipment.is_some())
            .finish_non_exhaustive()
    }
}
