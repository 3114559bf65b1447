//! Oracle access errors.

use crate::error::{CombatError, ErrorSeverity};

use super::ItemId;

/// Errors that occur when looking up collaborator data.
///
/// The damage pipeline never propagates these: it logs them and continues
/// as if the referenced item were absent.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// No equipment store was supplied with the environment.
    #[error("EquipmentOracle not available")]
    EquipmentNotAvailable,

    /// Weapon referenced by a loadout is missing from the store.
    #[error("weapon {0:?} not found")]
    WeaponNotFound(ItemId),

    /// Armor piece referenced by a loadout is missing from the store.
    #[error("armor {0:?} not found")]
    ArmorNotFound(ItemId),
}

impl CombatError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            EquipmentNotAvailable => ErrorSeverity::Fatal,
            WeaponNotFound(_) | ArmorNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            EquipmentNotAvailable => "ORACLE_EQUIPMENT_NOT_AVAILABLE",
            WeaponNotFound(_) => "ORACLE_WEAPON_NOT_FOUND",
            ArmorNotFound(_) => "ORACLE_ARMOR_NOT_FOUND",
        }
    }
}
