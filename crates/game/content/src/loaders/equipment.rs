//! Equipment catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use combat_core::{ArmorDefinition, EquipmentCatalog, WeaponDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Equipment catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentFile {
    #[serde(default)]
    pub weapons: Vec<WeaponDefinition>,
    #[serde(default)]
    pub armor: Vec<ArmorDefinition>,
}

/// Loader for weapons and armor.
pub struct EquipmentLoader;

impl EquipmentLoader {
    /// Load the equipment catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing an EquipmentFile
    ///
    /// # Returns
    ///
    /// Returns an EquipmentCatalog usable as the equipment oracle.
    pub fn load(path: &Path) -> LoadResult<EquipmentCatalog> {
        let content = read_file(path)?;
        Self::load_str(&content)
    }

    /// Load the equipment shipped with this crate.
    pub fn load_embedded() -> LoadResult<EquipmentCatalog> {
        Self::load_str(include_str!("../../data/equipment.ron"))
    }

    pub fn load_str(content: &str) -> LoadResult<EquipmentCatalog> {
        let file: EquipmentFile = parse_ron(content, "equipment catalog")?;

        // Weapons and armor share one id space.
        let mut seen = BTreeSet::new();
        let ids = file
            .weapons
            .iter()
            .map(|w| w.id)
            .chain(file.armor.iter().map(|a| a.id));
        for id in ids {
            if !seen.insert(id) {
                return Err(anyhow::anyhow!("Duplicate equipment id {}", id.0));
            }
        }

        let mut catalog = EquipmentCatalog::new();
        for weapon in file.weapons {
            if !(weapon.damage.is_finite() && weapon.damage >= 0.0) {
                return Err(anyhow::anyhow!(
                    "Weapon {} has invalid damage {}",
                    weapon.name,
                    weapon.damage
                ));
            }
            catalog.add_weapon(weapon);
        }
        for armor in file.armor {
            catalog.add_armor(armor);
        }
        tracing::debug!(
            "loaded equipment: {} weapons, {} armor pieces",
            catalog.weapons().count(),
            catalog.armor_pieces().count()
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use combat_core::{EquipmentOracle, HandType, ItemId};

    use super::*;

    #[test]
    fn embedded_equipment_loads() {
        let catalog = EquipmentLoader::load_embedded().unwrap();
        let blade = catalog.weapon(ItemId(2)).unwrap();
        assert_eq!(blade.name, "Ember Blade");
        assert_eq!(blade.tags, vec!["fire"]);
        assert_eq!(blade.enchantments.len(), 1);

        let maul = catalog.weapon(ItemId(3)).unwrap();
        assert_eq!(maul.hand, HandType::TwoHanded);
        assert!(catalog.armor(ItemId(101)).is_some());
    }

    #[test]
    fn optional_fields_default() {
        let content = r#"(
            weapons: [(id: 7, name: "Club", damage: 3.0)],
        )"#;
        let catalog = EquipmentLoader::load_str(content).unwrap();
        let club = catalog.weapon(ItemId(7)).unwrap();
        assert_eq!(club.hand, HandType::OneHanded);
        assert!(club.tags.is_empty());
        assert!(club.enchantments.is_empty());
        assert_eq!(catalog.armor_pieces().count(), 0);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let content = r#"(
            weapons: [(id: 1, name: "Sword", damage: 5.0)],
            armor: [(id: 1, name: "Shield", defense: 4)],
        )"#;
        let error = EquipmentLoader::load_str(content).unwrap_err();
        assert!(error.to_string().contains("Duplicate equipment id 1"));
    }

    #[test]
    fn negative_damage_is_rejected() {
        let content = r#"(weapons: [(id: 1, name: "Cursed", damage: -2.0)])"#;
        assert!(EquipmentLoader::load_str(content).is_err());
    }
}
