//! Equipment definitions consumed read-only from the external equipment store.

use std::collections::BTreeMap;

use crate::tags::EffectDefinition;

/// Handle into the external equipment store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

/// Grip configuration of a weapon.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HandType {
    #[default]
    OneHanded,
    /// Always wielded with both hands.
    TwoHanded,
    /// One-handed weapon that can be gripped with both hands when the
    /// off-hand is empty.
    Versatile,
}

/// Weapon definition.
///
/// `tags` are appended after a skill's own tags when an attack is resolved,
/// and each enchantment is a triggered effect evaluated on hit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponDefinition {
    pub id: ItemId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hand: HandType,
    pub damage: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub enchantments: Vec<EffectDefinition>,
}

/// Armor definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmorDefinition {
    pub id: ItemId,
    pub name: String,
    pub defense: i32,
}

/// Read-only lookup into the equipment store.
pub trait EquipmentOracle: Send + Sync {
    fn weapon(&self, id: ItemId) -> Option<&WeaponDefinition>;
    fn armor(&self, id: ItemId) -> Option<&ArmorDefinition>;
}

/// In-memory equipment store, typically filled by the content loaders.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EquipmentCatalog {
    weapons: BTreeMap<ItemId, WeaponDefinition>,
    armor: BTreeMap<ItemId, ArmorDefinition>,
}

impl EquipmentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_weapon(&mut self, weapon: WeaponDefinition) {
        self.weapons.insert(weapon.id, weapon);
    }

    pub fn add_armor(&mut self, armor: ArmorDefinition) {
        self.armor.insert(armor.id, armor);
    }

    pub fn with_weapon(mut self, weapon: WeaponDefinition) -> Self {
        self.add_weapon(weapon);
        self
    }

    pub fn with_armor(mut self, armor: ArmorDefinition) -> Self {
        self.add_armor(armor);
        self
    }

    pub fn weapons(&self) -> impl Iterator<Item = &WeaponDefinition> {
        self.weapons.values()
    }

    pub fn armor_pieces(&self) -> impl Iterator<Item = &ArmorDefinition> {
        self.armor.values()
    }
}

impl EquipmentOracle for EquipmentCatalog {
    fn weapon(&self, id: ItemId) -> Option<&WeaponDefinition> {
        self.weapons.get(&id)
    }

    fn armor(&self, id: ItemId) -> Option<&ArmorDefinition> {
        self.armor.get(&id)
    }
}
