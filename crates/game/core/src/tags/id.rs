//! Canonical tag identifiers and their fixed categories.

use core::str::FromStr;

/// Category of a tag. Fixed per [`TagId`]; definitions must agree with it.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TagCategory {
    Geometry,
    DamageType,
    StatusDebuff,
    StatusBuff,
    Special,
    Trigger,
    Context,
}

/// Every tag the combat core understands.
///
/// Raw tag strings from skills, weapons and enchantments are parsed into
/// this enum (after alias expansion); anything that does not parse is an
/// unknown tag and is ignored by the resolver.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TagId {
    // ========================================================================
    // Geometry
    // ========================================================================
    SingleTarget,
    Projectile,
    Pierce,
    Beam,
    Cone,
    Splash,
    Circle,
    Chain,

    // ========================================================================
    // Damage types
    // ========================================================================
    Physical,
    Fire,
    Frost,
    Lightning,
    Arcane,
    Shadow,
    Holy,

    // ========================================================================
    // Status debuffs
    // ========================================================================
    Burn,
    Bleed,
    Poison,
    Freeze,
    Slow,
    Stun,
    Root,
    Weaken,
    Vulnerable,

    // ========================================================================
    // Status buffs
    // ========================================================================
    Empower,
    Haste,
    Fortify,
    Regeneration,

    // ========================================================================
    // Special
    // ========================================================================
    Lifesteal,
    Knockback,
    Execute,
    Crushing,
    ArmorBreaker,
    Precision,

    // ========================================================================
    // Triggers
    // ========================================================================
    OnHit,
    OnCrit,
    OnKill,

    // ========================================================================
    // Context
    // ========================================================================
    #[strum(serialize = "self")]
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    SelfOnly,
    Ally,
    Enemy,
    All,
}

impl TagId {
    /// The category this tag belongs to.
    pub const fn category(self) -> TagCategory {
        use TagId::*;
        match self {
            SingleTarget | Projectile | Pierce | Beam | Cone | Splash | Circle | Chain => {
                TagCategory::Geometry
            }
            Physical | Fire | Frost | Lightning | Arcane | Shadow | Holy => TagCategory::DamageType,
            Burn | Bleed | Poison | Freeze | Slow | Stun | Root | Weaken | Vulnerable => {
                TagCategory::StatusDebuff
            }
            Empower | Haste | Fortify | Regeneration => TagCategory::StatusBuff,
            Lifesteal | Knockback | Execute | Crushing | ArmorBreaker | Precision => {
                TagCategory::Special
            }
            OnHit | OnCrit | OnKill => TagCategory::Trigger,
            SelfOnly | Ally | Enemy | All => TagCategory::Context,
        }
    }

    /// Parses a canonical tag name (no alias expansion).
    pub fn parse(raw: &str) -> Option<TagId> {
        TagId::from_str(raw.trim()).ok()
    }
}
