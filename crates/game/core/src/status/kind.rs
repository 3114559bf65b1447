use crate::combat::DamageType;
use crate::tags::TagId;

/// What happens when a status is applied while one of the same kind is active.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StackingPolicy {
    /// Stacks add up; duration extends to the longer of the two.
    Additive,
    /// Stronger application replaces; weaker is ignored.
    Multiplicative,
    /// Stacks up to a cap with a shrinking per-stack contribution.
    Diminishing,
    /// Reapplication refreshes duration only.
    None,
}

/// Whether a status helps or hinders its bearer. Used by cleanse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum StatusClass {
    Buff,
    Debuff,
}

/// Per-tick effect of a status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickEffect {
    Damage(DamageType),
    Heal,
    /// Pure crowd control or stat modifier.
    Nothing,
}

/// The fixed set of timed status effects.
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
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusKind {
    // Damage over time
    Burn,
    Bleed,
    Poison,

    // Crowd control
    Freeze,
    Slow,
    Stun,
    Root,

    // Debuffs
    Weaken,
    Vulnerable,

    // Buffs
    Empower,
    Haste,
    Fortify,
    Regeneration,
}

impl StatusKind {
    pub const fn tag(self) -> TagId {
        match self {
            StatusKind::Burn => TagId::Burn,
            StatusKind::Bleed => TagId::Bleed,
            StatusKind::Poison => TagId::Poison,
            StatusKind::Freeze => TagId::Freeze,
            StatusKind::Slow => TagId::Slow,
            StatusKind::Stun => TagId::Stun,
            StatusKind::Root => TagId::Root,
            StatusKind::Weaken => TagId::Weaken,
            StatusKind::Vulnerable => TagId::Vulnerable,
            StatusKind::Empower => TagId::Empower,
            StatusKind::Haste => TagId::Haste,
            StatusKind::Fortify => TagId::Fortify,
            StatusKind::Regeneration => TagId::Regeneration,
        }
    }

    pub const fn from_tag(tag: TagId) -> Option<Self> {
        Some(match tag {
            TagId::Burn => StatusKind::Burn,
            TagId::Bleed => StatusKind::Bleed,
            TagId::Poison => StatusKind::Poison,
            TagId::Freeze => StatusKind::Freeze,
            TagId::Slow => StatusKind::Slow,
            TagId::Stun => StatusKind::Stun,
            TagId::Root => StatusKind::Root,
            TagId::Weaken => StatusKind::Weaken,
            TagId::Vulnerable => StatusKind::Vulnerable,
            TagId::Empower => StatusKind::Empower,
            TagId::Haste => StatusKind::Haste,
            TagId::Fortify => StatusKind::Fortify,
            TagId::Regeneration => StatusKind::Regeneration,
            _ => return None,
        })
    }

    pub const fn class(self) -> StatusClass {
        match self {
            StatusKind::Empower
            | StatusKind::Haste
            | StatusKind::Fortify
            | StatusKind::Regeneration => StatusClass::Buff,
            _ => StatusClass::Debuff,
        }
    }

    pub const fn is_buff(self) -> bool {
        matches!(self.class(), StatusClass::Buff)
    }

    pub const fn tick_effect(self) -> TickEffect {
        match self {
            StatusKind::Burn => TickEffect::Damage(DamageType::Fire),
            StatusKind::Bleed => TickEffect::Damage(DamageType::Physical),
            StatusKind::Poison => TickEffect::Damage(DamageType::Poison),
            StatusKind::Regeneration => TickEffect::Heal,
            _ => TickEffect::Nothing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagCategory;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn count_matches_variants() {
        assert_eq!(StatusKind::iter().count(), StatusKind::COUNT);
    }

    #[test]
    fn tag_mapping_round_trips() {
        for kind in StatusKind::iter() {
            assert_eq!(StatusKind::from_tag(kind.tag()), Some(kind));
            let expected = if kind.is_buff() {
                TagCategory::StatusBuff
            } else {
                TagCategory::StatusDebuff
            };
            assert_eq!(kind.tag().category(), expected, "{kind}");
        }
        assert_eq!(StatusKind::from_tag(TagId::Fire), None);
    }

    #[test]
    fn damage_over_time_kinds() {
        assert_eq!(StatusKind::Burn.tick_effect(), TickEffect::Damage(DamageType::Fire));
        assert_eq!(StatusKind::Regeneration.tick_effect(), TickEffect::Heal);
        assert_eq!(StatusKind::Stun.tick_effect(), TickEffect::Nothing);
    }
}
