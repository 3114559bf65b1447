//! Typed parameter structs carried by tag definitions.
//!
//! Each tag category owns a parameter type. Overrides and synergy bonuses
//! address individual fields through [`ParamKey`]; a key that a parameter
//! type does not have is rejected rather than silently stored.

use std::collections::BTreeMap;

use crate::status::StackingPolicy;

/// How damage decays from the centre of an area to its edge.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SplashFalloff {
    #[default]
    None,
    Linear,
}

impl SplashFalloff {
    /// Multiplier for a target `distance` away from the centre of an area
    /// whose edge is `edge` away.
    pub fn multiplier(self, distance: f32, edge: f32) -> f32 {
        match self {
            SplashFalloff::None => 1.0,
            SplashFalloff::Linear if edge > 0.0 => (1.0 - distance / edge).max(0.0),
            SplashFalloff::Linear => 0.0,
        }
    }
}

/// Spatial targeting shape of an effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Geometry {
    /// The explicitly targeted combatant only.
    SingleTarget,
    /// First combatant along the path.
    Projectile { range: f32, width: f32 },
    /// Every combatant along the path, nearest first.
    Pierce {
        range: f32,
        width: f32,
        max_targets: u32,
    },
    /// Every combatant inside a straight band from the attacker.
    Beam { range: f32, width: f32 },
    /// `angle` is the full aperture in degrees.
    Cone {
        range: f32,
        angle: f32,
        #[cfg_attr(feature = "serde", serde(default))]
        falloff: SplashFalloff,
    },
    /// Area centred on the impact point.
    Splash {
        radius: f32,
        #[cfg_attr(feature = "serde", serde(default))]
        falloff: SplashFalloff,
    },
    /// Area centred on the impact point.
    Circle {
        radius: f32,
        #[cfg_attr(feature = "serde", serde(default))]
        falloff: SplashFalloff,
    },
    /// Starting target plus up to `chain_count` hops.
    Chain {
        chain_count: u32,
        chain_range: f32,
        chain_falloff: f32,
    },
}

impl Geometry {
    pub(crate) fn slot(&mut self, key: ParamKey) -> Option<ParamSlot<'_>> {
        use Geometry::*;
        use ParamKey as K;
        Some(match (self, key) {
            (Projectile { range, .. }, K::Range)
            | (Pierce { range, .. }, K::Range)
            | (Beam { range, .. }, K::Range)
            | (Cone { range, .. }, K::Range) => ParamSlot::Number(range),
            (Projectile { width, .. }, K::Width)
            | (Pierce { width, .. }, K::Width)
            | (Beam { width, .. }, K::Width) => ParamSlot::Number(width),
            (Pierce { max_targets, .. }, K::MaxTargets) => ParamSlot::Count(max_targets),
            (Cone { angle, .. }, K::Angle) => ParamSlot::Number(angle),
            (Splash { radius, .. }, K::Radius) | (Circle { radius, .. }, K::Radius) => {
                ParamSlot::Number(radius)
            }
            (Cone { falloff, .. }, K::SplashFalloff)
            | (Splash { falloff, .. }, K::SplashFalloff)
            | (Circle { falloff, .. }, K::SplashFalloff) => ParamSlot::Falloff(falloff),
            (Chain { chain_count, .. }, K::ChainCount) => ParamSlot::Count(chain_count),
            (Chain { chain_range, .. }, K::ChainRange) => ParamSlot::Number(chain_range),
            (Chain { chain_falloff, .. }, K::ChainFalloff) => ParamSlot::Number(chain_falloff),
            _ => return None,
        })
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        use Geometry::*;
        match *self {
            SingleTarget => Ok(()),
            Projectile { range, width } | Beam { range, width } => {
                positive(ParamKey::Range, range)?;
                positive(ParamKey::Width, width)
            }
            Pierce {
                range,
                width,
                max_targets,
            } => {
                positive(ParamKey::Range, range)?;
                positive(ParamKey::Width, width)?;
                at_least_one(ParamKey::MaxTargets, max_targets)
            }
            Cone { range, angle, .. } => {
                positive(ParamKey::Range, range)?;
                positive(ParamKey::Angle, angle)?;
                if angle > 360.0 {
                    return Err(ParamError::OutOfRange {
                        key: ParamKey::Angle,
                        value: angle,
                    });
                }
                Ok(())
            }
            Splash { radius, .. } | Circle { radius, .. } => positive(ParamKey::Radius, radius),
            Chain {
                chain_range,
                chain_falloff,
                ..
            } => {
                positive(ParamKey::ChainRange, chain_range)?;
                if !(0.0..1.0).contains(&chain_falloff) {
                    return Err(ParamError::OutOfRange {
                        key: ParamKey::ChainFalloff,
                        value: chain_falloff,
                    });
                }
                Ok(())
            }
        }
    }
}

/// Parameters of a timed status effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusParams {
    /// Seconds the effect lasts.
    pub duration: f32,
    /// Seconds between per-tick effects.
    pub tick_rate: f32,
    /// Damage/heal per tick, or the fractional strength of a modifier.
    pub magnitude: f32,
    /// Probability in `[0, 1]` that a hit applies the effect.
    pub chance: f32,
    pub policy: StackingPolicy,
    /// Stack cap; `None` is uncapped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_stacks: Option<u32>,
    /// Per-stack power multiplier (poison: 1.2).
    #[cfg_attr(feature = "serde", serde(default))]
    pub stack_multiplier: Option<f32>,
}

impl StatusParams {
    pub const fn new(duration: f32, tick_rate: f32, magnitude: f32, policy: StackingPolicy) -> Self {
        Self {
            duration,
            tick_rate,
            magnitude,
            chance: 1.0,
            policy,
            max_stacks: None,
            stack_multiplier: None,
        }
    }

    pub const fn with_max_stacks(mut self, max_stacks: u32) -> Self {
        self.max_stacks = Some(max_stacks);
        self
    }

    pub const fn with_stack_multiplier(mut self, multiplier: f32) -> Self {
        self.stack_multiplier = Some(multiplier);
        self
    }

    pub const fn with_chance(mut self, chance: f32) -> Self {
        self.chance = chance;
        self
    }

    pub(crate) fn slot(&mut self, key: ParamKey) -> Option<ParamSlot<'_>> {
        Some(match key {
            ParamKey::Duration => ParamSlot::Number(&mut self.duration),
            ParamKey::TickRate => ParamSlot::Number(&mut self.tick_rate),
            ParamKey::Magnitude => ParamSlot::Number(&mut self.magnitude),
            ParamKey::Chance => ParamSlot::Number(&mut self.chance),
            ParamKey::MaxStacks => ParamSlot::OptionalCount(&mut self.max_stacks),
            _ => return None,
        })
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        positive(ParamKey::Duration, self.duration)?;
        positive(ParamKey::TickRate, self.tick_rate)?;
        non_negative(ParamKey::Magnitude, self.magnitude)?;
        fraction(ParamKey::Chance, self.chance)?;
        match self.max_stacks {
            Some(max) => at_least_one(ParamKey::MaxStacks, max)?,
            None if self.policy == StackingPolicy::Diminishing => {
                return Err(ParamError::UncappedDiminishing);
            }
            None => {}
        }
        if let Some(multiplier) = self.stack_multiplier {
            if !(multiplier.is_finite() && multiplier > 0.0) {
                return Err(ParamError::InvalidStackMultiplier(multiplier));
            }
        }
        Ok(())
    }
}

/// Special on-hit modifiers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SpecialEffect {
    /// Heals the attacker for a fraction of damage dealt.
    Lifesteal { fraction: f32 },
    /// Pushes the target away from the attacker.
    Knockback { distance: f32 },
    /// Bonus damage against targets below a health fraction.
    Execute { threshold: f32, bonus: f32 },
    /// Bonus damage against targets whose defense exceeds a threshold.
    Crushing { threshold: f32, bonus: f32 },
    /// Ignores part of the defender's defense reduction.
    ArmorBreaker { ignore_fraction: f32 },
    /// Adds crit chance; never adds damage directly.
    Precision { crit_bonus: f32 },
}

impl SpecialEffect {
    pub(crate) fn slot(&mut self, key: ParamKey) -> Option<ParamSlot<'_>> {
        use ParamKey as K;
        use SpecialEffect::*;
        Some(match (self, key) {
            (Lifesteal { fraction }, K::Fraction) => ParamSlot::Number(fraction),
            (Knockback { distance }, K::Distance) => ParamSlot::Number(distance),
            (Execute { threshold, .. }, K::Threshold)
            | (Crushing { threshold, .. }, K::Threshold) => ParamSlot::Number(threshold),
            (Execute { bonus, .. }, K::Bonus) | (Crushing { bonus, .. }, K::Bonus) => {
                ParamSlot::Number(bonus)
            }
            (ArmorBreaker { ignore_fraction }, K::IgnoreFraction) => {
                ParamSlot::Number(ignore_fraction)
            }
            (Precision { crit_bonus }, K::CritBonus) => ParamSlot::Number(crit_bonus),
            _ => return None,
        })
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        use SpecialEffect::*;
        match *self {
            Lifesteal { fraction: f } => fraction(ParamKey::Fraction, f),
            Knockback { distance } => non_negative(ParamKey::Distance, distance),
            Execute { threshold, bonus } => {
                fraction(ParamKey::Threshold, threshold)?;
                non_negative(ParamKey::Bonus, bonus)
            }
            Crushing { threshold, bonus } => {
                non_negative(ParamKey::Threshold, threshold)?;
                non_negative(ParamKey::Bonus, bonus)
            }
            ArmorBreaker { ignore_fraction } => fraction(ParamKey::IgnoreFraction, ignore_fraction),
            Precision { crit_bonus } => fraction(ParamKey::CritBonus, crit_bonus),
        }
    }
}

/// Hit outcome that fires a triggered effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TriggerCondition {
    OnHit,
    OnCrit,
    OnKill,
}

/// Which combatants an effect may touch, relative to the attacker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ContextFilter {
    /// The attacker only.
    #[strum(serialize = "self")]
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    SelfOnly,
    Ally,
    #[default]
    Enemy,
    All,
}

// ============================================================================
// Overrides
// ============================================================================

/// Addressable parameter of a tag.
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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ParamKey {
    Duration,
    TickRate,
    Magnitude,
    Chance,
    MaxStacks,
    ChainCount,
    ChainRange,
    ChainFalloff,
    SplashFalloff,
    Range,
    Radius,
    Angle,
    Width,
    MaxTargets,
    Fraction,
    Distance,
    Threshold,
    Bonus,
    CritBonus,
    IgnoreFraction,
}

/// Override value. `Flag(true)` selects linear falloff for `splash_falloff`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamValue {
    Number(f32),
    Flag(bool),
}

/// Per-tag parameter overrides supplied by a skill, weapon or enchantment.
pub type ParamOverrides = BTreeMap<ParamKey, ParamValue>;

/// Bonus a synergy adds to one parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SynergyBonus {
    /// Relative increase: `0.2` is +20%.
    Percent(f32),
    /// Absolute increase in the parameter's own unit.
    Flat(f32),
}

impl SynergyBonus {
    fn apply(self, value: f32) -> f32 {
        match self {
            SynergyBonus::Percent(p) => value * (1.0 + p),
            SynergyBonus::Flat(f) => value + f,
        }
    }
}

/// Why a parameter value or override was rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("parameter `{0}` does not apply to this tag")]
    NotApplicable(ParamKey),

    #[error("parameter `{key}` out of range: {value}")]
    OutOfRange { key: ParamKey, value: f32 },

    #[error("parameter `{0}` expects a number")]
    ExpectedNumber(ParamKey),

    #[error("parameter `{0}` expects a flag")]
    ExpectedFlag(ParamKey),

    #[error("stack multiplier must be positive, got {0}")]
    InvalidStackMultiplier(f32),

    #[error("diminishing statuses need a stack cap")]
    UncappedDiminishing,
}

/// Mutable view of a single parameter field.
pub(crate) enum ParamSlot<'a> {
    Number(&'a mut f32),
    Count(&'a mut u32),
    OptionalCount(&'a mut Option<u32>),
    Falloff(&'a mut SplashFalloff),
}

impl ParamSlot<'_> {
    pub(crate) fn set(self, key: ParamKey, value: ParamValue) -> Result<(), ParamError> {
        match (self, value) {
            (ParamSlot::Number(field), ParamValue::Number(v)) => {
                *field = v;
                Ok(())
            }
            (ParamSlot::Count(field), ParamValue::Number(v)) => {
                *field = to_count(key, v)?;
                Ok(())
            }
            (ParamSlot::OptionalCount(field), ParamValue::Number(v)) => {
                *field = Some(to_count(key, v)?);
                Ok(())
            }
            (ParamSlot::Falloff(field), ParamValue::Flag(linear)) => {
                *field = if linear {
                    SplashFalloff::Linear
                } else {
                    SplashFalloff::None
                };
                Ok(())
            }
            (ParamSlot::Falloff(_), ParamValue::Number(_)) => Err(ParamError::ExpectedFlag(key)),
            (_, ParamValue::Flag(_)) => Err(ParamError::ExpectedNumber(key)),
        }
    }

    pub(crate) fn add(self, key: ParamKey, bonus: SynergyBonus) -> Result<(), ParamError> {
        match self {
            ParamSlot::Number(field) => {
                *field = bonus.apply(*field);
                Ok(())
            }
            ParamSlot::Count(field) => {
                *field = to_count(key, bonus.apply(*field as f32).round())?;
                Ok(())
            }
            ParamSlot::OptionalCount(field) => {
                // Uncapped stays uncapped.
                if let Some(count) = field {
                    *count = to_count(key, bonus.apply(*count as f32).round())?;
                }
                Ok(())
            }
            ParamSlot::Falloff(_) => Err(ParamError::ExpectedFlag(key)),
        }
    }
}

fn to_count(key: ParamKey, value: f32) -> Result<u32, ParamError> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f32 {
        Ok(value as u32)
    } else {
        Err(ParamError::OutOfRange { key, value })
    }
}

fn positive(key: ParamKey, value: f32) -> Result<(), ParamError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParamError::OutOfRange { key, value })
    }
}

fn non_negative(key: ParamKey, value: f32) -> Result<(), ParamError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ParamError::OutOfRange { key, value })
    }
}

fn fraction(key: ParamKey, value: f32) -> Result<(), ParamError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ParamError::OutOfRange { key, value })
    }
}

fn at_least_one(key: ParamKey, value: u32) -> Result<(), ParamError> {
    if value >= 1 {
        Ok(())
    } else {
        Err(ParamError::OutOfRange {
            key,
            value: value as f32,
        })
    }
}
