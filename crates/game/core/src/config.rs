use crate::error::{CombatError, ErrorSeverity};

/// Why a combat configuration was rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("`{field}` must be a non-negative number, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("`diminishing_factor` must lie strictly between 0 and 1, got {0}")]
    DiminishingFactor(f32),

    #[error("`crit_multiplier` must be at least 1, got {0}")]
    CritMultiplier(f32),

    #[error("`base_crit_chance` must lie in [0, 1], got {0}")]
    CritChance(f32),

    #[error("`class_affinity_cap` must not exceed {max}, got {value}")]
    AffinityCap { value: f32, max: f32 },
}

impl CombatError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Negative { .. } => "CONFIG_NEGATIVE",
            ConfigError::DiminishingFactor(_) => "CONFIG_DIMINISHING_FACTOR",
            ConfigError::CritMultiplier(_) => "CONFIG_CRIT_MULTIPLIER",
            ConfigError::CritChance(_) => "CONFIG_CRIT_CHANCE",
            ConfigError::AffinityCap { .. } => "CONFIG_AFFINITY_CAP",
        }
    }
}

/// Combat balance constants and tunable parameters.
///
/// Every numeric rule of the damage pipeline and status engine that a
/// designer may want to tweak lives here. Compile-time limits that protect
/// invariants are associated consts and cannot be overridden by data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Damage reduction granted per point of total defense (0.01 = 1%).
    pub defense_per_point: f32,
    /// Damage multiplier gained per point of strength.
    pub strength_per_point: f32,
    /// Multiplier applied to critical hits.
    pub crit_multiplier: f32,
    /// Flat crit chance every attacker has before luck.
    pub base_crit_chance: f32,
    /// Crit chance gained per point of luck.
    pub crit_chance_per_luck: f32,
    /// Extra crit chance when the resolved geometry is `pierce`.
    pub pierce_crit_bonus: f32,
    /// Damage bonus per tag shared between a combatant's class and the skill.
    pub class_affinity_per_tag: f32,
    /// Upper bound of the class affinity bonus.
    pub class_affinity_cap: f32,
    /// Bonus for wielding a two-handed weapon.
    pub two_handed_bonus: f32,
    /// Bonus for wielding a versatile weapon with an empty off-hand.
    pub versatile_bonus: f32,
    /// Per-stack contribution ratio of diminishing statuses.
    pub diminishing_factor: f32,
    /// How many levels of triggered effects may chain off a single action.
    pub trigger_depth: u8,
}

impl CombatConfig {
    // ===== compile-time constants =====
    /// Fixed simulation rate of the host game loop.
    pub const TICK_RATE_HZ: u32 = 60;
    /// Hard ceiling on defense-based damage reduction.
    pub const DEFENSE_REDUCTION_CAP: f32 = 0.75;
    /// Hard ceiling on trigger recursion regardless of `trigger_depth`.
    pub const MAX_TRIGGER_DEPTH: u8 = 1;
    /// Largest class affinity bonus data may configure.
    pub const MAX_CLASS_AFFINITY: f32 = 0.20;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DEFENSE_PER_POINT: f32 = 0.01;
    pub const DEFAULT_STRENGTH_PER_POINT: f32 = 0.05;
    pub const DEFAULT_CRIT_MULTIPLIER: f32 = 2.0;
    pub const DEFAULT_CRIT_CHANCE_PER_LUCK: f32 = 0.01;
    pub const DEFAULT_PIERCE_CRIT_BONUS: f32 = 0.10;
    pub const DEFAULT_CLASS_AFFINITY_PER_TAG: f32 = 0.05;
    pub const DEFAULT_CLASS_AFFINITY_CAP: f32 = 0.20;
    pub const DEFAULT_TWO_HANDED_BONUS: f32 = 0.20;
    pub const DEFAULT_VERSATILE_BONUS: f32 = 0.10;
    pub const DEFAULT_DIMINISHING_FACTOR: f32 = 0.5;

    pub fn new() -> Self {
        Self {
            defense_per_point: Self::DEFAULT_DEFENSE_PER_POINT,
            strength_per_point: Self::DEFAULT_STRENGTH_PER_POINT,
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            base_crit_chance: 0.0,
            crit_chance_per_luck: Self::DEFAULT_CRIT_CHANCE_PER_LUCK,
            pierce_crit_bonus: Self::DEFAULT_PIERCE_CRIT_BONUS,
            class_affinity_per_tag: Self::DEFAULT_CLASS_AFFINITY_PER_TAG,
            class_affinity_cap: Self::DEFAULT_CLASS_AFFINITY_CAP,
            two_handed_bonus: Self::DEFAULT_TWO_HANDED_BONUS,
            versatile_bonus: Self::DEFAULT_VERSATILE_BONUS,
            diminishing_factor: Self::DEFAULT_DIMINISHING_FACTOR,
            trigger_depth: Self::MAX_TRIGGER_DEPTH,
        }
    }

    /// Rejects tunables that break the damage pipeline or let a later
    /// diminishing stack count for more than an earlier one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("defense_per_point", self.defense_per_point),
            ("strength_per_point", self.strength_per_point),
            ("crit_chance_per_luck", self.crit_chance_per_luck),
            ("pierce_crit_bonus", self.pierce_crit_bonus),
            ("class_affinity_per_tag", self.class_affinity_per_tag),
            ("class_affinity_cap", self.class_affinity_cap),
            ("two_handed_bonus", self.two_handed_bonus),
            ("versatile_bonus", self.versatile_bonus),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if !(0.0..=1.0).contains(&self.base_crit_chance) {
            return Err(ConfigError::CritChance(self.base_crit_chance));
        }
        if !(self.crit_multiplier.is_finite() && self.crit_multiplier >= 1.0) {
            return Err(ConfigError::CritMultiplier(self.crit_multiplier));
        }
        if !(self.diminishing_factor > 0.0 && self.diminishing_factor < 1.0) {
            return Err(ConfigError::DiminishingFactor(self.diminishing_factor));
        }
        if self.class_affinity_cap > Self::MAX_CLASS_AFFINITY {
            return Err(ConfigError::AffinityCap {
                value: self.class_affinity_cap,
                max: Self::MAX_CLASS_AFFINITY,
            });
        }
        Ok(())
    }

    /// Length of one fixed simulation step in seconds.
    pub fn step_seconds() -> f32 {
        1.0 / Self::TICK_RATE_HZ as f32
    }

    /// Trigger depth actually honoured, never above [`Self::MAX_TRIGGER_DEPTH`].
    pub fn effective_trigger_depth(&self) -> u8 {
        self.trigger_depth.min(Self::MAX_TRIGGER_DEPTH)
    }

    /// Defense reduction for a total defense value, clamped to the hard cap.
    pub fn defense_reduction(&self, defense: f32) -> f32 {
        (defense.max(0.0) * self.defense_per_point).clamp(0.0, Self::DEFENSE_REDUCTION_CAP)
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
