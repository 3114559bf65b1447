//! Deterministic combat resolution shared by every host.
//!
//! `combat-core` turns a tagged action into damage, status effects and
//! events. Tags are validated once into a [`TagRegistry`], resolved per
//! action into a [`ResolvedEffectSpec`], mapped to targets by geometry and
//! fed through the damage pipeline. All cross-combatant mutation flows
//! through [`engine::CombatEngine`], and supporting crates depend on the
//! types re-exported here.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;
pub mod status;
pub mod tags;
pub mod targeting;

pub use combat::{
    CombatEvent, DamageBreakdown, DamageContext, DamageEvent, DamageRoll, DamageType,
    RemovalReason, compute_damage,
};
pub use config::{CombatConfig, ConfigError};
pub use engine::{
    ActionError, ActionRequest, CombatEngine, Encounter, HitOutcome, TriggerGraph,
    TriggeredEffect,
};
pub use env::{
    ArmorDefinition, CombatEnv, EquipmentCatalog, EquipmentOracle, HandType, ItemId,
    NoProgression, OracleError, PcgRng, ProgressionOracle, RngOracle, RollContext, TitleTable,
    WeaponDefinition,
};
pub use error::{CombatError, ErrorSeverity};
pub use state::{
    Attributes, Combatant, CombatantId, Loadout, Position, ResourceMeter, Roster, Team, Tick,
};
pub use status::{
    ApplyOutcome, ApplyReport, ControlFlags, DerivedMultipliers, EffectView, StackingPolicy,
    StatusClass, StatusEffectInstance, StatusEffects, StatusEngine, StatusKind,
};
pub use tags::{
    ContextFilter, EffectDefinition, Geometry, ParamKey, ParamValue, RegistryError,
    ResolvedEffectSpec, SourceOverrides, SpecialEffect, SplashFalloff, StatusParams, TagCategory,
    TagDefinition, TagEffect, TagId, TagRegistry, TagResolver, TriggerCondition,
};
pub use targeting::{ActionTarget, TargetHit, select_targets};
