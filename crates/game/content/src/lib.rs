//! Data-driven combat content and loaders.
//!
//! This crate houses the static data the combat core consumes and provides
//! loaders for RON/TOML data files:
//! - Tag catalog (data-driven via RON, validated into a `TagRegistry`)
//! - Skill book (data-driven via RON)
//! - Equipment catalog (data-driven via RON)
//! - Combat balance configuration (data-driven via TOML)
//! - Scripted encounter scenarios (data-driven via RON)
//!
//! Content is read once at startup and shared read-only afterwards.
//!
//! All loaders use combat-core types directly with serde for RON/TOML deserialization.

pub mod scenario;
pub mod skills;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use scenario::{Scenario, ScriptedAction, SpawnSpec};
pub use skills::{SkillBook, SkillDefinition};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, EquipmentLoader, ScenarioLoader, SkillLoader, TagLoader,
};
