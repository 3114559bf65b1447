//! Tag registry and resolver.
//!
//! Skills, weapons and enchantments describe their behaviour as lists of
//! tag strings. The [`TagRegistry`] maps each canonical [`TagId`] to a typed
//! [`TagDefinition`]; the [`TagResolver`] turns a raw list into a
//! [`ResolvedEffectSpec`] with exactly one geometry, ordered damage types,
//! statuses with final parameters, specials, an optional trigger and a
//! context filter.
mod definition;
mod id;
mod params;
mod registry;
mod resolver;
mod source;
mod standard;

pub use definition::{SynergyRule, TagDefinition, TagEffect};
pub use id::{TagCategory, TagId};
pub use params::{
    ContextFilter, Geometry, ParamError, ParamKey, ParamOverrides, ParamValue, SpecialEffect,
    SplashFalloff, StatusParams, SynergyBonus, TriggerCondition,
};
pub use registry::{RegistryError, TagRegistry, TagRegistryBuilder};
pub use resolver::{ResolvedEffectSpec, ResolvedStatus, TagResolver};
pub use source::{EffectDefinition, SourceOverrides};
pub use standard::{STANDARD_ALIASES, standard_definitions};
