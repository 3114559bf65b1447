//! Status effect engine.
//!
//! Owns the per-combatant set of timed effects (damage over time, crowd
//! control, buffs and debuffs), resolves stacking per kind, enforces
//! conflicts at apply time and advances effect clocks once per fixed step.
mod derived;
mod effects;
mod engine;
mod instance;
mod kind;

pub use derived::{ControlFlags, DerivedMultipliers};
pub use effects::StatusEffects;
pub use engine::{ApplyOutcome, ApplyReport, StatusEngine};
pub use instance::{EffectView, StatusEffectInstance};
pub use kind::{StackingPolicy, StatusClass, StatusKind, TickEffect};
