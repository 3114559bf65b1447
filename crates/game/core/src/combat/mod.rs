//! Damage pipeline and combat records.
//!
//! Pure functions that turn an attacker, a defender, a base damage and a
//! resolved spec into final integer damage. Every random element goes
//! through the deterministic RNG oracle.
//!
//! # Core Functions
//!
//! - `compute_damage`: the ordered multiplier chain ending in defense
//! - `crit_chance` / `roll_crit`: luck, precision and pierce crit rolls
//! - `floor_amount`: float to integer damage with noise tolerance

pub mod crit;
pub mod damage;
pub mod events;

pub use crit::{crit_chance, roll_crit};
pub use damage::{
    DamageBreakdown, DamageContext, DamageRoll, DamageType, compute_damage, floor_amount,
};
pub use events::{CombatEvent, DamageEvent, RemovalReason};
