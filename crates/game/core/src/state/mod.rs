//! Mutable encounter state: combatants and their roster.
//!
//! Identity and geometry primitives live in [`common`]; the combatant model
//! (attributes, resources, equipment references, status set) in
//! [`combatant`].
mod combatant;
mod common;
mod roster;

pub use combatant::{Attributes, Combatant, Loadout, ResourceMeter};
pub use common::{CombatantId, Position, Team, Tick};
pub use roster::Roster;
