//! Records emitted by combat resolution for rendering, audio and telemetry.

use crate::state::{CombatantId, Position, Tick};
use crate::status::{ApplyOutcome, StatusKind};
use crate::tags::TriggerCondition;

use super::DamageType;

/// One hit of one action against one defender.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageEvent {
    pub attacker: CombatantId,
    pub defender: CombatantId,
    /// Base damage after falloff, before the multiplier chain.
    pub base_damage: f32,
    pub final_damage: u32,
    pub is_crit: bool,
    pub damage_types: Vec<DamageType>,
    pub timestamp: Tick,
}

/// Why a status left a combatant's active set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RemovalReason {
    Expired,
    Cured,
    Cleansed,
    /// Evicted by a conflicting status applied later.
    Conflict,
}

/// Everything observable that combat resolution and status ticking produce.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    /// A direct hit.
    Damage(DamageEvent),

    /// Damage dealt by a damage-over-time status.
    StatusTick {
        target: CombatantId,
        kind: StatusKind,
        source: Option<CombatantId>,
        damage_type: DamageType,
        amount: u32,
        clock: Tick,
    },

    Heal {
        target: CombatantId,
        source: Option<CombatantId>,
        amount: u32,
        clock: Tick,
    },

    StatusApplied {
        target: CombatantId,
        kind: StatusKind,
        source: Option<CombatantId>,
        outcome: ApplyOutcome,
        stacks: u32,
        clock: Tick,
    },

    StatusRemoved {
        target: CombatantId,
        kind: StatusKind,
        reason: RemovalReason,
        clock: Tick,
    },

    Death {
        target: CombatantId,
        killer: Option<CombatantId>,
        clock: Tick,
    },

    Knockback {
        target: CombatantId,
        from: Position,
        to: Position,
        clock: Tick,
    },

    TriggerFired {
        attacker: CombatantId,
        target: CombatantId,
        condition: TriggerCondition,
        effect: String,
        clock: Tick,
    },
}

impl CombatEvent {
    pub fn clock(&self) -> Tick {
        match self {
            CombatEvent::Damage(event) => event.timestamp,
            CombatEvent::StatusTick { clock, .. }
            | CombatEvent::Heal { clock, .. }
            | CombatEvent::StatusApplied { clock, .. }
            | CombatEvent::StatusRemoved { clock, .. }
            | CombatEvent::Death { clock, .. }
            | CombatEvent::Knockback { clock, .. }
            | CombatEvent::TriggerFired { clock, .. } => *clock,
        }
    }

    pub fn as_damage(&self) -> Option<&DamageEvent> {
        match self {
            CombatEvent::Damage(event) => Some(event),
            _ => None,
        }
    }
}
