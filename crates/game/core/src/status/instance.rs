use crate::combat::floor_amount;
use crate::state::CombatantId;
use crate::tags::StatusParams;

use super::{StackingPolicy, StatusClass, StatusKind};

const EXPIRY_EPSILON: f32 = 1e-4;

/// An active timed effect on one combatant.
///
/// `magnitude` is the effective value after stacking; `base_magnitude` is
/// the per-application value stacking is computed from.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectInstance {
    pub kind: StatusKind,
    pub policy: StackingPolicy,
    pub base_magnitude: f32,
    pub magnitude: f32,
    /// Seconds until expiry.
    pub remaining: f32,
    /// Duration of the application that created the instance.
    pub duration: f32,
    pub tick_rate: f32,
    /// Seconds accumulated toward the next per-tick effect.
    pub accumulator: f32,
    /// Fractional damage or healing not yet dealt by earlier ticks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub carry: f32,
    pub stacks: u32,
    pub max_stacks: Option<u32>,
    pub stack_multiplier: Option<f32>,
    /// Damage attribution only. The source may be long gone.
    pub source: Option<CombatantId>,
}

impl StatusEffectInstance {
    pub fn new(kind: StatusKind, params: &StatusParams, source: Option<CombatantId>) -> Self {
        Self {
            kind,
            policy: params.policy,
            base_magnitude: params.magnitude,
            magnitude: params.magnitude,
            remaining: params.duration,
            duration: params.duration,
            tick_rate: params.tick_rate,
            accumulator: 0.0,
            carry: 0.0,
            stacks: 1,
            max_stacks: params.max_stacks,
            stack_multiplier: params.stack_multiplier,
            source,
        }
    }

    /// Expired once remaining time is within float slack of zero.
    pub fn is_expired(&self) -> bool {
        self.remaining <= EXPIRY_EPSILON
    }

    /// Whole amount for the next tick. The remainder is kept for later
    /// ticks, so the total over time follows the unrounded magnitude.
    pub fn take_tick_amount(&mut self, scale: f32) -> u32 {
        let total = self.carry + self.magnitude * scale;
        let amount = floor_amount(total);
        self.carry = (total - amount as f32).max(0.0);
        amount
    }

    pub fn at_stack_cap(&self) -> bool {
        self.max_stacks.is_some_and(|cap| self.stacks >= cap)
    }

    pub fn view(&self) -> EffectView {
        EffectView {
            kind: self.kind,
            class: self.kind.class(),
            magnitude: self.magnitude,
            remaining: self.remaining,
            stacks: self.stacks,
            source: self.source,
        }
    }
}

/// Read-only snapshot of an active status, handed to AI and UI consumers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectView {
    pub kind: StatusKind,
    pub class: StatusClass,
    pub magnitude: f32,
    pub remaining: f32,
    pub stacks: u32,
    pub source: Option<CombatantId>,
}
