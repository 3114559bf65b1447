use bitflags::bitflags;

use super::{StatusEffects, StatusKind};

bitflags! {
    /// Crowd-control state derived from the active status set.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ControlFlags: u8 {
        const STUNNED = 1 << 0;
        const ROOTED  = 1 << 1;
        const FROZEN  = 1 << 2;
    }
}

/// Cached multipliers recomputed whenever a combatant's status set changes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedMultipliers {
    pub move_speed: f32,
    pub attack_speed: f32,
    pub damage_taken: f32,
    pub damage_dealt: f32,
    pub control: ControlFlags,
}

impl DerivedMultipliers {
    pub const NEUTRAL: Self = Self {
        move_speed: 1.0,
        attack_speed: 1.0,
        damage_taken: 1.0,
        damage_dealt: 1.0,
        control: ControlFlags::empty(),
    };

    pub fn from_statuses(statuses: &StatusEffects) -> Self {
        let mut derived = Self::NEUTRAL;
        for effect in statuses.iter() {
            let m = effect.magnitude;
            match effect.kind {
                StatusKind::Slow => {
                    derived.move_speed *= 1.0 - m;
                    derived.attack_speed *= 1.0 - m;
                }
                StatusKind::Haste => {
                    derived.move_speed *= 1.0 + m;
                    derived.attack_speed *= 1.0 + m;
                }
                StatusKind::Weaken => derived.damage_dealt *= 1.0 - m,
                StatusKind::Empower => derived.damage_dealt *= 1.0 + m,
                StatusKind::Vulnerable => derived.damage_taken *= 1.0 + m,
                StatusKind::Fortify => derived.damage_taken *= 1.0 - m,
                StatusKind::Stun => derived.control |= ControlFlags::STUNNED,
                StatusKind::Root => derived.control |= ControlFlags::ROOTED,
                StatusKind::Freeze => derived.control |= ControlFlags::all(),
                StatusKind::Burn
                | StatusKind::Bleed
                | StatusKind::Poison
                | StatusKind::Regeneration => {}
            }
        }

        if derived.control.contains(ControlFlags::STUNNED) {
            derived.attack_speed = 0.0;
        }
        if derived.control.contains(ControlFlags::ROOTED) {
            derived.move_speed = 0.0;
        }
        derived.move_speed = derived.move_speed.max(0.0);
        derived.attack_speed = derived.attack_speed.max(0.0);
        derived.damage_taken = derived.damage_taken.max(0.0);
        derived.damage_dealt = derived.damage_dealt.max(0.0);
        derived
    }

    pub fn is_stunned(&self) -> bool {
        self.control.contains(ControlFlags::STUNNED)
    }

    pub fn is_rooted(&self) -> bool {
        self.control.contains(ControlFlags::ROOTED)
    }

    pub fn is_frozen(&self) -> bool {
        self.control.contains(ControlFlags::FROZEN)
    }
}

impl Default for DerivedMultipliers {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{StackingPolicy, StatusEffectInstance};
    use crate::tags::StatusParams;

    fn with(kinds: &[(StatusKind, f32)]) -> DerivedMultipliers {
        let mut set = StatusEffects::empty();
        for &(kind, magnitude) in kinds {
            set.insert(StatusEffectInstance::new(
                kind,
                &StatusParams::new(5.0, 1.0, magnitude, StackingPolicy::Multiplicative),
                None,
            ));
        }
        DerivedMultipliers::from_statuses(&set)
    }

    #[test]
    fn empty_set_is_neutral() {
        assert_eq!(with(&[]), DerivedMultipliers::NEUTRAL);
    }

    #[test]
    fn modifiers_scale_multipliers() {
        let derived = with(&[(StatusKind::Slow, 0.3), (StatusKind::Vulnerable, 0.25)]);
        assert!((derived.move_speed - 0.7).abs() < 1e-6);
        assert!((derived.attack_speed - 0.7).abs() < 1e-6);
        assert!((derived.damage_taken - 1.25).abs() < 1e-6);
        assert_eq!(derived.damage_dealt, 1.0);
    }

    #[test]
    fn freeze_sets_every_control_flag() {
        let derived = with(&[(StatusKind::Freeze, 1.0)]);
        assert!(derived.is_stunned() && derived.is_rooted() && derived.is_frozen());
        assert_eq!(derived.move_speed, 0.0);
        assert_eq!(derived.attack_speed, 0.0);
    }

    #[test]
    fn root_only_blocks_movement() {
        let derived = with(&[(StatusKind::Root, 1.0)]);
        assert!(derived.is_rooted());
        assert!(!derived.is_stunned());
        assert_eq!(derived.move_speed, 0.0);
        assert_eq!(derived.attack_speed, 1.0);
    }
}
