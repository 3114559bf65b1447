//! Per-combatant active status set.
//!
//! Capacity equals the number of status kinds and the set holds at most one
//! instance per kind, so insertion never runs out of room.

use arrayvec::ArrayVec;
use strum::EnumCount;

use super::{StatusClass, StatusEffectInstance, StatusKind};

/// Active status effects on a combatant.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffectInstance, { StatusKind::COUNT }>,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffectInstance> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn get_mut(&mut self, kind: StatusKind) -> Option<&mut StatusEffectInstance> {
        self.effects.iter_mut().find(|e| e.kind == kind)
    }

    pub fn contains(&self, kind: StatusKind) -> bool {
        self.get(kind).is_some()
    }

    /// Inserts an instance, replacing any existing instance of the same kind.
    pub fn insert(&mut self, instance: StatusEffectInstance) {
        if let Some(existing) = self.get_mut(instance.kind) {
            *existing = instance;
        } else {
            // One slot per kind: cannot fail.
            let pushed = self.effects.try_push(instance);
            debug_assert!(pushed.is_ok());
        }
    }

    /// Removes the instance of a kind, returning it.
    pub fn remove(&mut self, kind: StatusKind) -> Option<StatusEffectInstance> {
        let index = self.effects.iter().position(|e| e.kind == kind)?;
        Some(self.effects.remove(index))
    }

    /// Removes every instance of a class, returning their kinds in set order.
    pub fn remove_class(&mut self, class: StatusClass) -> Vec<StatusKind> {
        let removed = self
            .effects
            .iter()
            .filter(|e| e.kind.class() == class)
            .map(|e| e.kind)
            .collect();
        self.effects.retain(|e| e.kind.class() != class);
        removed
    }

    /// Removes expired instances, returning their kinds in set order.
    pub fn remove_expired(&mut self) -> Vec<StatusKind> {
        let expired = self
            .effects
            .iter()
            .filter(|e| e.is_expired())
            .map(|e| e.kind)
            .collect();
        self.effects.retain(|e| !e.is_expired());
        expired
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectInstance> {
        self.effects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StatusEffectInstance> {
        self.effects.iter_mut()
    }

    pub fn kinds(&self) -> impl Iterator<Item = StatusKind> + '_ {
        self.effects.iter().map(|e| e.kind)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StackingPolicy;
    use crate::tags::StatusParams;
    use strum::IntoEnumIterator;

    fn instance(kind: StatusKind) -> StatusEffectInstance {
        StatusEffectInstance::new(
            kind,
            &StatusParams::new(2.0, 1.0, 1.0, StackingPolicy::None),
            None,
        )
    }

    #[test]
    fn holds_one_instance_per_kind() {
        let mut set = StatusEffects::empty();
        set.insert(instance(StatusKind::Stun));
        let mut longer = instance(StatusKind::Stun);
        longer.remaining = 9.0;
        set.insert(longer);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(StatusKind::Stun).map(|e| e.remaining), Some(9.0));
    }

    #[test]
    fn every_kind_fits() {
        let mut set = StatusEffects::empty();
        for kind in StatusKind::iter() {
            set.insert(instance(kind));
        }
        assert_eq!(set.len(), StatusKind::COUNT);
    }

    #[test]
    fn removal_by_class_and_expiry() {
        let mut set = StatusEffects::empty();
        set.insert(instance(StatusKind::Haste));
        set.insert(instance(StatusKind::Slow));
        let mut done = instance(StatusKind::Root);
        done.remaining = 0.0;
        set.insert(done);

        assert_eq!(set.remove_expired(), vec![StatusKind::Root]);
        assert_eq!(set.remove_class(StatusClass::Buff), vec![StatusKind::Haste]);
        assert_eq!(set.kinds().collect::<Vec<_>>(), vec![StatusKind::Slow]);
        assert!(set.remove(StatusKind::Slow).is_some());
        assert!(set.is_empty());
    }
}
