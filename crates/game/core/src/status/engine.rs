//! Status effect engine: stacking, conflicts and the fixed-step clock.
//!
//! Every mutation of a combatant's status set goes through here and ends by
//! recomputing the combatant's derived multipliers, so queries never observe
//! stale values.

use std::sync::Arc;

use crate::combat::{CombatEvent, RemovalReason};
use crate::config::CombatConfig;
use crate::state::{Combatant, CombatantId, Roster, Tick};
use crate::tags::TagRegistry;

use super::{
    EffectView, StackingPolicy, StatusClass, StatusEffectInstance, StatusKind, TickEffect,
};

/// Result of an `apply` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ApplyOutcome {
    /// No instance of the kind was active.
    Inserted,
    /// Stack count increased.
    Stacked,
    /// Duration refreshed; magnitude unchanged.
    Refreshed,
    /// Stronger application replaced the active instance.
    Replaced,
    /// Weaker application discarded.
    Ignored,
    /// Diminishing stack cap reached; nothing changed.
    Capped,
    /// Target is dead; nothing changed.
    TargetDead,
}

impl ApplyOutcome {
    /// True if the active set changed.
    pub fn took_effect(self) -> bool {
        matches!(
            self,
            ApplyOutcome::Inserted
                | ApplyOutcome::Stacked
                | ApplyOutcome::Refreshed
                | ApplyOutcome::Replaced
        )
    }
}

/// Outcome of an `apply` call plus the conflicting kinds it evicted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplyReport {
    pub outcome: ApplyOutcome,
    pub stacks: u32,
    pub evicted: Vec<StatusKind>,
}

/// Applies, ticks, queries and removes timed effects.
#[derive(Clone, Debug)]
pub struct StatusEngine {
    registry: Arc<TagRegistry>,
    diminishing_factor: f32,
}

impl StatusEngine {
    pub fn new(registry: Arc<TagRegistry>, config: &CombatConfig) -> Self {
        Self {
            registry,
            diminishing_factor: config.diminishing_factor,
        }
    }

    fn conflicts(&self, a: StatusKind, b: StatusKind) -> bool {
        self.registry.conflicts(a.tag(), b.tag())
    }

    /// Applies an instance to a combatant.
    ///
    /// Conflicting kinds already active are evicted first (last applied
    /// wins), then the kind's stacking policy decides what happens.
    pub fn apply(&self, target: &mut Combatant, incoming: StatusEffectInstance) -> ApplyReport {
        if !target.is_alive() {
            return ApplyReport {
                outcome: ApplyOutcome::TargetDead,
                stacks: 0,
                evicted: Vec::new(),
            };
        }

        let kind = incoming.kind;
        let evicted: Vec<StatusKind> = target
            .statuses()
            .kinds()
            .filter(|&active| active != kind && self.conflicts(active, kind))
            .collect();
        for &gone in &evicted {
            target.statuses_mut().remove(gone);
            tracing::debug!("{} on {} removed by conflicting {}", gone, target.id, kind);
        }

        let factor = self.diminishing_factor;
        let statuses = target.statuses_mut();
        let outcome = match statuses.get_mut(kind) {
            None => {
                statuses.insert(incoming);
                ApplyOutcome::Inserted
            }
            Some(active) => stack(active, &incoming, factor),
        };
        let stacks = statuses.get(kind).map_or(0, |e| e.stacks);

        target.refresh_derived();
        tracing::debug!("{} on {}: {} (stacks {})", kind, target.id, outcome, stacks);

        ApplyReport {
            outcome,
            stacks,
            evicted,
        }
    }

    /// Current state of one status on a combatant.
    pub fn query(&self, target: &Combatant, kind: StatusKind) -> Option<EffectView> {
        target.statuses().get(kind).map(StatusEffectInstance::view)
    }

    /// Cures one status. Returns true if it was active.
    pub fn remove(&self, target: &mut Combatant, kind: StatusKind) -> bool {
        let removed = target.statuses_mut().remove(kind).is_some();
        if removed {
            target.refresh_derived();
            tracing::debug!("{} cured on {}", kind, target.id);
        }
        removed
    }

    /// Removes every buff or every debuff, returning the removed kinds.
    pub fn cleanse(&self, target: &mut Combatant, class: StatusClass) -> Vec<StatusKind> {
        let removed = target.statuses_mut().remove_class(class);
        if !removed.is_empty() {
            target.refresh_derived();
            tracing::debug!("cleansed {:?} from {}", removed, target.id);
        }
        removed
    }

    /// Advances every status on every living combatant by `dt` seconds.
    ///
    /// Per-tick effects fire once per full `tick_rate` accumulated; the
    /// final tick of an effect fires before it expires.
    pub fn tick(
        &self,
        roster: &mut Roster,
        dt: f32,
        clock: Tick,
        events: &mut Vec<CombatEvent>,
    ) {
        for combatant in roster.iter_mut() {
            if combatant.is_alive() {
                self.tick_combatant(combatant, dt, clock, events);
            }
        }
    }

    fn tick_combatant(
        &self,
        target: &mut Combatant,
        dt: f32,
        clock: Tick,
        events: &mut Vec<CombatEvent>,
    ) {
        if target.statuses().is_empty() {
            return;
        }

        let taken = target.damage_taken_multiplier();
        let mut pulses: Vec<Pulse> = Vec::new();
        for effect in target.statuses_mut().iter_mut() {
            effect.accumulator += dt;
            let effect_kind = effect.kind.tick_effect();
            while effect.tick_rate > 0.0 && effect.accumulator + TICK_EPSILON >= effect.tick_rate {
                effect.accumulator -= effect.tick_rate;
                let scale = match effect_kind {
                    TickEffect::Damage(_) => taken,
                    TickEffect::Heal => 1.0,
                    TickEffect::Nothing => continue,
                };
                pulses.push(Pulse {
                    kind: effect.kind,
                    source: effect.source,
                    amount: effect.take_tick_amount(scale),
                });
            }
            effect.remaining -= dt;
        }

        for pulse in pulses {
            match pulse.kind.tick_effect() {
                TickEffect::Damage(damage_type) => {
                    let dealt = target.take_damage(pulse.amount);
                    events.push(CombatEvent::StatusTick {
                        target: target.id,
                        kind: pulse.kind,
                        source: pulse.source,
                        damage_type,
                        amount: dealt,
                        clock,
                    });
                    if !target.is_alive() {
                        tracing::debug!("{} killed by {}", target.id, pulse.kind);
                        events.push(CombatEvent::Death {
                            target: target.id,
                            killer: pulse.source,
                            clock,
                        });
                        return;
                    }
                }
                TickEffect::Heal => {
                    let healed = target.heal(pulse.amount);
                    events.push(CombatEvent::Heal {
                        target: target.id,
                        source: pulse.source,
                        amount: healed,
                        clock,
                    });
                }
                TickEffect::Nothing => {}
            }
        }

        let expired = target.statuses_mut().remove_expired();
        if !expired.is_empty() {
            target.refresh_derived();
            for kind in expired {
                tracing::debug!("{} expired on {}", kind, target.id);
                events.push(CombatEvent::StatusRemoved {
                    target: target.id,
                    kind,
                    reason: RemovalReason::Expired,
                    clock,
                });
            }
        }
    }
}

/// Slack for float accumulation of fixed steps.
const TICK_EPSILON: f32 = 1e-4;

struct Pulse {
    kind: StatusKind,
    source: Option<CombatantId>,
    amount: u32,
}

fn stack(
    active: &mut StatusEffectInstance,
    incoming: &StatusEffectInstance,
    diminishing_factor: f32,
) -> ApplyOutcome {
    match active.policy {
        StackingPolicy::Additive => {
            if active.at_stack_cap() {
                active.remaining = active.remaining.max(incoming.duration);
                return ApplyOutcome::Refreshed;
            }
            active.stacks = active.stacks.saturating_add(1);
            active.magnitude = match active.stack_multiplier {
                Some(multiplier) => {
                    active.base_magnitude * multiplier.powi(active.stacks as i32 - 1)
                }
                None => active.magnitude + incoming.base_magnitude,
            };
            active.remaining = active.remaining.max(incoming.duration);
            active.source = incoming.source.or(active.source);
            ApplyOutcome::Stacked
        }
        StackingPolicy::Multiplicative => {
            if incoming.magnitude > active.magnitude {
                *active = *incoming;
                ApplyOutcome::Replaced
            } else {
                ApplyOutcome::Ignored
            }
        }
        StackingPolicy::Diminishing => {
            if active.at_stack_cap() {
                return ApplyOutcome::Capped;
            }
            active.stacks = active.stacks.saturating_add(1);
            let contribution = diminishing_factor.powi(active.stacks as i32 - 1);
            let total: f32 = (0..active.stacks as i32)
                .map(|i| diminishing_factor.powi(i))
                .sum();
            active.magnitude = active.base_magnitude * total;
            active.remaining = active.remaining.max(incoming.duration * contribution);
            active.source = incoming.source.or(active.source);
            ApplyOutcome::Stacked
        }
        StackingPolicy::None => {
            active.remaining = incoming.duration;
            ApplyOutcome::Refreshed
        }
    }
}
