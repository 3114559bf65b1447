//! Combat orchestration.
//!
//! [`CombatEngine`] is the only component that mutates more than one
//! combatant per call. Data flows one way per action: raw tags → resolved
//! spec → targets → damage and statuses per target → events. Every outcome
//! is also queued on the [`Encounter`] outbox for rendering, audio and
//! telemetry consumers.
//!
//! Per frame, hosts submit the frame's actions first and then call
//! [`CombatEngine::advance`], which runs status ticking in fixed 60 Hz steps.

mod encounter;
mod errors;
mod request;
mod triggers;

pub use encounter::Encounter;
pub use errors::ActionError;
pub use request::ActionRequest;
pub use triggers::{HitOutcome, TriggerGraph, TriggeredEffect};

use std::sync::Arc;

use crate::combat::{
    CombatEvent, DamageContext, DamageEvent, RemovalReason, compute_damage, floor_amount,
};
use crate::config::CombatConfig;
use crate::env::{CombatEnv, RollContext, compute_seed};
use crate::state::{Combatant, CombatantId};
use crate::status::{
    ApplyReport, EffectView, StatusClass, StatusEffectInstance, StatusEngine, StatusKind,
};
use crate::tags::{
    ContextFilter, EffectDefinition, ResolvedEffectSpec, SourceOverrides, TagEffect, TagRegistry,
    TagResolver,
};
use crate::targeting::{ActionTarget, select_targets};

/// Slack so that frame times summing to a whole step are not lost to rounding.
const STEP_EPSILON: f32 = 1e-6;

/// One effect pass: the primary action or a triggered follow-up.
#[derive(Clone, Copy)]
struct EffectPass<'a> {
    spec: &'a ResolvedEffectSpec,
    base_damage: f32,
    target: ActionTarget,
    depth: u8,
}

/// Resolves actions and advances status clocks for encounters.
///
/// Holds only immutable data (tag catalog, balance numbers), so one engine
/// can drive any number of encounters.
#[derive(Clone, Debug)]
pub struct CombatEngine {
    resolver: TagResolver,
    statuses: StatusEngine,
    config: CombatConfig,
}

impl CombatEngine {
    pub fn new(registry: Arc<TagRegistry>, config: CombatConfig) -> Self {
        let statuses = StatusEngine::new(Arc::clone(&registry), &config);
        Self {
            resolver: TagResolver::new(registry),
            statuses,
            config,
        }
    }

    /// Engine over the built-in catalog and default balance numbers.
    pub fn standard() -> Self {
        Self::new(Arc::new(TagRegistry::standard()), CombatConfig::default())
    }

    pub fn resolver(&self) -> &TagResolver {
        &self.resolver
    }

    pub fn status_engine(&self) -> &StatusEngine {
        &self.statuses
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Resolves a raw tag list without touching any encounter.
    pub fn resolve<S: AsRef<str>>(
        &self,
        tags: &[S],
        overrides: &SourceOverrides,
    ) -> ResolvedEffectSpec {
        self.resolver.resolve(tags, overrides)
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Resolves one action against an encounter.
    ///
    /// The raw tag list is the request's tags followed by the attacker's
    /// weapon tags. Base damage is the request's plus the weapon's, except
    /// for pure status casts (no base damage of their own and at least one
    /// status) which never swing the weapon.
    ///
    /// # Returns
    ///
    /// One [`DamageEvent`] per damaging hit, including hits of triggered
    /// effects right after the hit that fired them. Missing targets and
    /// empty target sets yield fewer (or no) events, never an error.
    ///
    /// # Errors
    ///
    /// Only when the attacker is missing, dead or stunned.
    pub fn resolve_action(
        &self,
        encounter: &mut Encounter,
        env: CombatEnv<'_>,
        request: &ActionRequest,
    ) -> Result<Vec<DamageEvent>, ActionError> {
        let attacker = encounter
            .roster
            .get(request.attacker)
            .ok_or(ActionError::AttackerNotFound(request.attacker))?;
        if !attacker.is_alive() {
            return Err(ActionError::AttackerDead(request.attacker));
        }
        if attacker.is_stunned() {
            return Err(ActionError::AttackerIncapacitated(request.attacker));
        }

        let weapon = env.weapon_of(attacker).unwrap_or_else(|err| {
            tracing::warn!("weapon lookup for {} failed: {}", request.attacker, err);
            None
        });

        let mut raw: Vec<&str> = request.tags.iter().map(String::as_str).collect();
        let mut riders: Vec<&EffectDefinition> = request.triggered.iter().collect();
        if let Some(weapon) = weapon {
            raw.extend(weapon.tags.iter().map(String::as_str));
            riders.extend(weapon.enchantments.iter());
        }

        let spec = self.resolver.resolve(&raw, &request.overrides);
        let status_cast = request.base_damage <= 0.0 && !spec.statuses.is_empty();
        let base_damage = match weapon {
            Some(weapon) if !status_cast => request.base_damage + weapon.damage,
            _ => request.base_damage,
        };
        let triggers = TriggerGraph::build(&self.resolver, riders);

        tracing::debug!(
            "{} acts: {:?} geometry {:?}, base {}, {} trigger(s)",
            request.attacker,
            spec.tags,
            spec.geometry,
            base_damage,
            triggers.len()
        );

        let pass = EffectPass {
            spec: &spec,
            base_damage,
            target: request.target,
            depth: 0,
        };
        Ok(self.execute(encounter, env, request.attacker, pass, &triggers))
    }

    /// Runs one effect pass and, within the depth bound, its triggers.
    fn execute(
        &self,
        encounter: &mut Encounter,
        env: CombatEnv<'_>,
        attacker_id: CombatantId,
        pass: EffectPass<'_>,
        triggers: &TriggerGraph,
    ) -> Vec<DamageEvent> {
        // Snapshot: every hit of one pass sees the attacker as it was when
        // the pass started.
        let Some(attacker) = encounter.roster.get(attacker_id).cloned() else {
            return Vec::new();
        };
        let spec = pass.spec;
        let hits = select_targets(spec, &attacker, pass.target, &encounter.roster);
        if hits.is_empty() {
            tracing::debug!("{} hit nothing", attacker.id);
            return Vec::new();
        }

        let nonce = encounter.next_nonce();
        let ctx = DamageContext {
            env,
            config: &self.config,
            encounter_seed: encounter.seed(),
            nonce,
        };
        let clock = encounter.clock;
        let may_trigger = pass.depth < self.config.effective_trigger_depth();
        let mut self_buffs_pending = spec.context == ContextFilter::Enemy;
        let mut damage_events = Vec::new();

        for hit in hits {
            let Some(defender) = encounter.roster.get(hit.id) else {
                tracing::debug!("{} left the encounter mid-action, skipped", hit.id);
                continue;
            };
            if !defender.is_alive() {
                tracing::debug!("{} died mid-action, skipped", hit.id);
                continue;
            }

            let base = pass.base_damage * hit.falloff;
            let roll =
                (base > 0.0).then(|| compute_damage(&attacker, defender, base, spec, &ctx));

            // Damage and death
            let mut outcome = HitOutcome::default();
            let mut dealt = 0;
            if let Some(roll) = &roll {
                if let Some(defender) = encounter.roster.get_mut(hit.id) {
                    dealt = defender.take_damage(roll.amount);
                    outcome = HitOutcome {
                        crit: roll.is_crit,
                        killed: !defender.is_alive(),
                    };
                }
                let event = DamageEvent {
                    attacker: attacker.id,
                    defender: hit.id,
                    base_damage: base,
                    final_damage: roll.amount,
                    is_crit: roll.is_crit,
                    damage_types: spec.damage_types.clone(),
                    timestamp: clock,
                };
                encounter.outbox.push(CombatEvent::Damage(event.clone()));
                damage_events.push(event);
            }
            if outcome.killed {
                tracing::debug!("{} killed {}", attacker.id, hit.id);
                encounter.outbox.push(CombatEvent::Death {
                    target: hit.id,
                    killer: Some(attacker.id),
                    clock,
                });
            }

            self.lifesteal(encounter, &attacker, spec, dealt);
            if !outcome.killed {
                self.knockback(encounter, &attacker, hit.id, spec);
            }

            // Status rolls, each independent.
            for (index, status) in spec.statuses.iter().enumerate() {
                let to_attacker = status.kind.is_buff() && spec.context == ContextFilter::Enemy;
                if to_attacker && !self_buffs_pending {
                    continue;
                }
                let recipient = if to_attacker { attacker.id } else { hit.id };
                let seed = compute_seed(
                    encounter.seed(),
                    nonce,
                    attacker.id,
                    RollContext::Status {
                        target: hit.id,
                        index: index as u32,
                    },
                );
                if !env.rng().chance(seed, status.params.chance) {
                    tracing::trace!(
                        "{} missed its {} roll on {}",
                        attacker.id,
                        status.kind,
                        recipient
                    );
                    continue;
                }
                let instance =
                    StatusEffectInstance::new(status.kind, &status.params, Some(attacker.id));
                self.apply_instance(encounter, recipient, instance);
            }
            self_buffs_pending = false;

            // Triggered effects never fire on status-only hits.
            if may_trigger && roll.is_some() {
                for (condition, triggered) in triggers.fired(outcome) {
                    tracing::debug!("{} fired {} on {}", condition, triggered.name, hit.id);
                    encounter.outbox.push(CombatEvent::TriggerFired {
                        attacker: attacker.id,
                        target: hit.id,
                        condition,
                        effect: triggered.name.clone(),
                        clock,
                    });
                    let target = match triggered.spec.context {
                        ContextFilter::SelfOnly => ActionTarget::Combatant(attacker.id),
                        _ => ActionTarget::Combatant(hit.id),
                    };
                    let nested = EffectPass {
                        spec: &triggered.spec,
                        base_damage: triggered.base_damage,
                        target,
                        depth: pass.depth + 1,
                    };
                    let follow_up = self.execute(encounter, env, attacker.id, nested, triggers);
                    damage_events.extend(follow_up);
                }
            }
        }

        damage_events
    }

    fn lifesteal(
        &self,
        encounter: &mut Encounter,
        attacker: &Combatant,
        spec: &ResolvedEffectSpec,
        dealt: u32,
    ) {
        let Some(fraction) = spec.lifesteal() else {
            return;
        };
        let amount = floor_amount(dealt as f32 * fraction);
        if amount == 0 {
            return;
        }
        let Some(healer) = encounter.roster.get_mut(attacker.id) else {
            return;
        };
        let healed = healer.heal(amount);
        if healed > 0 {
            encounter.outbox.push(CombatEvent::Heal {
                target: attacker.id,
                source: Some(attacker.id),
                amount: healed,
                clock: encounter.clock,
            });
        }
    }

    /// Pushes the target away from the attacker. Rooted targets hold their ground.
    fn knockback(
        &self,
        encounter: &mut Encounter,
        attacker: &Combatant,
        target: CombatantId,
        spec: &ResolvedEffectSpec,
    ) {
        let Some(distance) = spec.knockback() else {
            return;
        };
        let Some(defender) = encounter.roster.get_mut(target) else {
            return;
        };
        if !defender.is_alive() || defender.is_rooted() {
            return;
        }
        let Some(direction) = (defender.position - attacker.position).normalized() else {
            return;
        };
        let from = defender.position;
        let to = from + direction.scaled(distance);
        defender.position = to;
        encounter.outbox.push(CombatEvent::Knockback {
            target,
            from,
            to,
            clock: encounter.clock,
        });
    }

    // ========================================================================
    // Statuses
    // ========================================================================

    /// Applies an instance and records the outcome in the outbox.
    fn apply_instance(
        &self,
        encounter: &mut Encounter,
        recipient: CombatantId,
        instance: StatusEffectInstance,
    ) -> Option<ApplyReport> {
        let clock = encounter.clock;
        let target = encounter.roster.get_mut(recipient)?;
        let report = self.statuses.apply(target, instance);
        for &kind in &report.evicted {
            encounter.outbox.push(CombatEvent::StatusRemoved {
                target: recipient,
                kind,
                reason: RemovalReason::Conflict,
                clock,
            });
        }
        if report.outcome.took_effect() {
            encounter.outbox.push(CombatEvent::StatusApplied {
                target: recipient,
                kind: instance.kind,
                source: instance.source,
                outcome: report.outcome,
                stacks: report.stacks,
                clock,
            });
        }
        Some(report)
    }

    /// Applies a status with its catalog parameters, outside of any action.
    ///
    /// Returns `None` when the target is unknown or the catalog has no
    /// status parameters for the kind.
    pub fn apply_status(
        &self,
        encounter: &mut Encounter,
        target: CombatantId,
        kind: StatusKind,
        source: Option<CombatantId>,
    ) -> Option<ApplyReport> {
        let params = match self.resolver.registry().get(kind.tag()).map(|def| def.effect) {
            Some(TagEffect::Status(params)) => params,
            _ => {
                tracing::warn!("no status parameters registered for {}", kind);
                return None;
            }
        };
        self.apply_instance(encounter, target, StatusEffectInstance::new(kind, &params, source))
    }

    pub fn query(
        &self,
        encounter: &Encounter,
        target: CombatantId,
        kind: StatusKind,
    ) -> Option<EffectView> {
        encounter
            .roster
            .get(target)
            .and_then(|combatant| self.statuses.query(combatant, kind))
    }

    /// Cures one status. Returns true if it was active.
    pub fn cure(&self, encounter: &mut Encounter, target: CombatantId, kind: StatusKind) -> bool {
        let Some(combatant) = encounter.roster.get_mut(target) else {
            return false;
        };
        let removed = self.statuses.remove(combatant, kind);
        if removed {
            encounter.outbox.push(CombatEvent::StatusRemoved {
                target,
                kind,
                reason: RemovalReason::Cured,
                clock: encounter.clock,
            });
        }
        removed
    }

    /// Removes every buff or every debuff from a combatant.
    pub fn cleanse(
        &self,
        encounter: &mut Encounter,
        target: CombatantId,
        class: StatusClass,
    ) -> Vec<StatusKind> {
        let Some(combatant) = encounter.roster.get_mut(target) else {
            return Vec::new();
        };
        let removed = self.statuses.cleanse(combatant, class);
        let clock = encounter.clock;
        encounter.outbox.extend(removed.iter().map(|&kind| CombatEvent::StatusRemoved {
            target,
            kind,
            reason: RemovalReason::Cleansed,
            clock,
        }));
        removed
    }

    // ========================================================================
    // Clock
    // ========================================================================

    /// Feeds one frame of wall time and runs every fixed step it completes.
    ///
    /// Returns the number of steps run; leftover time carries over to the
    /// next frame.
    pub fn advance(&self, encounter: &mut Encounter, frame_dt: f32) -> u32 {
        if frame_dt.is_nan() || frame_dt <= 0.0 {
            return 0;
        }
        let step = CombatConfig::step_seconds();
        encounter.accumulator += frame_dt;
        let mut steps = 0;
        while encounter.accumulator + STEP_EPSILON >= step {
            encounter.accumulator -= step;
            self.step(encounter);
            steps += 1;
        }
        encounter.accumulator = encounter.accumulator.max(0.0);
        steps
    }

    /// Runs exactly one fixed step: status tick, then derived refresh.
    pub fn step(&self, encounter: &mut Encounter) {
        encounter.clock = encounter.clock + 1;
        let clock = encounter.clock;
        self.statuses.tick(
            &mut encounter.roster,
            CombatConfig::step_seconds(),
            clock,
            &mut encounter.outbox,
        );
        for combatant in encounter.roster.iter_mut() {
            combatant.refresh_derived();
        }
    }
}
