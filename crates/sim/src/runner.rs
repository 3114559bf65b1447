//! The fixed-step loop that plays a scenario through the combat engine.
use combat_content::{Scenario, SkillBook};
use combat_core::{
    CombatEngine, CombatEnv, CombatError, CombatEvent, CombatantId, Encounter, Team,
};

/// What a run produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    /// Simulated seconds actually played.
    pub elapsed: f32,
    pub steps: u64,
    pub actions: u32,
    /// Scripted actions that were rejected or named an unknown skill.
    pub skipped: u32,
    pub events: usize,
    /// Last team standing, if the fight was decided.
    pub winner: Option<Team>,
}

/// Plays `scenario` for up to `seconds`, feeding `frame_dt` per iteration.
///
/// Scripted actions run at the start of the frame they fall into; the
/// engine then advances and the drained events are logged. The loop ends
/// early once only one team is left standing.
pub fn run(
    engine: &CombatEngine,
    encounter: &mut Encounter,
    env: CombatEnv<'_>,
    skills: &SkillBook,
    scenario: &Scenario,
    seconds: f32,
    frame_dt: f32,
) -> Summary {
    let mut summary = Summary::default();
    let mut elapsed = 0.0_f32;

    while elapsed < seconds {
        let next = elapsed + frame_dt;
        for action in scenario.due(elapsed, next) {
            let Some(request) = skills.request(&action.skill, action.attacker, action.target)
            else {
                tracing::warn!("{} scripted unknown skill {}", action.attacker, action.skill);
                summary.skipped += 1;
                continue;
            };
            match engine.resolve_action(encounter, env, &request) {
                Ok(hits) => {
                    summary.actions += 1;
                    let total: u32 = hits.iter().map(|hit| hit.final_damage).sum();
                    tracing::info!(
                        "[{:>6.2}s] {} uses {}: {} hits, {} damage",
                        elapsed,
                        action.attacker,
                        action.skill,
                        hits.len(),
                        total
                    );
                }
                Err(e) => {
                    summary.skipped += 1;
                    tracing::warn!(
                        "[{:>6.2}s] {} cannot use {}: {} ({}, {})",
                        elapsed,
                        action.attacker,
                        action.skill,
                        e,
                        e.error_code(),
                        e.severity()
                    );
                }
            }
        }

        summary.steps += u64::from(engine.advance(encounter, frame_dt));
        for event in encounter.drain_events() {
            log_event(&event);
            summary.events += 1;
        }
        elapsed = next;

        if !encounter.is_contested() {
            summary.winner = encounter.roster().living().map(|c| c.team).next();
            tracing::info!("encounter decided after {:.2}s", elapsed);
            break;
        }
    }

    summary.elapsed = elapsed;
    summary
}

fn log_event(event: &CombatEvent) {
    match event {
        CombatEvent::Damage(hit) => tracing::debug!(
            "{} hits {} for {}{}",
            hit.attacker,
            hit.defender,
            hit.final_damage,
            if hit.is_crit { " (crit)" } else { "" }
        ),
        CombatEvent::StatusTick {
            target,
            kind,
            amount,
            ..
        } => tracing::debug!("{} takes {} from {}", target, amount, kind),
        CombatEvent::Heal { target, amount, .. } => {
            tracing::debug!("{} heals {}", target, amount)
        }
        CombatEvent::StatusApplied {
            target,
            kind,
            outcome,
            stacks,
            ..
        } => tracing::debug!("{} {} {} (stacks {})", target, outcome, kind, stacks),
        CombatEvent::StatusRemoved {
            target,
            kind,
            reason,
            ..
        } => tracing::debug!("{} loses {} ({})", target, kind, reason),
        CombatEvent::Death { target, killer, .. } => match killer {
            Some(killer) => tracing::info!("{} was slain by {}", target, killer),
            None => tracing::info!("{} died", target),
        },
        CombatEvent::Knockback { target, to, .. } => {
            tracing::debug!("{} knocked back to {}", target, to)
        }
        CombatEvent::TriggerFired {
            attacker,
            target,
            condition,
            effect,
            ..
        } => tracing::debug!("{} {} on {} fired {}", attacker, condition, target, effect),
    }
}

/// Final health of every combatant, in spawn order.
pub fn standings(encounter: &Encounter) -> Vec<(CombatantId, u32, u32)> {
    encounter
        .roster()
        .iter()
        .map(|c| (c.id, c.health.current, c.health.maximum))
        .collect()
}
