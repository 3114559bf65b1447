//! Target selection for a resolved effect.
//!
//! [`select_targets`] turns a geometry, an aim and the roster into an ordered
//! list of hits with per-target falloff. Context eligibility (liveness and
//! team) is evaluated before any shape test, so no geometry can reach a
//! combatant the context filter excludes.
mod shapes;

use crate::state::{Combatant, CombatantId, Position, Roster};
use crate::tags::{ContextFilter, Geometry, ResolvedEffectSpec};

/// Where an action is aimed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionTarget {
    /// An explicit combatant; the impact point is its position.
    Combatant(CombatantId),
    /// A ground location.
    Point(Position),
    /// A direction vector relative to the attacker.
    Direction(Position),
}

/// One selected target and the falloff multiplier applied to its base damage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetHit {
    pub id: CombatantId,
    pub falloff: f32,
}

impl TargetHit {
    pub const fn new(id: CombatantId, falloff: f32) -> Self {
        Self { id, falloff }
    }
}

/// Whether `candidate` may be affected by an effect with `context` cast by `attacker`.
pub fn is_eligible(context: ContextFilter, attacker: &Combatant, candidate: &Combatant) -> bool {
    if !candidate.is_alive() {
        return false;
    }
    let is_self = candidate.id == attacker.id;
    match context {
        ContextFilter::SelfOnly => is_self,
        ContextFilter::Ally => !is_self && candidate.team == attacker.team,
        ContextFilter::Enemy => candidate.team != attacker.team,
        ContextFilter::All => !is_self,
    }
}

/// Selects the combatants hit by `spec` when `attacker` aims at `target`.
///
/// # Returns
///
/// Hits ordered by distance from the geometry's anchor, ties broken by id.
/// Chains are ordered by hop instead. An unresolvable aim (unknown target
/// combatant, zero direction for a path shape) yields an empty list.
pub fn select_targets(
    spec: &ResolvedEffectSpec,
    attacker: &Combatant,
    target: ActionTarget,
    roster: &Roster,
) -> Vec<TargetHit> {
    let context = spec.context;
    let eligible = || {
        roster
            .iter()
            .filter(move |candidate| is_eligible(context, attacker, candidate))
    };

    let Some(impact) = impact_point(attacker, target, roster) else {
        tracing::debug!("target {:?} of {} is not in the roster", target, attacker.id);
        return Vec::new();
    };

    match spec.geometry {
        Geometry::SingleTarget => match target {
            ActionTarget::Combatant(id) => roster
                .get(id)
                .filter(|candidate| is_eligible(context, attacker, candidate))
                .map(|candidate| vec![TargetHit::new(candidate.id, 1.0)])
                .unwrap_or_default(),
            ActionTarget::Point(_) | ActionTarget::Direction(_) => Vec::new(),
        },

        Geometry::Projectile { range, width } => aim(attacker, target, impact)
            .map(|dir| {
                shapes::along_path(eligible(), attacker.position, dir, range, width)
                    .into_iter()
                    .take(1)
                    .map(|(_, id)| TargetHit::new(id, 1.0))
                    .collect()
            })
            .unwrap_or_default(),

        Geometry::Pierce {
            range,
            width,
            max_targets,
        } => aim(attacker, target, impact)
            .map(|dir| {
                shapes::along_path(eligible(), attacker.position, dir, range, width)
                    .into_iter()
                    .take(max_targets as usize)
                    .map(|(_, id)| TargetHit::new(id, 1.0))
                    .collect()
            })
            .unwrap_or_default(),

        Geometry::Beam { range, width } => aim(attacker, target, impact)
            .map(|dir| {
                shapes::along_path(eligible(), attacker.position, dir, range, width)
                    .into_iter()
                    .map(|(_, id)| TargetHit::new(id, 1.0))
                    .collect()
            })
            .unwrap_or_default(),

        Geometry::Cone {
            range,
            angle,
            falloff,
        } => aim(attacker, target, impact)
            .map(|dir| shapes::cone(eligible(), attacker.position, dir, range, angle, falloff))
            .unwrap_or_default(),

        Geometry::Splash { radius, falloff } | Geometry::Circle { radius, falloff } => {
            shapes::area(eligible(), impact, radius, falloff)
        }

        Geometry::Chain {
            chain_count,
            chain_range,
            chain_falloff,
        } => {
            let first = match target {
                ActionTarget::Combatant(id) => roster
                    .get(id)
                    .filter(|candidate| is_eligible(context, attacker, candidate)),
                ActionTarget::Point(_) | ActionTarget::Direction(_) => {
                    shapes::nearest(eligible(), impact, chain_range, &[])
                }
            };
            let Some(first) = first else {
                return Vec::new();
            };
            chain(first, eligible, chain_count, chain_range, chain_falloff)
        }
    }
}

/// Follows the chain from `first`, hopping to the nearest untouched candidate.
fn chain<'a, I>(
    first: &'a Combatant,
    eligible: impl Fn() -> I,
    chain_count: u32,
    chain_range: f32,
    chain_falloff: f32,
) -> Vec<TargetHit>
where
    I: Iterator<Item = &'a Combatant>,
{
    let decay = (1.0 - chain_falloff).clamp(0.0, 1.0);
    let mut visited = vec![first.id];
    let mut hits = vec![TargetHit::new(first.id, 1.0)];
    let mut link = first.position;
    let mut multiplier = 1.0;

    for _ in 0..chain_count {
        let Some(next) = shapes::nearest(eligible(), link, chain_range, &visited) else {
            break;
        };
        multiplier *= decay;
        visited.push(next.id);
        hits.push(TargetHit::new(next.id, multiplier));
        link = next.position;
    }
    hits
}

fn impact_point(attacker: &Combatant, target: ActionTarget, roster: &Roster) -> Option<Position> {
    match target {
        ActionTarget::Combatant(id) => roster.get(id).map(|c| c.position),
        ActionTarget::Point(point) => Some(point),
        ActionTarget::Direction(direction) => Some(attacker.position + direction),
    }
}

/// Unit direction for path and cone shapes.
fn aim(attacker: &Combatant, target: ActionTarget, impact: Position) -> Option<Position> {
    match target {
        ActionTarget::Direction(direction) => direction.normalized(),
        ActionTarget::Combatant(_) | ActionTarget::Point(_) => {
            (impact - attacker.position).normalized()
        }
    }
}
