//! Geometric predicates for each targeting shape.
//!
//! Every function receives candidates that already passed the context
//! filter and returns hits ordered by distance from the shape's anchor,
//! then by id.

use core::cmp::Ordering;

use crate::state::{Combatant, CombatantId, Position};
use crate::tags::SplashFalloff;

use super::TargetHit;

/// Boundary slack so that targets placed exactly on an edge are inside.
const EDGE_EPSILON: f32 = 1e-4;

fn by_distance_then_id(a: &(f32, CombatantId), b: &(f32, CombatantId)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

/// Candidates inside a band of `width` starting at `origin` along `direction`.
///
/// Returned as `(distance along the path, id)` pairs, nearest first.
pub(super) fn along_path<'a>(
    candidates: impl Iterator<Item = &'a Combatant>,
    origin: Position,
    direction: Position,
    range: f32,
    width: f32,
) -> Vec<(f32, CombatantId)> {
    let half_width = width * 0.5;
    let mut hits: Vec<(f32, CombatantId)> = candidates
        .filter_map(|c| {
            let offset = c.position - origin;
            let along = offset.dot(direction);
            if along < -EDGE_EPSILON || along > range + EDGE_EPSILON {
                return None;
            }
            let lateral = (offset - direction.scaled(along)).length();
            (lateral <= half_width + EDGE_EPSILON).then_some((along.max(0.0), c.id))
        })
        .collect();
    hits.sort_by(by_distance_then_id);
    hits
}

pub(super) fn cone<'a>(
    candidates: impl Iterator<Item = &'a Combatant>,
    origin: Position,
    direction: Position,
    range: f32,
    angle_degrees: f32,
    falloff: SplashFalloff,
) -> Vec<TargetHit> {
    let min_cos = (angle_degrees.to_radians() * 0.5).cos();
    let mut hits: Vec<(f32, CombatantId)> = candidates
        .filter_map(|c| {
            let offset = c.position - origin;
            let distance = offset.length();
            if distance > range + EDGE_EPSILON {
                return None;
            }
            let inside = match offset.normalized() {
                Some(unit) => unit.dot(direction) + EDGE_EPSILON >= min_cos,
                // Standing on the apex.
                None => true,
            };
            inside.then_some((distance, c.id))
        })
        .collect();
    hits.sort_by(by_distance_then_id);
    hits.into_iter()
        .map(|(distance, id)| TargetHit::new(id, falloff.multiplier(distance, range)))
        .collect()
}

pub(super) fn area<'a>(
    candidates: impl Iterator<Item = &'a Combatant>,
    center: Position,
    radius: f32,
    falloff: SplashFalloff,
) -> Vec<TargetHit> {
    let mut hits: Vec<(f32, CombatantId)> = candidates
        .filter_map(|c| {
            let distance = c.position.distance(center);
            (distance <= radius + EDGE_EPSILON).then_some((distance, c.id))
        })
        .collect();
    hits.sort_by(by_distance_then_id);
    hits.into_iter()
        .map(|(distance, id)| TargetHit::new(id, falloff.multiplier(distance, radius)))
        .collect()
}

/// Nearest candidate within `range` of `from` that is not in `exclude`.
pub(super) fn nearest<'a>(
    candidates: impl Iterator<Item = &'a Combatant>,
    from: Position,
    range: f32,
    exclude: &[CombatantId],
) -> Option<&'a Combatant> {
    candidates
        .filter(|c| !exclude.contains(&c.id))
        .map(|c| (c.position.distance(from), c))
        .filter(|(distance, _)| *distance <= range + EDGE_EPSILON)
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)))
        .map(|(_, c)| c)
}
