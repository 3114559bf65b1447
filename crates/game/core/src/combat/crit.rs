//! Critical hit chance and roll.

use crate::config::CombatConfig;
use crate::env::RngOracle;
use crate::state::Combatant;
use crate::tags::{Geometry, ResolvedEffectSpec, SpecialEffect};

/// Calculate the crit chance of a hit.
///
/// # Formula
///
/// ```text
/// chance = base + LUCK × per_luck + precision + (pierce ? pierce_bonus : 0)
/// clamped to [0, 1]
/// ```
pub fn crit_chance(attacker: &Combatant, spec: &ResolvedEffectSpec, config: &CombatConfig) -> f32 {
    let precision: f32 = spec
        .specials
        .iter()
        .map(|special| match *special {
            SpecialEffect::Precision { crit_bonus } => crit_bonus,
            _ => 0.0,
        })
        .sum();
    let pierce = if matches!(spec.geometry, Geometry::Pierce { .. }) {
        config.pierce_crit_bonus
    } else {
        0.0
    };

    let chance = config.base_crit_chance
        + attacker.attributes.luck as f32 * config.crit_chance_per_luck
        + precision
        + pierce;
    chance.clamp(0.0, 1.0)
}

/// Roll a crit against the deterministic RNG.
///
/// # Returns
///
/// `true` on a critical hit. A chance of 0 never crits and 1 always does.
pub fn roll_crit(rng: &(impl RngOracle + ?Sized), seed: u64, chance: f32) -> bool {
    rng.chance(seed, chance)
}
