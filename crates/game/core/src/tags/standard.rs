//! The built-in tag catalog.
//!
//! `combat-content` ships the same catalog as data; this copy lets hosts and
//! tests run without any files.

use crate::combat::DamageType;
use crate::status::StackingPolicy;

use super::params::{
    ContextFilter, Geometry, ParamKey, SpecialEffect, SplashFalloff, StatusParams, SynergyBonus,
    TriggerCondition,
};
use super::{TagDefinition, TagEffect, TagId, TagRegistry};

/// Aliases expanded before canonical lookup.
pub const STANDARD_ALIASES: &[(&str, TagId)] = &[
    ("ice", TagId::Frost),
    ("cold", TagId::Frost),
    ("vampiric", TagId::Lifesteal),
    ("electric", TagId::Lightning),
    ("aoe", TagId::Circle),
    ("blast", TagId::Splash),
    ("bolt", TagId::Projectile),
    ("single", TagId::SingleTarget),
];

impl TagRegistry {
    /// The standard catalog with default parameters, conflicts and synergies.
    pub fn standard() -> TagRegistry {
        let definitions = standard_definitions()
            .into_iter()
            .map(|def| (def.id, def))
            .collect();
        let aliases = STANDARD_ALIASES
            .iter()
            .map(|&(alias, id)| (alias.to_owned(), id))
            .collect();
        TagRegistry::from_parts(definitions, aliases)
    }
}

/// Every definition of the standard catalog, in declaration order.
pub fn standard_definitions() -> Vec<TagDefinition> {
    let mut defs = Vec::with_capacity(45);
    defs.extend(geometry());
    defs.extend(damage_types());
    defs.extend(statuses());
    defs.extend(specials());
    defs.extend(triggers());
    defs.extend(contexts());
    defs
}

fn geometry() -> [TagDefinition; 8] {
    let def = |id, geometry, priority| {
        TagDefinition::new(id, TagEffect::Geometry(geometry)).with_priority(priority)
    };
    [
        def(TagId::SingleTarget, Geometry::SingleTarget, 0),
        def(
            TagId::Projectile,
            Geometry::Projectile {
                range: 12.0,
                width: 0.5,
            },
            10,
        ),
        def(
            TagId::Pierce,
            Geometry::Pierce {
                range: 12.0,
                width: 0.5,
                max_targets: 5,
            },
            20,
        ),
        def(
            TagId::Beam,
            Geometry::Beam {
                range: 10.0,
                width: 1.0,
            },
            30,
        ),
        def(
            TagId::Cone,
            Geometry::Cone {
                range: 6.0,
                angle: 60.0,
                falloff: SplashFalloff::None,
            },
            40,
        ),
        def(
            TagId::Splash,
            Geometry::Splash {
                radius: 3.0,
                falloff: SplashFalloff::Linear,
            },
            50,
        )
        .with_synergy(TagId::Fire, ParamKey::Radius, SynergyBonus::Flat(1.0)),
        def(
            TagId::Circle,
            Geometry::Circle {
                radius: 4.0,
                falloff: SplashFalloff::None,
            },
            60,
        ),
        def(
            TagId::Chain,
            Geometry::Chain {
                chain_count: 2,
                chain_range: 5.0,
                chain_falloff: 0.3,
            },
            70,
        )
        .with_synergy(
            TagId::Lightning,
            ParamKey::ChainRange,
            SynergyBonus::Percent(0.20),
        ),
    ]
}

fn damage_types() -> impl Iterator<Item = TagDefinition> {
    [
        (TagId::Physical, DamageType::Physical),
        (TagId::Fire, DamageType::Fire),
        (TagId::Frost, DamageType::Frost),
        (TagId::Lightning, DamageType::Lightning),
        (TagId::Arcane, DamageType::Arcane),
        (TagId::Shadow, DamageType::Shadow),
        (TagId::Holy, DamageType::Holy),
    ]
    .into_iter()
    .map(|(id, damage)| TagDefinition::new(id, TagEffect::Damage(damage)))
}

fn statuses() -> [TagDefinition; 13] {
    use StackingPolicy::{Additive, Diminishing, Multiplicative};
    let def = |id, params: StatusParams| TagDefinition::new(id, TagEffect::Status(params));
    [
        def(
            TagId::Burn,
            StatusParams::new(4.0, 1.0, 5.0, Additive).with_max_stacks(3),
        )
        .conflicts_with([TagId::Freeze])
        .with_synergy(TagId::Fire, ParamKey::Magnitude, SynergyBonus::Percent(0.25)),
        def(
            TagId::Bleed,
            StatusParams::new(5.0, 1.0, 3.0, Additive).with_max_stacks(5),
        ),
        def(
            TagId::Poison,
            StatusParams::new(6.0, 1.0, 4.0, Additive).with_stack_multiplier(1.2),
        )
        .with_synergy(TagId::Shadow, ParamKey::Duration, SynergyBonus::Flat(2.0)),
        def(TagId::Freeze, StatusParams::new(2.0, 1.0, 1.0, StackingPolicy::None))
            .conflicts_with([TagId::Burn])
            .with_synergy(TagId::Frost, ParamKey::Duration, SynergyBonus::Percent(0.50)),
        def(TagId::Slow, StatusParams::new(3.0, 1.0, 0.3, Multiplicative))
            .conflicts_with([TagId::Haste]),
        def(
            TagId::Stun,
            StatusParams::new(1.0, 1.0, 1.0, Diminishing).with_max_stacks(5),
        ),
        def(
            TagId::Root,
            StatusParams::new(2.0, 1.0, 1.0, StackingPolicy::None),
        ),
        def(TagId::Weaken, StatusParams::new(5.0, 1.0, 0.25, Multiplicative))
            .conflicts_with([TagId::Empower]),
        def(
            TagId::Vulnerable,
            StatusParams::new(5.0, 1.0, 0.25, Multiplicative),
        )
        .conflicts_with([TagId::Fortify]),
        def(TagId::Empower, StatusParams::new(8.0, 1.0, 0.25, Multiplicative))
            .conflicts_with([TagId::Weaken]),
        def(TagId::Haste, StatusParams::new(6.0, 1.0, 0.3, Multiplicative))
            .conflicts_with([TagId::Slow]),
        def(TagId::Fortify, StatusParams::new(6.0, 1.0, 0.25, Multiplicative))
            .conflicts_with([TagId::Vulnerable]),
        def(
            TagId::Regeneration,
            StatusParams::new(5.0, 1.0, 4.0, Additive).with_max_stacks(3),
        ),
    ]
}

fn specials() -> impl Iterator<Item = TagDefinition> {
    [
        (TagId::Lifesteal, SpecialEffect::Lifesteal { fraction: 0.15 }),
        (TagId::Knockback, SpecialEffect::Knockback { distance: 2.0 }),
        (
            TagId::Execute,
            SpecialEffect::Execute {
                threshold: 0.2,
                bonus: 0.5,
            },
        ),
        (
            TagId::Crushing,
            SpecialEffect::Crushing {
                threshold: 20.0,
                bonus: 0.25,
            },
        ),
        (
            TagId::ArmorBreaker,
            SpecialEffect::ArmorBreaker {
                ignore_fraction: 0.25,
            },
        ),
        (
            TagId::Precision,
            SpecialEffect::Precision { crit_bonus: 0.10 },
        ),
    ]
    .into_iter()
    .map(|(id, special)| TagDefinition::new(id, TagEffect::Special(special)))
}

fn triggers() -> impl Iterator<Item = TagDefinition> {
    [
        (TagId::OnHit, TriggerCondition::OnHit),
        (TagId::OnCrit, TriggerCondition::OnCrit),
        (TagId::OnKill, TriggerCondition::OnKill),
    ]
    .into_iter()
    .map(|(id, trigger)| TagDefinition::new(id, TagEffect::Trigger(trigger)))
}

fn contexts() -> impl Iterator<Item = TagDefinition> {
    const CONTEXTS: [(TagId, ContextFilter); 4] = [
        (TagId::SelfOnly, ContextFilter::SelfOnly),
        (TagId::Ally, ContextFilter::Ally),
        (TagId::Enemy, ContextFilter::Enemy),
        (TagId::All, ContextFilter::All),
    ];
    CONTEXTS.into_iter().map(|(id, context)| {
        TagDefinition::new(id, TagEffect::Context(context)).conflicts_with(
            CONTEXTS
                .iter()
                .map(|&(other, _)| other)
                .filter(move |&other| other != id),
        )
    })
}
