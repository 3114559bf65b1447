use std::sync::Arc;

use combat_core::{
    ActionRequest, ActionTarget, ApplyOutcome, Attributes, CombatConfig, CombatEngine, CombatEnv,
    CombatEvent, Combatant, CombatantId, DamageType, EffectDefinition, Encounter, Geometry,
    ParamKey, ParamValue, Position, RemovalReason, SourceOverrides, StatusKind, TagId,
    TagRegistry, Team,
};

const HERO: CombatantId = CombatantId(1);

fn hero() -> Combatant {
    Combatant::new(HERO, Team::PLAYER, Position::ORIGIN, Attributes::default(), 200)
}

fn foe(id: u32, x: f32, health: u32) -> Combatant {
    Combatant::new(
        CombatantId(id),
        Team::HOSTILE,
        Position::new(x, 0.0),
        Attributes::default(),
        health,
    )
}

/// Hero at the origin and three foes in a line, three units apart.
fn line_encounter() -> Encounter {
    let mut encounter = Encounter::new(0xC0FFEE);
    encounter.spawn(hero());
    encounter.spawn(foe(10, 3.0, 500));
    encounter.spawn(foe(11, 6.0, 500));
    encounter.spawn(foe(12, 9.0, 500));
    encounter
}

fn attack(tags: &[&str], damage: f32, target: u32) -> ActionRequest {
    ActionRequest::new(
        HERO,
        tags.iter().copied(),
        ActionTarget::Combatant(CombatantId(target)),
    )
    .with_base_damage(damage)
}

#[test]
fn chain_lightning_decays_per_hop() {
    let engine = CombatEngine::standard();
    let mut encounter = line_encounter();

    let events = engine
        .resolve_action(&mut encounter, CombatEnv::empty(), &attack(&["chain"], 100.0, 10))
        .unwrap();

    let damage: Vec<(u32, u32)> = events.iter().map(|e| (e.defender.0, e.final_damage)).collect();
    assert_eq!(damage, vec![(10, 100), (11, 70), (12, 49)]);
    assert!(events.iter().all(|e| !e.is_crit));
    assert_eq!(encounter.combatant(CombatantId(12)).unwrap().health.current, 451);
}

#[test]
fn chain_count_override_limits_hops() {
    let engine = CombatEngine::standard();
    let mut encounter = line_encounter();
    let request = attack(&["chain"], 100.0, 10).with_override(
        TagId::Chain,
        ParamKey::ChainCount,
        ParamValue::Number(1.0),
    );

    let events = engine
        .resolve_action(&mut encounter, CombatEnv::empty(), &request)
        .unwrap();
    assert_eq!(events.len(), 2);
}

#[test]
fn lightning_extends_chain_range_by_a_fifth() {
    let engine = CombatEngine::standard();
    let none = SourceOverrides::new();

    let range = |tags: &[&str]| match engine.resolve(tags, &none).geometry {
        Geometry::Chain { chain_range, .. } => chain_range,
        other => panic!("expected chain, got {other:?}"),
    };
    let plain = range(&["chain"]);
    let charged = range(&["chain", "lightning"]);
    assert_eq!(plain, 5.0);
    assert!((charged - plain * 1.2).abs() < 1e-5);
}

#[test]
fn higher_priority_geometry_wins_regardless_of_order() {
    let engine = CombatEngine::standard();
    let none = SourceOverrides::new();

    for tags in [["projectile", "circle"], ["circle", "projectile"]] {
        let spec = engine.resolve(&tags, &none);
        assert!(matches!(spec.geometry, Geometry::Circle { .. }), "{tags:?}");
    }
}

#[test]
fn resolving_twice_is_bit_identical() {
    let engine = CombatEngine::standard();
    let mut overrides = SourceOverrides::new();
    overrides
        .entry(TagId::Poison)
        .or_default()
        .insert(ParamKey::Magnitude, ParamValue::Number(3.3));
    let tags = ["splash", "fire", "burn", "poison", "shadow", "lifesteal", "on_crit"];

    let first = engine.resolve(&tags, &overrides);
    let second = engine.resolve(&tags, &overrides);
    assert_eq!(first, second);

    let bits = |spec: &combat_core::ResolvedEffectSpec| {
        spec.statuses
            .iter()
            .map(|s| (s.params.magnitude.to_bits(), s.params.duration.to_bits()))
            .collect::<Vec<_>>()
    };
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn empty_tag_list_is_a_plain_physical_hit() {
    let engine = CombatEngine::standard();
    let spec = engine.resolve::<&str>(&[], &SourceOverrides::new());
    assert_eq!(spec.geometry, Geometry::SingleTarget);
    assert_eq!(spec.damage_types, vec![DamageType::Physical]);
    assert!(spec.statuses.is_empty());

    let mut encounter = line_encounter();
    let events = engine
        .resolve_action(&mut encounter, CombatEnv::empty(), &attack(&[], 25.0, 11))
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].final_damage, 25);
}

#[test]
fn unknown_tags_are_ignored() {
    let engine = CombatEngine::standard();
    let spec = engine.resolve(&["fire", "definitely_not_a_tag", "FIRE"], &SourceOverrides::new());
    assert_eq!(spec.tags, vec![TagId::Fire]);
    assert_eq!(spec.damage_types, vec![DamageType::Fire]);
}

#[test]
fn defense_never_removes_more_than_three_quarters() {
    let engine = CombatEngine::standard();
    let mut encounter = Encounter::new(1);
    encounter.spawn(hero());
    let mut tank = foe(20, 1.0, 1_000);
    tank.attributes = Attributes {
        defense: 10_000,
        ..Attributes::default()
    };
    encounter.spawn(tank);

    let events = engine
        .resolve_action(&mut encounter, CombatEnv::empty(), &attack(&["physical"], 100.0, 20))
        .unwrap();
    assert_eq!(events[0].final_damage, 25);
}

#[test]
fn stun_stacks_diminish_and_cap_at_five() {
    let engine = CombatEngine::standard();
    let mut encounter = line_encounter();
    let target = CombatantId(10);

    for expected in 1..=5 {
        let report = engine
            .apply_status(&mut encounter, target, StatusKind::Stun, Some(HERO))
            .unwrap();
        assert_eq!(report.stacks, expected);
    }
    let sixth = engine
        .apply_status(&mut encounter, target, StatusKind::Stun, Some(HERO))
        .unwrap();
    assert_eq!(sixth.outcome, ApplyOutcome::Capped);
    assert_eq!(sixth.stacks, 5);

    let view = engine.query(&encounter, target, StatusKind::Stun).unwrap();
    assert_eq!(view.stacks, 5);
    // 1 + 0.5 + 0.25 + 0.125 + 0.0625
    assert!((view.magnitude - 1.9375).abs() < 1e-5);
    assert!(encounter.combatant(target).unwrap().is_stunned());
}

#[test]
fn poison_compounds_without_a_stack_cap() {
    let engine = CombatEngine::standard();
    let mut encounter = line_encounter();
    let target = CombatantId(11);

    for _ in 0..4 {
        engine.apply_status(&mut encounter, target, StatusKind::Poison, Some(HERO));
    }
    let view = engine.query(&encounter, target, StatusKind::Poison).unwrap();
    assert_eq!(view.stacks, 4);
    assert!((view.magnitude - 4.0 * 1.2f32.powi(3)).abs() < 1e-4);

    for _ in 0..8 {
        engine.apply_status(&mut encounter, target, StatusKind::Poison, Some(HERO));
    }
    let view = engine.query(&encounter, target, StatusKind::Poison).unwrap();
    assert_eq!(view.stacks, 12);
    assert!((view.magnitude - 4.0 * 1.2f32.powi(11)).abs() < 1e-3);
}

#[test]
fn poison_stacks_raise_damage_actually_dealt() {
    let engine = CombatEngine::standard();
    let mut encounter = Encounter::new(5);
    encounter.spawn(hero());
    for stacks in 1..=4u32 {
        let id = CombatantId(40 + stacks);
        encounter.spawn(foe(id.0, 2.0 * stacks as f32, 500));
        for _ in 0..stacks {
            engine.apply_status(&mut encounter, id, StatusKind::Poison, Some(HERO));
        }
    }

    // Five and a half seconds: five ticks on every target.
    for _ in 0..330 {
        engine.advance(&mut encounter, 1.0 / 60.0);
    }

    let events = encounter.drain_events();
    let dealt: Vec<u32> = (1..=4u32)
        .map(|stacks| {
            events
                .iter()
                .filter_map(|e| match e {
                    CombatEvent::StatusTick { target, amount, .. }
                        if *target == CombatantId(40 + stacks) =>
                    {
                        Some(*amount)
                    }
                    _ => None,
                })
                .sum()
        })
        .collect();

    for (stacks, &total) in (1..=4i32).zip(&dealt) {
        let expected = 5.0 * 4.0 * 1.2f32.powi(stacks - 1);
        assert!(
            (total as f32 - expected).abs() <= 1.0,
            "{stacks} stacks dealt {total}, expected about {expected}"
        );
    }
    assert!(dealt.windows(2).all(|pair| pair[0] < pair[1]), "{dealt:?}");
}

#[test]
fn burn_and_freeze_never_coexist() {
    let engine = CombatEngine::standard();
    let mut encounter = line_encounter();
    let target = CombatantId(12);
    let sequence = [
        StatusKind::Burn,
        StatusKind::Freeze,
        StatusKind::Burn,
        StatusKind::Burn,
        StatusKind::Freeze,
    ];

    for kind in sequence {
        engine.apply_status(&mut encounter, target, kind, Some(HERO));
        let combatant = encounter.combatant(target).unwrap();
        assert!(
            !(combatant.has_status(StatusKind::Burn) && combatant.has_status(StatusKind::Freeze)),
            "both active after applying {kind}"
        );
        assert!(combatant.has_status(kind), "last applied wins");
    }

    let conflicts = encounter
        .drain_events()
        .into_iter()
        .filter(|e| {
            matches!(
                e,
                CombatEvent::StatusRemoved {
                    reason: RemovalReason::Conflict,
                    ..
                }
            )
        })
        .count();
    assert_eq!(conflicts, 3);
}

#[test]
fn burn_ticks_and_kills_through_the_fixed_step_loop() {
    let engine = CombatEngine::standard();
    let mut encounter = Encounter::new(3);
    encounter.spawn(hero());
    encounter.spawn(foe(30, 2.0, 8));
    let target = CombatantId(30);
    engine.apply_status(&mut encounter, target, StatusKind::Burn, Some(HERO));

    // Two seconds of 60 fps frames: two 5-damage ticks.
    for _ in 0..120 {
        engine.advance(&mut encounter, 1.0 / 60.0);
    }

    let victim = encounter.combatant(target).unwrap();
    assert!(!victim.is_alive());
    assert!(victim.statuses().is_empty());

    let events = encounter.drain_events();
    let ticks: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::StatusTick { amount, source, .. } => {
                assert_eq!(*source, Some(HERO));
                Some(*amount)
            }
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![5, 3]);
    assert!(events.iter().any(|e| matches!(
        e,
        CombatEvent::Death { target: t, killer: Some(HERO), .. } if *t == target
    )));
}

#[test]
fn triggered_effects_do_not_trigger_again() {
    let echo = EffectDefinition::new("echo", ["on_hit"]).with_base_damage(10.0);

    let engine = CombatEngine::standard();
    let mut encounter = line_encounter();
    let request = attack(&[], 40.0, 10).with_triggered(echo.clone());
    let events = engine
        .resolve_action(&mut encounter, CombatEnv::empty(), &request)
        .unwrap();
    let damage: Vec<u32> = events.iter().map(|e| e.final_damage).collect();
    assert_eq!(damage, vec![40, 10]);

    let config = CombatConfig {
        trigger_depth: 0,
        ..CombatConfig::new()
    };
    let no_triggers = CombatEngine::new(Arc::new(TagRegistry::standard()), config);
    let mut encounter = line_encounter();
    let request = attack(&[], 40.0, 10).with_triggered(echo);
    let events = no_triggers
        .resolve_action(&mut encounter, CombatEnv::empty(), &request)
        .unwrap();
    assert_eq!(events.len(), 1);
}

#[test]
fn on_kill_trigger_bursts_around_the_corpse() {
    let engine = CombatEngine::standard();
    let mut encounter = Encounter::new(9);
    encounter.spawn(hero());
    encounter.spawn(foe(40, 3.0, 10));
    encounter.spawn(foe(41, 4.0, 100));
    let blast = EffectDefinition::new("corpse_blast", ["on_kill", "circle", "fire"])
        .with_base_damage(20.0);

    let events = engine
        .resolve_action(
            &mut encounter,
            CombatEnv::empty(),
            &attack(&[], 50.0, 40).with_triggered(blast),
        )
        .unwrap();

    let damage: Vec<(u32, u32)> = events.iter().map(|e| (e.defender.0, e.final_damage)).collect();
    assert_eq!(damage, vec![(40, 50), (41, 20)]);
    assert_eq!(events[1].damage_types, vec![DamageType::Fire]);
    assert_eq!(encounter.combatant(CombatantId(41)).unwrap().health.current, 80);
}

#[test]
fn target_killed_mid_action_is_skipped() {
    let engine = CombatEngine::standard();
    let mut encounter = Encounter::new(5);
    encounter.spawn(hero());
    encounter.spawn(foe(50, 2.0, 50));
    encounter.spawn(foe(51, 4.0, 50));
    let nova = EffectDefinition::new("nova", ["on_hit", "circle"]).with_base_damage(1_000.0);
    let aim = ActionTarget::Direction(Position::new(1.0, 0.0));
    let request = ActionRequest::new(HERO, ["pierce"], aim)
        .with_base_damage(10.0)
        .with_triggered(nova);

    let events = engine
        .resolve_action(&mut encounter, CombatEnv::empty(), &request)
        .unwrap();

    // The nova from the first pierce hit kills both; the second pierce hit
    // finds a corpse and is skipped.
    let hits: Vec<(u32, f32)> = events.iter().map(|e| (e.defender.0, e.base_damage)).collect();
    assert_eq!(hits, vec![(50, 10.0), (50, 1_000.0), (51, 1_000.0)]);
}

#[test]
fn same_seed_replays_identically() {
    let run = |seed: u64| {
        let engine = CombatEngine::standard();
        let mut encounter = Encounter::new(seed);
        let mut lucky = hero();
        lucky.attributes.luck = 50;
        encounter.spawn(lucky);
        encounter.spawn(foe(60, 2.0, 100_000));
        for _ in 0..32 {
            engine
                .resolve_action(
                    &mut encounter,
                    CombatEnv::empty(),
                    &attack(&["fire", "burn"], 10.0, 60),
                )
                .unwrap();
            engine.advance(&mut encounter, 0.25);
        }
        encounter.drain_events()
    };

    let first = run(77);
    assert_eq!(first, run(77));
    let crits = first
        .iter()
        .filter_map(CombatEvent::as_damage)
        .filter(|e| e.is_crit)
        .count();
    assert!(crits > 0 && crits < 32, "crit rolls look degenerate: {crits}");
}

#[test]
fn frozen_attacker_cannot_act() {
    let engine = CombatEngine::standard();
    let mut encounter = line_encounter();
    engine.apply_status(&mut encounter, HERO, StatusKind::Freeze, None);
    let hero = encounter.combatant(HERO).unwrap();
    assert!(hero.is_frozen() && hero.is_rooted() && hero.is_stunned());

    let result = engine.resolve_action(&mut encounter, CombatEnv::empty(), &attack(&[], 5.0, 10));
    assert!(result.is_err());

    // Freeze lasts two seconds.
    engine.advance(&mut encounter, 2.1);
    assert!(!encounter.combatant(HERO).unwrap().is_frozen());
    assert!(engine
        .resolve_action(&mut encounter, CombatEnv::empty(), &attack(&[], 5.0, 10))
        .is_ok());
}
