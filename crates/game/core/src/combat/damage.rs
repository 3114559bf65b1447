//! Damage calculation.

use crate::config::CombatConfig;
use crate::env::{CombatEnv, HandType, RollContext, compute_seed};
use crate::state::Combatant;
use crate::tags::{ResolvedEffectSpec, SpecialEffect};

use super::crit::{crit_chance, roll_crit};

// ============================================================================
// Damage Type
// ============================================================================

/// Damage type carried by hits and damage-over-time ticks.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageType {
    /// Physical damage (melee, projectiles, bleeding).
    Physical,
    Fire,
    Frost,
    Lightning,
    /// Only dealt by the poison status.
    Poison,
    Arcane,
    Shadow,
    Holy,
}

// ============================================================================
// Damage Calculation
// ============================================================================

/// Collaborators and per-action state needed by [`compute_damage`].
#[derive(Clone, Copy, Debug)]
pub struct DamageContext<'a> {
    pub env: CombatEnv<'a>,
    pub config: &'a CombatConfig,
    pub encounter_seed: u64,
    pub nonce: u64,
}

/// Multiplier applied by every stage, for logging and tests.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageBreakdown {
    pub base: f32,
    pub hand: f32,
    pub strength: f32,
    pub buff: f32,
    pub affinity: f32,
    pub title: f32,
    pub specials: f32,
    pub crit_chance: f32,
    pub crit: f32,
    pub damage_taken: f32,
    pub defense_reduction: f32,
    /// Pre-floor total.
    pub total: f32,
}

/// Final integer damage of one hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageRoll {
    pub amount: u32,
    pub is_crit: bool,
    pub breakdown: DamageBreakdown,
}

/// Computes the damage of one hit.
///
/// # Formula
///
/// ```text
/// total = base
///       × hand        (two-handed 1.2, versatile with free off-hand 1.1)
///       × strength    (1 + STR × 0.05)
///       × buff        (attacker damage-dealt multiplier)
///       × affinity    (1 + min(shared class tags × 0.05, 0.20))
///       × title       (progression collaborator)
///       × specials    (crushing, execute)
///       × crit        (2.0 on a successful roll)
///       × taken       (defender damage-taken multiplier)
///       × (1 - min(defense × 0.01, 0.75) × (1 - armor_breaker))
/// amount = floor(max(total, 0))
/// ```
///
/// Missing equipment data is logged and treated as absent; it never aborts
/// the hit.
pub fn compute_damage(
    attacker: &Combatant,
    defender: &Combatant,
    base_damage: f32,
    spec: &ResolvedEffectSpec,
    ctx: &DamageContext<'_>,
) -> DamageRoll {
    let config = ctx.config;
    let base = base_damage.max(0.0);

    // 1. Grip
    let weapon = ctx.env.weapon_of(attacker).unwrap_or_else(|err| {
        tracing::warn!("weapon lookup for {} failed: {}", attacker.id, err);
        None
    });
    let hand = match weapon.map(|w| w.hand) {
        Some(HandType::TwoHanded) => 1.0 + config.two_handed_bonus,
        Some(HandType::Versatile) if attacker.loadout.off_hand.is_none() => {
            1.0 + config.versatile_bonus
        }
        _ => 1.0,
    };

    // 2. Strength
    let strength =
        (1.0 + attacker.attributes.strength as f32 * config.strength_per_point).max(0.0);

    // 3. Buffs on the attacker
    let buff = attacker.damage_dealt_multiplier();

    // 4. Class affinity
    let overlap = spec
        .tags
        .iter()
        .filter(|tag| attacker.class_tags.contains(tag))
        .count();
    let affinity =
        1.0 + (overlap as f32 * config.class_affinity_per_tag).min(config.class_affinity_cap);

    // 5. Titles
    let title = ctx.env.progression().title_multiplier(attacker.id);

    // 6. Specials
    let armor = ctx.env.armor_defense(defender).unwrap_or_else(|err| {
        tracing::warn!("armor lookup for {} failed: {}", defender.id, err);
        0
    });
    let defense = (defender.attributes.defense.saturating_add(armor)).max(0) as f32;
    let mut specials = 1.0;
    let mut ignore_fraction = 0.0f32;
    for special in &spec.specials {
        match *special {
            SpecialEffect::Crushing { threshold, bonus } if defense > threshold => {
                specials *= 1.0 + bonus;
            }
            SpecialEffect::Execute { threshold, bonus }
                if defender.health.fraction() < threshold =>
            {
                specials *= 1.0 + bonus;
            }
            SpecialEffect::ArmorBreaker {
                ignore_fraction: fraction,
            } => ignore_fraction = ignore_fraction.max(fraction),
            _ => {}
        }
    }

    // 7. Critical roll
    let chance = crit_chance(attacker, spec, config);
    let seed = compute_seed(
        ctx.encounter_seed,
        ctx.nonce,
        attacker.id,
        RollContext::Crit {
            target: defender.id,
        },
    );
    let is_crit = roll_crit(ctx.env.rng(), seed, chance);
    let crit = if is_crit { config.crit_multiplier } else { 1.0 };

    // 8. Vulnerability on the defender
    let damage_taken = defender.damage_taken_multiplier();

    // 9. Defense, always last
    let defense_reduction =
        config.defense_reduction(defense) * (1.0 - ignore_fraction.clamp(0.0, 1.0));
    debug_assert!(defense_reduction <= CombatConfig::DEFENSE_REDUCTION_CAP);

    let total = base
        * hand
        * strength
        * buff
        * affinity
        * title
        * specials
        * crit
        * damage_taken
        * (1.0 - defense_reduction);

    let breakdown = DamageBreakdown {
        base,
        hand,
        strength,
        buff,
        affinity,
        title,
        specials,
        crit_chance: chance,
        crit,
        damage_taken,
        defense_reduction,
        total,
    };
    tracing::trace!("{} -> {}: {:?}", attacker.id, defender.id, breakdown);

    DamageRoll {
        amount: floor_amount(total),
        is_crit,
        breakdown,
    }
}

/// Floors a non-negative amount to an integer.
///
/// A small tolerance keeps compounded float products such as
/// `100 × 0.7 × 0.7 = 48.99998` from losing a whole point.
pub fn floor_amount(value: f32) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value + FLOOR_TOLERANCE).floor() as u32
}

const FLOOR_TOLERANCE: f32 = 1e-3;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{
        ArmorDefinition, EquipmentCatalog, ItemId, RngOracle, TitleTable, WeaponDefinition,
    };
    use crate::state::{Attributes, CombatantId, Loadout, Position, Team};
    use crate::tags::TagId;

    struct FixedRng(u32);

    impl RngOracle for FixedRng {
        fn next_u32(&self, _seed: u64) -> u32 {
            self.0
        }
    }

    fn combatant(id: u32, attributes: Attributes) -> Combatant {
        Combatant::new(CombatantId(id), Team(id as u8), Position::ORIGIN, attributes, 100)
    }

    fn roll(attacker: &Combatant, defender: &Combatant, spec: &ResolvedEffectSpec) -> DamageRoll {
        let config = CombatConfig::new();
        let ctx = DamageContext {
            env: CombatEnv::empty(),
            config: &config,
            encounter_seed: 1,
            nonce: 1,
        };
        compute_damage(attacker, defender, 100.0, spec, &ctx)
    }

    #[test]
    fn neutral_hit_deals_base_damage() {
        let a = combatant(1, Attributes::default());
        let d = combatant(2, Attributes::default());
        let result = roll(&a, &d, &ResolvedEffectSpec::default());
        assert_eq!(result.amount, 100);
        assert!(!result.is_crit);
    }

    #[test]
    fn strength_and_defense() {
        let a = combatant(1, Attributes::new(10, 0, 0, 0, 0, 0));
        let d = combatant(2, Attributes::new(0, 20, 0, 0, 0, 0));
        // 100 × 1.5 × 0.8
        assert_eq!(roll(&a, &d, &ResolvedEffectSpec::default()).amount, 120);
    }

    #[test]
    fn defense_reduction_never_exceeds_cap() {
        let a = combatant(1, Attributes::default());
        for defense in [0, 10, 50, 75, 76, 100, 500, 10_000] {
            let d = combatant(2, Attributes::new(0, defense, 0, 0, 0, 0));
            let result = roll(&a, &d, &ResolvedEffectSpec::default());
            assert!(result.breakdown.defense_reduction <= 0.75);
            assert!(result.amount >= 25, "defense {defense}");
        }
    }

    #[test]
    fn specials_modify_damage() {
        let a = combatant(1, Attributes::default());
        let mut d = combatant(2, Attributes::new(0, 40, 0, 0, 0, 0));
        let spec = ResolvedEffectSpec {
            specials: vec![
                SpecialEffect::Crushing {
                    threshold: 20.0,
                    bonus: 0.25,
                },
                SpecialEffect::ArmorBreaker {
                    ignore_fraction: 0.25,
                },
                SpecialEffect::Execute {
                    threshold: 0.2,
                    bonus: 0.5,
                },
            ],
            ..ResolvedEffectSpec::default()
        };
        // 100 × 1.25 × (1 - 0.4 × 0.75)
        assert_eq!(roll(&a, &d, &spec).amount, 87);
        d.take_damage(90);
        // + execute ×1.5
        assert_eq!(roll(&a, &d, &spec).amount, 131);
    }

    #[test]
    fn full_luck_always_crits() {
        let a = combatant(1, Attributes::new(0, 0, 0, 150, 0, 0));
        let d = combatant(2, Attributes::default());
        let result = roll(&a, &d, &ResolvedEffectSpec::default());
        assert!(result.is_crit);
        assert_eq!(result.amount, 200);
    }

    #[test]
    fn crit_roll_uses_rng_oracle() {
        let config = CombatConfig::new();
        let rng = FixedRng(0);
        let ctx = DamageContext {
            env: CombatEnv::empty().with_rng(&rng),
            config: &config,
            encounter_seed: 0,
            nonce: 0,
        };
        let a = combatant(1, Attributes::new(0, 0, 0, 5, 0, 0));
        let d = combatant(2, Attributes::default());
        let result = compute_damage(&a, &d, 10.0, &ResolvedEffectSpec::default(), &ctx);
        assert!(result.is_crit);
        assert_eq!(result.amount, 20);
    }

    #[test]
    fn affinity_is_capped() {
        let a = combatant(1, Attributes::default()).with_class_tags([
            TagId::Fire,
            TagId::Burn,
            TagId::Splash,
            TagId::Empower,
            TagId::Haste,
        ]);
        let d = combatant(2, Attributes::default());
        let spec = ResolvedEffectSpec {
            tags: vec![
                TagId::Fire,
                TagId::Burn,
                TagId::Splash,
                TagId::Empower,
                TagId::Haste,
            ],
            ..ResolvedEffectSpec::default()
        };
        let result = roll(&a, &d, &spec);
        assert!((result.breakdown.affinity - 1.20).abs() < 1e-6);
        assert_eq!(result.amount, 120);
    }

    #[test]
    fn equipment_and_titles() {
        let config = CombatConfig::new();
        let catalog = EquipmentCatalog::new()
            .with_weapon(WeaponDefinition {
                id: ItemId(1),
                name: "greatsword".into(),
                hand: HandType::TwoHanded,
                damage: 20.0,
                tags: Vec::new(),
                enchantments: Vec::new(),
            })
            .with_armor(ArmorDefinition {
                id: ItemId(10),
                name: "plate".into(),
                defense: 50,
            });
        let titles = TitleTable::new().with(CombatantId(1), 1.5);
        let ctx = DamageContext {
            env: CombatEnv::empty()
                .with_equipment(&catalog)
                .with_progression(&titles),
            config: &config,
            encounter_seed: 1,
            nonce: 1,
        };
        let a = combatant(1, Attributes::default()).with_loadout(Loadout {
            weapon: Some(ItemId(1)),
            ..Loadout::default()
        });
        let d = combatant(2, Attributes::default()).with_loadout(Loadout {
            armor: vec![ItemId(10)],
            ..Loadout::default()
        });
        let result = compute_damage(&a, &d, 100.0, &ResolvedEffectSpec::default(), &ctx);
        // 100 × 1.2 × 1.5 × 0.5
        assert_eq!(result.amount, 90);
    }

    #[test]
    fn missing_equipment_store_is_not_fatal() {
        let a = combatant(1, Attributes::default()).with_loadout(Loadout {
            weapon: Some(ItemId(7)),
            ..Loadout::default()
        });
        let d = combatant(2, Attributes::default());
        assert_eq!(roll(&a, &d, &ResolvedEffectSpec::default()).amount, 100);
    }

    #[test]
    fn floor_tolerates_float_noise() {
        assert_eq!(floor_amount(48.99998), 49);
        assert_eq!(floor_amount(48.9), 48);
        assert_eq!(floor_amount(-3.0), 0);
        assert_eq!(floor_amount(f32::NAN), 0);
    }
}
