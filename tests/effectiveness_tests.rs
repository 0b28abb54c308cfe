use poke_types::effectiveness::ALL_TIERS;
use poke_types::types::multiplier;
use poke_types::{
    classify, compute_multipliers, matchup, DefenderProfile, EffectivenessTier, Multiplier, Type,
    ALL_TYPES,
};
use std::collections::HashSet;

fn pairs() -> impl Iterator<Item = (Type, Type)> {
    ALL_TYPES
        .iter()
        .flat_map(|a| ALL_TYPES.iter().map(move |b| (*a, *b)))
}

fn tier_of(profile: &DefenderProfile, attacking: Type) -> (f64, EffectivenessTier) {
    let (vector, tiers) = matchup(profile);
    let tier = tiers
        .tier_of(attacking)
        .expect("every attacking type is classified");
    (vector.get(attacking).as_f64(), tier)
}

#[test]
fn single_type_matches_chart() {
    for defending in ALL_TYPES {
        let vector = compute_multipliers(&DefenderProfile::single(defending));
        for attacking in ALL_TYPES {
            assert_eq!(vector.get(attacking), multiplier(attacking, defending));
        }
    }
}

#[test]
fn order_does_not_matter() {
    for (a, b) in pairs() {
        assert_eq!(
            compute_multipliers(&DefenderProfile::dual(a, b)),
            compute_multipliers(&DefenderProfile::dual(b, a)),
            "{a}/{b}"
        );
    }
}

#[test]
fn duplicate_types_collapse() {
    for t in ALL_TYPES {
        assert_eq!(
            compute_multipliers(&DefenderProfile::dual(t, t)),
            compute_multipliers(&DefenderProfile::single(t))
        );
        let from_slice = DefenderProfile::try_from_types(&[t, t]).unwrap();
        assert_eq!(from_slice, DefenderProfile::single(t));
    }
}

#[test]
fn immunity_dominates() {
    for (first, second) in pairs() {
        let vector = compute_multipliers(&DefenderProfile::dual(first, second));
        for attacking in ALL_TYPES {
            if multiplier(attacking, first).is_immune() {
                assert!(vector.get(attacking).is_immune(), "{attacking} vs {first}/{second}");
            }
        }
    }
}

#[test]
fn tiers_partition_all_attacking_types() {
    let mut profiles = vec![DefenderProfile::none()];
    profiles.extend(pairs().map(|(a, b)| DefenderProfile::dual(a, b)));
    for profile in profiles {
        let tiers = classify(&compute_multipliers(&profile));
        let mut seen = HashSet::new();
        for (_, types) in tiers.iter() {
            for t in types {
                assert!(seen.insert(*t), "{t} appears twice for {profile}");
            }
        }
        assert_eq!(seen.len(), ALL_TYPES.len());
        assert_eq!(tiers.len(), ALL_TYPES.len());
    }
}

#[test]
fn exact_and_threshold_classification_agree() {
    for (a, b) in pairs() {
        let vector = compute_multipliers(&DefenderProfile::dual(a, b));
        let tiers = classify(&vector);
        for (attacking, m) in vector.iter() {
            assert_eq!(
                tiers.tier_of(attacking),
                Some(EffectivenessTier::from_factor(m.as_f64()))
            );
        }
    }
}

#[test]
fn tiers_keep_canonical_order() {
    for (a, b) in pairs() {
        let (_, tiers) = matchup(&DefenderProfile::dual(a, b));
        for tier in ALL_TIERS {
            let positions: Vec<usize> = tiers.get(tier).iter().map(|t| t.index()).collect();
            let mut sorted = positions.clone();
            sorted.sort_unstable();
            assert_eq!(positions, sorted);
        }
    }
}

#[test]
fn water_defender() {
    let water = DefenderProfile::single(Type::Water);
    assert_eq!(tier_of(&water, Type::Electric), (2.0, EffectivenessTier::Double));
    assert_eq!(tier_of(&water, Type::Fire), (0.5, EffectivenessTier::Half));
    // Ground is neutral on water itself; the x2 belongs to water attacking ground.
    assert_eq!(tier_of(&water, Type::Grass), (2.0, EffectivenessTier::Double));
    assert_eq!(tier_of(&water, Type::Ground), (1.0, EffectivenessTier::Neutral));
}

#[test]
fn ground_flying_is_immune_to_electric() {
    let profile = DefenderProfile::dual(Type::Ground, Type::Flying);
    assert_eq!(tier_of(&profile, Type::Electric), (0.0, EffectivenessTier::Immune));
}

#[test]
fn dragon_steel_takes_neutral_dragon() {
    let profile = DefenderProfile::dual(Type::Dragon, Type::Steel);
    assert_eq!(tier_of(&profile, Type::Dragon), (1.0, EffectivenessTier::Neutral));
}

#[test]
fn fire_flying_takes_quadruple_rock() {
    let profile = DefenderProfile::dual(Type::Fire, Type::Flying);
    assert_eq!(tier_of(&profile, Type::Rock), (4.0, EffectivenessTier::Quadruple));
    let (_, tiers) = matchup(&profile);
    assert_eq!(tiers.get(EffectivenessTier::Quadruple), &[Type::Rock]);
    assert_eq!(tiers.get(EffectivenessTier::Quarter), &[Type::Grass, Type::Bug]);
    assert_eq!(tiers.get(EffectivenessTier::Immune), &[Type::Ground]);
}

#[test]
fn degenerate_duplicate_equals_single() {
    let doubled = matchup(&DefenderProfile::dual(Type::Water, Type::Water));
    let single = matchup(&DefenderProfile::single(Type::Water));
    assert_eq!(doubled, single);
}

#[test]
fn weakness_and_resistance_cancel() {
    // grass attacking water/ground: 2 x 2 = 4; electric: 2 x 0 = 0
    let swampert = DefenderProfile::dual(Type::Water, Type::Ground);
    let (vector, tiers) = matchup(&swampert);
    assert_eq!(vector.get(Type::Grass), Multiplier::QUADRUPLE);
    assert_eq!(vector.get(Type::Electric), Multiplier::IMMUNE);
    assert_eq!(tiers.get(EffectivenessTier::Quadruple), &[Type::Grass]);
    // ice vs water/ground: 0.5 x 2 = 1
    assert_eq!(vector.get(Type::Ice), Multiplier::NEUTRAL);
    // fire vs water/ground: 0.5 x 1 = 0.5
    assert_eq!(vector.get(Type::Fire), Multiplier::HALF);
}

#[test]
fn three_distinct_types_are_rejected() {
    assert!(DefenderProfile::try_from_types(&[Type::Bug, Type::Steel, Type::Fairy]).is_err());
}
