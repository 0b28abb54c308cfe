use crate::effectiveness::{
    compute_multipliers, DefenderProfile, EffectivenessTier, MultiplierVector, ALL_TIERS,
};
use crate::types::{Type, ALL_TYPES, TYPE_COUNT};
use rayon::prelude::*;
use std::collections::HashMap;

/// Every distinct non-empty profile: singles in canonical order, then pairs `(i, j)` with `i < j`.
pub fn all_profiles() -> Vec<DefenderProfile> {
    let mut profiles: Vec<DefenderProfile> =
        ALL_TYPES.iter().map(|t| DefenderProfile::single(*t)).collect();
    for i in 0..TYPE_COUNT {
        for j in (i + 1)..TYPE_COUNT {
            profiles.push(DefenderProfile::dual(ALL_TYPES[i], ALL_TYPES[j]));
        }
    }
    profiles
}

pub struct MatrixRow {
    pub profile: DefenderProfile,
    pub multipliers: MultiplierVector,
}

pub fn compute_matrix() -> Vec<MatrixRow> {
    all_profiles()
        .into_par_iter()
        .map(|profile| MatrixRow {
            multipliers: compute_multipliers(&profile),
            profile,
        })
        .collect()
}

pub fn to_csv(rows: &[MatrixRow]) -> String {
    let mut out = String::from("defender");
    for t in ALL_TYPES {
        out.push(',');
        out.push_str(t.name());
    }
    for row in rows {
        out.push('\n');
        out.push_str(&row.profile.to_string());
        for (_, m) in row.multipliers.iter() {
            out.push(',');
            out.push_str(&m.to_string());
        }
    }
    out
}

pub fn write_csv(rows: &[MatrixRow], path: &std::path::Path) -> anyhow::Result<()> {
    std::fs::write(path, to_csv(rows))?;
    Ok(())
}

/// For each attacking type, how many profiles fall into each tier.
pub fn tier_histogram(rows: &[MatrixRow]) -> HashMap<Type, HashMap<EffectivenessTier, usize>> {
    let mut histogram: HashMap<Type, HashMap<EffectivenessTier, usize>> = ALL_TYPES
        .iter()
        .map(|t| (*t, ALL_TIERS.iter().map(|tier| (*tier, 0)).collect()))
        .collect();
    for row in rows {
        for (attacking, m) in row.multipliers.iter() {
            if let Some(counts) = histogram.get_mut(&attacking) {
                *counts.entry(EffectivenessTier::of(m)).or_insert(0) += 1;
            }
        }
    }
    histogram
}
