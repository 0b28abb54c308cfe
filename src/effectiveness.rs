// Combined effectiveness against a defending type pair and tier bucketing.
use crate::types::{multiplier, Multiplier, Type, ALL_TYPES, TYPE_COUNT};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("a defender has at most two types, got {0} distinct")]
    TooManyTypes(usize),
}

/// One or two defending types. Empty means "nothing selected" and acts as x1 everywhere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DefenderProfile {
    primary: Option<Type>,
    secondary: Option<Type>,
}

impl DefenderProfile {
    pub const fn none() -> Self {
        Self {
            primary: None,
            secondary: None,
        }
    }

    pub const fn single(t: Type) -> Self {
        Self {
            primary: Some(t),
            secondary: None,
        }
    }

    /// Equal types collapse into a single-typed profile.
    pub fn dual(first: Type, second: Type) -> Self {
        Self::from_selection(Some(first), Some(second))
    }

    /// Builds a profile from two optional selector slots.
    pub fn from_selection(first: Option<Type>, second: Option<Type>) -> Self {
        match (first, second) {
            (Some(a), Some(b)) if a == b => Self::single(a),
            (Some(a), b) => Self {
                primary: Some(a),
                secondary: b,
            },
            (None, b) => Self {
                primary: b,
                secondary: None,
            },
        }
    }

    /// Deduplicates in order; more than two distinct types is rejected.
    pub fn try_from_types(types: &[Type]) -> Result<Self, ProfileError> {
        let mut distinct: Vec<Type> = Vec::with_capacity(2);
        for t in types {
            if !distinct.contains(t) {
                distinct.push(*t);
            }
        }
        match distinct.as_slice() {
            [] => Ok(Self::none()),
            [a] => Ok(Self::single(*a)),
            [a, b] => Ok(Self::dual(*a, *b)),
            _ => Err(ProfileError::TooManyTypes(distinct.len())),
        }
    }

    pub fn primary(&self) -> Option<Type> {
        self.primary
    }

    pub fn secondary(&self) -> Option<Type> {
        self.secondary
    }

    pub fn types(&self) -> impl Iterator<Item = Type> {
        self.primary.into_iter().chain(self.secondary)
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none()
    }
}

impl TryFrom<&[Type]> for DefenderProfile {
    type Error = ProfileError;

    fn try_from(types: &[Type]) -> Result<Self, Self::Error> {
        Self::try_from_types(types)
    }
}

impl fmt::Display for DefenderProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.primary, self.secondary) {
            (None, _) => f.write_str("none"),
            (Some(a), None) => write!(f, "{a}"),
            (Some(a), Some(b)) => write!(f, "{a}/{b}"),
        }
    }
}

/// Combined multiplier of every attacking type against one profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MultiplierVector([Multiplier; TYPE_COUNT]);

impl MultiplierVector {
    pub fn get(&self, attacking: Type) -> Multiplier {
        self.0[attacking.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Type, Multiplier)> + '_ {
        ALL_TYPES.iter().map(move |t| (*t, self.0[t.index()]))
    }
}

impl Serialize for MultiplierVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(TYPE_COUNT))?;
        for (t, m) in self.iter() {
            map.serialize_entry(t.name(), &m)?;
        }
        map.end()
    }
}

pub fn compute_multipliers(profile: &DefenderProfile) -> MultiplierVector {
    let mut out = [Multiplier::NEUTRAL; TYPE_COUNT];
    for attacking in ALL_TYPES {
        out[attacking.index()] = profile
            .types()
            .fold(Multiplier::NEUTRAL, |acc, defending| {
                acc.stack(multiplier(attacking, defending))
            });
    }
    MultiplierVector(out)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EffectivenessTier {
    #[serde(rename = "x4")]
    Quadruple,
    #[serde(rename = "x2")]
    Double,
    #[serde(rename = "x1")]
    Neutral,
    #[serde(rename = "x05")]
    Half,
    #[serde(rename = "x025")]
    Quarter,
    #[serde(rename = "x0")]
    Immune,
}

/// Display order of the six tiers.
pub const ALL_TIERS: [EffectivenessTier; 6] = [
    EffectivenessTier::Quadruple,
    EffectivenessTier::Double,
    EffectivenessTier::Neutral,
    EffectivenessTier::Half,
    EffectivenessTier::Quarter,
    EffectivenessTier::Immune,
];

impl EffectivenessTier {
    /// Bucket for an arbitrary floating factor. First matching rule wins;
    /// the thresholds sit off the canonical values to absorb rounding.
    pub fn from_factor(value: f64) -> Self {
        if value == 0.0 {
            EffectivenessTier::Immune
        } else if value >= 3.9 {
            EffectivenessTier::Quadruple
        } else if value >= 1.9 {
            EffectivenessTier::Double
        } else if value <= 0.26 {
            EffectivenessTier::Quarter
        } else if value < 0.75 {
            EffectivenessTier::Half
        } else {
            EffectivenessTier::Neutral
        }
    }

    pub fn of(m: Multiplier) -> Self {
        match m {
            Multiplier::IMMUNE => EffectivenessTier::Immune,
            Multiplier::QUARTER => EffectivenessTier::Quarter,
            Multiplier::HALF => EffectivenessTier::Half,
            Multiplier::NEUTRAL => EffectivenessTier::Neutral,
            Multiplier::DOUBLE => EffectivenessTier::Double,
            Multiplier::QUADRUPLE => EffectivenessTier::Quadruple,
            other => Self::from_factor(other.as_f64()),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            EffectivenessTier::Quadruple => "x4",
            EffectivenessTier::Double => "x2",
            EffectivenessTier::Neutral => "x1",
            EffectivenessTier::Half => "x0.5",
            EffectivenessTier::Quarter => "x0.25",
            EffectivenessTier::Immune => "x0",
        }
    }

    pub fn is_weakness(self) -> bool {
        matches!(self, EffectivenessTier::Quadruple | EffectivenessTier::Double)
    }

    pub fn is_resistance(self) -> bool {
        matches!(
            self,
            EffectivenessTier::Half | EffectivenessTier::Quarter | EffectivenessTier::Immune
        )
    }

    fn slot(self) -> usize {
        match self {
            EffectivenessTier::Quadruple => 0,
            EffectivenessTier::Double => 1,
            EffectivenessTier::Neutral => 2,
            EffectivenessTier::Half => 3,
            EffectivenessTier::Quarter => 4,
            EffectivenessTier::Immune => 5,
        }
    }
}

/// Attacking types bucketed by tier, each bucket in canonical type order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tiers {
    buckets: [Vec<Type>; 6],
}

impl Tiers {
    pub fn get(&self, tier: EffectivenessTier) -> &[Type] {
        &self.buckets[tier.slot()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (EffectivenessTier, &[Type])> {
        ALL_TIERS.iter().map(move |t| (*t, self.get(*t)))
    }

    pub fn tier_of(&self, attacking: Type) -> Option<EffectivenessTier> {
        self.iter()
            .find(|(_, types)| types.contains(&attacking))
            .map(|(tier, _)| tier)
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for Tiers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ALL_TIERS.len()))?;
        for (tier, types) in self.iter() {
            map.serialize_entry(&tier, types)?;
        }
        map.end()
    }
}

pub fn classify(vector: &MultiplierVector) -> Tiers {
    let mut tiers = Tiers::default();
    for (attacking, m) in vector.iter() {
        tiers.buckets[EffectivenessTier::of(m).slot()].push(attacking);
    }
    tiers
}

pub fn matchup(profile: &DefenderProfile) -> (MultiplierVector, Tiers) {
    let vector = compute_multipliers(profile);
    let tiers = classify(&vector);
    (vector, tiers)
}
