// Single-type chart for the 18 modern types (Gen 6+ values).
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const TYPE_COUNT: usize = 18;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    Normal,
    Fire,
    Water,
    Grass,
    Electric,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

/// Every type in canonical order. Output ordering everywhere follows this array.
pub const ALL_TYPES: [Type; TYPE_COUNT] = [
    Type::Normal,
    Type::Fire,
    Type::Water,
    Type::Grass,
    Type::Electric,
    Type::Ice,
    Type::Fighting,
    Type::Poison,
    Type::Ground,
    Type::Flying,
    Type::Psychic,
    Type::Bug,
    Type::Rock,
    Type::Ghost,
    Type::Dragon,
    Type::Dark,
    Type::Steel,
    Type::Fairy,
];

static TYPE_NAMES: phf::Map<&'static str, Type> = phf::phf_map! {
    "normal" => Type::Normal,
    "fire" => Type::Fire,
    "water" => Type::Water,
    "grass" => Type::Grass,
    "electric" => Type::Electric,
    "ice" => Type::Ice,
    "fighting" => Type::Fighting,
    "poison" => Type::Poison,
    "ground" => Type::Ground,
    "flying" => Type::Flying,
    "psychic" => Type::Psychic,
    "bug" => Type::Bug,
    "rock" => Type::Rock,
    "ghost" => Type::Ghost,
    "dragon" => Type::Dragon,
    "dark" => Type::Dark,
    "steel" => Type::Steel,
    "fairy" => Type::Fairy,
};

impl Type {
    /// Position in [`ALL_TYPES`]; used to address the chart.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Type::Normal => "normal",
            Type::Fire => "fire",
            Type::Water => "water",
            Type::Grass => "grass",
            Type::Electric => "electric",
            Type::Ice => "ice",
            Type::Fighting => "fighting",
            Type::Poison => "poison",
            Type::Ground => "ground",
            Type::Flying => "flying",
            Type::Psychic => "psychic",
            Type::Bug => "bug",
            Type::Rock => "rock",
            Type::Ghost => "ghost",
            Type::Dragon => "dragon",
            Type::Dark => "dark",
            Type::Steel => "steel",
            Type::Fairy => "fairy",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Type::Normal => "#A8A77A",
            Type::Fire => "#EE8130",
            Type::Water => "#6390F0",
            Type::Grass => "#7AC74C",
            Type::Electric => "#F7D02C",
            Type::Ice => "#96D9D6",
            Type::Fighting => "#C22E28",
            Type::Poison => "#A33EA1",
            Type::Ground => "#E2BF65",
            Type::Flying => "#A98FF3",
            Type::Psychic => "#F95587",
            Type::Bug => "#A6B91A",
            Type::Rock => "#B6A136",
            Type::Ghost => "#735797",
            Type::Dragon => "#6F35FC",
            Type::Dark => "#705746",
            Type::Steel => "#B7B7CE",
            Type::Fairy => "#D685AD",
        }
    }

    /// Strict lookup of an API name, ignoring ASCII case and surrounding whitespace.
    pub fn from_api_name(name: &str) -> Option<Type> {
        TYPE_NAMES
            .get(name.trim().to_ascii_lowercase().as_str())
            .copied()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown type '{0}'")]
pub struct ParseTypeError(pub String);

impl FromStr for Type {
    type Err = ParseTypeError;

    /// Accepts API names and any localized label (`"Électrik"`, `"feu"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Type::from_api_name(s)
            .or_else(|| crate::i18n::type_from_label(s))
            .ok_or_else(|| ParseTypeError(s.to_string()))
    }
}

/// Damage multiplier stored exactly, in quarter units (4 == x1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Multiplier(u8);

impl Multiplier {
    pub const IMMUNE: Multiplier = Multiplier(0);
    pub const QUARTER: Multiplier = Multiplier(1);
    pub const HALF: Multiplier = Multiplier(2);
    pub const NEUTRAL: Multiplier = Multiplier(4);
    pub const DOUBLE: Multiplier = Multiplier(8);
    pub const QUADRUPLE: Multiplier = Multiplier(16);

    pub const fn from_quarters(quarters: u8) -> Self {
        Multiplier(quarters)
    }

    pub const fn quarters(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 4.0
    }

    /// Multiplies two factors. Exact for any product of two chart entries;
    /// a non-zero product below a quarter is kept at a quarter, never zero.
    pub fn stack(self, other: Multiplier) -> Multiplier {
        if self.is_immune() || other.is_immune() {
            return Multiplier::IMMUNE;
        }
        let product = (u16::from(self.0) * u16::from(other.0) / 4).max(1);
        Multiplier(product.min(u16::from(u8::MAX)) as u8)
    }

    pub fn is_immune(self) -> bool {
        self.0 == 0
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Multiplier::NEUTRAL
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_f64())
    }
}

impl Serialize for Multiplier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

type Chart = [[Multiplier; TYPE_COUNT]; TYPE_COUNT];

static CHART: Lazy<Chart> = Lazy::new(|| {
    let mut chart = [[Multiplier::NEUTRAL; TYPE_COUNT]; TYPE_COUNT];
    for attacking in ALL_TYPES {
        for defending in ALL_TYPES {
            chart[attacking.index()][defending.index()] =
                single_type_effectiveness(attacking, defending);
        }
    }
    chart
});

/// Multiplier of an `attacking` move against a single `defending` type.
pub fn multiplier(attacking: Type, defending: Type) -> Multiplier {
    CHART[attacking.index()][defending.index()]
}

pub fn chart() -> &'static Chart {
    &CHART
}

fn single_type_effectiveness(attacking: Type, defending: Type) -> Multiplier {
    use Type::*;
    const HALF: Multiplier = Multiplier::HALF;
    const DOUBLE: Multiplier = Multiplier::DOUBLE;
    const IMMUNE: Multiplier = Multiplier::IMMUNE;
    const NEUTRAL: Multiplier = Multiplier::NEUTRAL;
    match attacking {
        Normal => match defending {
            Rock | Steel => HALF,
            Ghost => IMMUNE,
            _ => NEUTRAL,
        },
        Fire => match defending {
            Fire | Water | Rock | Dragon => HALF,
            Grass | Ice | Bug | Steel => DOUBLE,
            _ => NEUTRAL,
        },
        Water => match defending {
            Water | Grass | Dragon => HALF,
            Fire | Ground | Rock => DOUBLE,
            _ => NEUTRAL,
        },
        Electric => match defending {
            Electric | Grass | Dragon => HALF,
            Water | Flying => DOUBLE,
            Ground => IMMUNE,
            _ => NEUTRAL,
        },
        Grass => match defending {
            Fire | Grass | Poison | Flying | Bug | Dragon | Steel => HALF,
            Water | Ground | Rock => DOUBLE,
            _ => NEUTRAL,
        },
        Ice => match defending {
            Fire | Water | Ice | Steel => HALF,
            Grass | Ground | Flying | Dragon => DOUBLE,
            _ => NEUTRAL,
        },
        Fighting => match defending {
            Normal | Ice | Rock | Dark | Steel => DOUBLE,
            Poison | Flying | Psychic | Bug | Fairy => HALF,
            Ghost => IMMUNE,
            _ => NEUTRAL,
        },
        Poison => match defending {
            Grass | Fairy => DOUBLE,
            Poison | Ground | Rock | Ghost => HALF,
            Steel => IMMUNE,
            _ => NEUTRAL,
        },
        Ground => match defending {
            Fire | Electric | Poison | Rock | Steel => DOUBLE,
            Grass | Bug => HALF,
            Flying => IMMUNE,
            _ => NEUTRAL,
        },
        Flying => match defending {
            Grass | Fighting | Bug => DOUBLE,
            Electric | Rock | Steel => HALF,
            _ => NEUTRAL,
        },
        Psychic => match defending {
            Fighting | Poison => DOUBLE,
            Psychic | Steel => HALF,
            Dark => IMMUNE,
            _ => NEUTRAL,
        },
        Bug => match defending {
            Grass | Psychic | Dark => DOUBLE,
            Fire | Fighting | Poison | Flying | Ghost | Steel | Fairy => HALF,
            _ => NEUTRAL,
        },
        Rock => match defending {
            Fire | Ice | Flying | Bug => DOUBLE,
            Fighting | Ground | Steel => HALF,
            _ => NEUTRAL,
        },
        Ghost => match defending {
            Ghost | Psychic => DOUBLE,
            Dark => HALF,
            Normal => IMMUNE,
            _ => NEUTRAL,
        },
        Dragon => match defending {
            Dragon => DOUBLE,
            Steel => HALF,
            Fairy => IMMUNE,
            _ => NEUTRAL,
        },
        Dark => match defending {
            Psychic | Ghost => DOUBLE,
            Fighting | Dark | Fairy => HALF,
            _ => NEUTRAL,
        },
        Steel => match defending {
            Rock | Ice | Fairy => DOUBLE,
            Fire | Water | Electric | Steel => HALF,
            _ => NEUTRAL,
        },
        Fairy => match defending {
            Fighting | Dragon | Dark => DOUBLE,
            Fire | Poison | Steel => HALF,
            _ => NEUTRAL,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(value: Multiplier) -> usize {
        chart()
            .iter()
            .flat_map(|row| row.iter())
            .filter(|m| **m == value)
            .count()
    }

    #[test]
    fn chart_entry_counts_match_canonical_table() {
        assert_eq!(count(Multiplier::IMMUNE), 8);
        assert_eq!(count(Multiplier::DOUBLE), 51);
        assert_eq!(count(Multiplier::HALF), 61);
        assert_eq!(count(Multiplier::NEUTRAL), 324 - 8 - 51 - 61);
    }

    #[test]
    fn known_immunities() {
        let immunities = [
            (Type::Normal, Type::Ghost),
            (Type::Fighting, Type::Ghost),
            (Type::Ghost, Type::Normal),
            (Type::Electric, Type::Ground),
            (Type::Ground, Type::Flying),
            (Type::Poison, Type::Steel),
            (Type::Psychic, Type::Dark),
            (Type::Dragon, Type::Fairy),
        ];
        for (atk, def) in immunities {
            assert!(multiplier(atk, def).is_immune(), "{atk} vs {def}");
        }
    }

    #[test]
    fn chart_is_attacker_first() {
        assert_eq!(multiplier(Type::Fire, Type::Grass), Multiplier::DOUBLE);
        assert_eq!(multiplier(Type::Grass, Type::Fire), Multiplier::HALF);
        assert_eq!(multiplier(Type::Ground, Type::Flying), Multiplier::IMMUNE);
        assert_eq!(multiplier(Type::Flying, Type::Ground), Multiplier::NEUTRAL);
    }

    #[test]
    fn all_types_order_matches_index() {
        for (idx, t) in ALL_TYPES.iter().enumerate() {
            assert_eq!(t.index(), idx);
            assert_eq!(Type::from_api_name(t.name()), Some(*t));
        }
    }

    #[test]
    fn parses_api_and_localized_names() {
        assert_eq!("Electric".parse::<Type>(), Ok(Type::Electric));
        assert_eq!(" steel ".parse::<Type>(), Ok(Type::Steel));
        assert_eq!("Électrik".parse::<Type>(), Ok(Type::Electric));
        assert_eq!("tenebres".parse::<Type>(), Ok(Type::Dark));
        assert_eq!("Fée".parse::<Type>(), Ok(Type::Fairy));
        assert!("stellar".parse::<Type>().is_err());
    }

    #[test]
    fn multiplier_stacking_is_exact() {
        assert_eq!(Multiplier::DOUBLE.stack(Multiplier::DOUBLE), Multiplier::QUADRUPLE);
        assert_eq!(Multiplier::HALF.stack(Multiplier::HALF), Multiplier::QUARTER);
        assert_eq!(Multiplier::DOUBLE.stack(Multiplier::HALF), Multiplier::NEUTRAL);
        assert_eq!(Multiplier::IMMUNE.stack(Multiplier::DOUBLE), Multiplier::IMMUNE);
        assert_eq!(Multiplier::QUARTER.to_string(), "0.25");
        assert_eq!(Multiplier::QUADRUPLE.to_string(), "4");
    }

    #[test]
    fn tiny_products_are_not_immune() {
        let tiny = Multiplier::QUARTER.stack(Multiplier::HALF);
        assert!(!tiny.is_immune());
        assert_eq!(tiny, Multiplier::QUARTER);
        assert!(Multiplier::QUARTER.stack(Multiplier::IMMUNE).is_immune());
    }
}
