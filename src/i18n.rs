// Localized type labels and report headings.
use crate::normalize::normalize;
use crate::types::{Type, ALL_TYPES};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            other => anyhow::bail!("Unknown language {other} (use en or fr)"),
        }
    }
}

#[derive(Deserialize)]
struct LanguagePack {
    types: HashMap<String, String>,
    labels: HashMap<String, String>,
}

static TRANSLATIONS: Lazy<HashMap<String, LanguagePack>> = Lazy::new(|| {
    let json_str = include_str!("../translations/types.json");
    serde_json::from_str(json_str).expect("Failed to parse translations/types.json")
});

// normalized label (any language) -> type
static LABEL_INDEX: Lazy<HashMap<String, Type>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for pack in TRANSLATIONS.values() {
        for (api_name, label) in &pack.types {
            if let Some(t) = Type::from_api_name(api_name) {
                index.insert(normalize(label), t);
            }
        }
    }
    for t in ALL_TYPES {
        index.insert(t.name().to_string(), t);
    }
    index
});

fn pack(lang: Language) -> Option<&'static LanguagePack> {
    TRANSLATIONS.get(lang.code())
}

pub fn translate_type(t: Type, lang: Language) -> String {
    pack(lang)
        .and_then(|p| p.types.get(t.name()))
        .cloned()
        .unwrap_or_else(|| t.name().to_string())
}

pub fn label(key: &str, lang: Language) -> String {
    pack(lang)
        .and_then(|p| p.labels.get(key))
        .cloned()
        .unwrap_or_else(|| key.to_string())
}

pub fn type_from_label(text: &str) -> Option<Type> {
    LABEL_INDEX.get(&normalize(text)).copied()
}
