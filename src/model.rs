// Payloads of the species/pokemon API. Only the fields the lookup reads are modelled.
use crate::types::Type;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesList {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedName {
    pub name: String,
    pub language: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Variety {
    pub is_default: bool,
    pub pokemon: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesDetail {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub names: Vec<LocalizedName>,
    #[serde(default)]
    pub varieties: Vec<Variety>,
}

impl SpeciesDetail {
    pub fn localized_name(&self, language: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|n| n.language.name == language)
            .map(|n| n.name.as_str())
    }

    /// Name of the default form, used to query the pokemon endpoint.
    pub fn default_pokemon(&self) -> Option<&str> {
        self.varieties
            .iter()
            .find(|v| v.is_default)
            .map(|v| v.pokemon.name.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    pub slot: u8,
    #[serde(rename = "type")]
    pub type_ref: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonDetail {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
}

impl PokemonDetail {
    /// Known types ordered by slot, plus the names that did not map to a [`Type`].
    pub fn known_types(&self) -> (Vec<Type>, Vec<String>) {
        let mut slots: Vec<&TypeSlot> = self.types.iter().collect();
        slots.sort_by_key(|s| s.slot);
        let mut known = Vec::new();
        let mut unknown = Vec::new();
        for slot in slots {
            match Type::from_api_name(&slot.type_ref.name) {
                Some(t) => known.push(t),
                None => unknown.push(slot.type_ref.name.clone()),
            }
        }
        (known, unknown)
    }
}
