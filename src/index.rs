// Localized-name index over every species.
use crate::config::LookupConfig;
use crate::model::SpeciesDetail;
use crate::normalize::normalize;
use crate::pokeapi::{LookupError, SpeciesSource};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    /// Name in the index language (`Dracaufeu`).
    pub localized: String,
    /// API name of the default form (`charizard`).
    pub english: String,
    pub id: u32,
    #[serde(skip)]
    key: String,
}

impl IndexEntry {
    pub fn new(localized: impl Into<String>, english: impl Into<String>, id: u32) -> Self {
        let localized = localized.into();
        let key = normalize(&localized);
        Self {
            localized,
            english: english.into(),
            id,
            key,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    entries: Vec<IndexEntry>,
}

impl NameIndex {
    /// Keeps species that have a name in `language`, a default form and an id.
    pub fn from_details<I>(details: I, language: &str) -> Self
    where
        I: IntoIterator<Item = SpeciesDetail>,
    {
        let entries = details
            .into_iter()
            .filter_map(|d| {
                let localized = d.localized_name(language)?;
                let english = d.default_pokemon()?;
                if d.id == 0 {
                    return None;
                }
                Some(IndexEntry::new(localized, english, d.id))
            })
            .collect();
        Self::from_entries(entries)
    }

    pub fn from_entries(mut entries: Vec<IndexEntry>) -> Self {
        entries.sort_by(|a, b| a.key.cmp(&b.key).then(a.id.cmp(&b.id)));
        Self { entries }
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&IndexEntry> {
        let key = normalize(name);
        self.entries.iter().find(|e| e.key == key)
    }

    /// Entries whose normalized name contains the normalized query.
    pub fn suggestions(&self, query: &str, min_len: usize, limit: usize) -> Vec<&IndexEntry> {
        let q = normalize(query);
        if q.chars().count() < min_len {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| e.key.contains(q.as_str()))
            .take(limit)
            .collect()
    }
}

/// Fetches every species with bounded concurrency. Species that fail or are
/// missing are skipped.
pub async fn build_index(
    source: &dyn SpeciesSource,
    config: &LookupConfig,
    cancel: &CancellationToken,
) -> Result<NameIndex, LookupError> {
    let started = Instant::now();
    let build = async {
        let refs = source.species_list().await?;
        let details: Vec<SpeciesDetail> = stream::iter(refs.iter())
            .map(|r| async move {
                match source.species(r).await {
                    Ok(detail) => detail,
                    Err(e) => {
                        warn!("Skipping species {}: {}", r.name, e);
                        None
                    }
                }
            })
            .buffer_unordered(config.batch_size.max(1))
            .filter_map(|d| async move { d })
            .collect()
            .await;
        Ok::<_, LookupError>((refs.len(), details))
    };

    let (requested, details) = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(LookupError::Cancelled),
        res = build => res?,
    };
    let index = NameIndex::from_details(details, &config.language);
    info!(
        "Built {} name index: {} entries from {} species in {:?}",
        config.language,
        index.len(),
        requested,
        started.elapsed()
    );
    Ok(index)
}
