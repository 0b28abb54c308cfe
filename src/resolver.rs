// Name or id to defending types. Anything that is not a valid profile is
// `Resolution::Unresolved`, never an all-x1 or all-immune matchup.
use crate::config::LookupConfig;
use crate::effectiveness::{DefenderProfile, ProfileError};
use crate::index::{build_index, IndexEntry, NameIndex};
use crate::pokeapi::{LookupError, SpeciesSource};
use crate::types::Type;
use thiserror::Error;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug)]
pub enum Resolution {
    Resolved {
        /// API name of the matched pokemon.
        name: String,
        id: u32,
        types: Vec<Type>,
        profile: DefenderProfile,
    },
    Unresolved(Unresolved),
}

impl Resolution {
    pub fn profile(&self) -> Option<&DefenderProfile> {
        match self {
            Resolution::Resolved { profile, .. } => Some(profile),
            Resolution::Unresolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }
}

#[derive(Debug, Error)]
pub enum Unresolved {
    #[error("no pokemon matches '{0}'")]
    NotFound(String),
    #[error("'{name}' has no usable types: {source}")]
    InvalidProfile {
        name: String,
        #[source]
        source: ProfileError,
    },
    #[error("'{0}' has no known types")]
    NoKnownTypes(String),
    #[error("lookup cancelled")]
    Cancelled,
    #[error(transparent)]
    Failed(LookupError),
}

impl From<LookupError> for Unresolved {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Cancelled => Unresolved::Cancelled,
            other => Unresolved::Failed(other),
        }
    }
}

pub struct Resolver<S> {
    source: S,
    config: LookupConfig,
    cancel: CancellationToken,
    index: OnceCell<NameIndex>,
}

impl<S: SpeciesSource> Resolver<S> {
    pub fn new(source: S, config: LookupConfig) -> Self {
        Self::with_cancellation(source, config, CancellationToken::new())
    }

    pub fn with_cancellation(source: S, config: LookupConfig, cancel: CancellationToken) -> Self {
        Self {
            source,
            config,
            cancel,
            index: OnceCell::new(),
        }
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// The index if it has already been built.
    pub fn index(&self) -> Option<&NameIndex> {
        self.index.get()
    }

    /// Builds the localized index on first use; later and concurrent calls share it.
    pub async fn ensure_index(&self) -> Result<&NameIndex, LookupError> {
        self.index
            .get_or_try_init(|| build_index(&self.source, &self.config, &self.cancel))
            .await
    }

    /// Up to `max_suggestions` index entries containing `query`. Short queries
    /// return nothing without touching the network.
    pub async fn suggest(&self, query: &str) -> Result<Vec<IndexEntry>, LookupError> {
        if crate::normalize::normalize(query).chars().count() < self.config.min_query_len {
            return Ok(Vec::new());
        }
        let index = self.ensure_index().await?;
        Ok(index
            .suggestions(query, self.config.min_query_len, self.config.max_suggestions)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn resolve(&self, query: &str) -> Resolution {
        match self.try_resolve(query).await {
            Ok(resolution) => resolution,
            Err(unresolved) => Resolution::Unresolved(unresolved),
        }
    }

    async fn try_resolve(&self, query: &str) -> Result<Resolution, Unresolved> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Unresolved::NotFound(query.to_string()));
        }
        if self.cancel.is_cancelled() {
            return Err(Unresolved::Cancelled);
        }

        if let Some(entry) = self.index().and_then(|index| index.find(query)) {
            debug!("'{}' matched index entry {}", query, entry.english);
            if let Some(resolution) = self.fetch(&entry.english).await? {
                return Ok(resolution);
            }
        }

        if let Some(resolution) = self.fetch(&query.to_lowercase()).await? {
            return Ok(resolution);
        }

        if self.config.localized_index && self.index().is_none() {
            let english = self
                .ensure_index()
                .await?
                .find(query)
                .map(|entry| entry.english.clone());
            if let Some(english) = english {
                if let Some(resolution) = self.fetch(&english).await? {
                    return Ok(resolution);
                }
            }
        }

        Err(Unresolved::NotFound(query.to_string()))
    }

    async fn fetch(&self, name_or_id: &str) -> Result<Option<Resolution>, Unresolved> {
        let detail = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(Unresolved::Cancelled),
            detail = self.source.pokemon(name_or_id) => detail?,
        };
        let Some(detail) = detail else {
            return Ok(None);
        };
        let (types, unknown) = detail.known_types();
        if !unknown.is_empty() {
            warn!("{} has unknown types {:?}, ignoring them", detail.name, unknown);
        }
        if types.is_empty() {
            return Err(Unresolved::NoKnownTypes(detail.name));
        }
        let profile = DefenderProfile::try_from_types(&types).map_err(|source| {
            Unresolved::InvalidProfile {
                name: detail.name.clone(),
                source,
            }
        })?;
        Ok(Some(Resolution::Resolved {
            name: detail.name,
            id: detail.id,
            types,
            profile,
        }))
    }
}
