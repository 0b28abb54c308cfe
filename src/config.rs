use anyhow::Context;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";

/// Settings of the remote name lookup.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub api_base: String,
    /// Species details fetched concurrently while building the index.
    pub batch_size: usize,
    /// Upper bound on time spent retrying a single request.
    pub retry_budget: Duration,
    /// Time allowed for one attempt, connect to last byte.
    pub request_timeout: Duration,
    /// Language code of the localized names in the index (`fr`).
    pub language: String,
    pub localized_index: bool,
    pub min_query_len: usize,
    pub max_suggestions: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            batch_size: 40,
            retry_budget: Duration::from_secs(15),
            request_timeout: Duration::from_secs(10),
            language: "fr".to_string(),
            localized_index: true,
            min_query_len: 3,
            max_suggestions: 50,
        }
    }
}

impl LookupConfig {
    /// Defaults overridden by `POKETYPES_*` variables; a `.env` file is read first when present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(base) = lookup("POKETYPES_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(val) = lookup("POKETYPES_BATCH_SIZE") {
            config.batch_size = val
                .trim()
                .parse()
                .with_context(|| format!("POKETYPES_BATCH_SIZE must be a number, got {val}"))?;
            if config.batch_size == 0 {
                anyhow::bail!("POKETYPES_BATCH_SIZE must be > 0");
            }
        }
        if let Some(val) = lookup("POKETYPES_RETRY_SECS") {
            let secs: u64 = val
                .trim()
                .parse()
                .with_context(|| format!("POKETYPES_RETRY_SECS must be a number, got {val}"))?;
            config.retry_budget = Duration::from_secs(secs);
        }
        if let Some(val) = lookup("POKETYPES_TIMEOUT_SECS") {
            let secs: u64 = val
                .trim()
                .parse()
                .with_context(|| format!("POKETYPES_TIMEOUT_SECS must be a number, got {val}"))?;
            if secs == 0 {
                anyhow::bail!("POKETYPES_TIMEOUT_SECS must be > 0");
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(lang) = lookup("POKETYPES_LANGUAGE") {
            config.language = lang.trim().to_ascii_lowercase();
        }
        if let Some(val) = lookup("POKETYPES_LOCALIZED_INDEX") {
            config.localized_index = match val.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => anyhow::bail!("POKETYPES_LOCALIZED_INDEX must be true or false, got {other}"),
            };
        }
        Ok(config)
    }
}
