// Remote species/pokemon source. Not-found is `Ok(None)`, never an error.
use crate::config::LookupConfig;
use crate::model::{NamedResource, PokemonDetail, SpeciesDetail, SpeciesList};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("lookup cancelled")]
    Cancelled,
}

#[async_trait]
pub trait SpeciesSource: Send + Sync {
    async fn species_list(&self) -> Result<Vec<NamedResource>, LookupError>;

    async fn species(&self, reference: &NamedResource)
        -> Result<Option<SpeciesDetail>, LookupError>;

    /// Pokemon by English name or numeric id.
    async fn pokemon(&self, name_or_id: &str) -> Result<Option<PokemonDetail>, LookupError>;
}

pub struct PokeApi {
    http: reqwest::Client,
    base: String,
    retry_budget: std::time::Duration,
}

impl PokeApi {
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base: config.api_base.trim_end_matches('/').to_string(),
            retry_budget: config.retry_budget,
        })
    }

    /// Body of a successful GET, `None` on 404. Transient failures are retried
    /// until `retry_budget` runs out.
    async fn get_bytes(&self, url: &str) -> Result<Option<Vec<u8>>, LookupError> {
        let backoff = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(self.retry_budget))
            .build();
        let body = backoff::future::retry(backoff, || async move {
            debug!("GET {}", url);
            let response = self
                .http
                .get(url)
                .send()
                .await
                .map_err(|e| classify_transport_error(url, e))?;
            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if is_transient_status(status) {
                warn!("GET {} returned {}, retrying", url, status);
                return Err(backoff::Error::transient(LookupError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(LookupError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                }));
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|e| classify_transport_error(url, e))?;
            Ok::<_, backoff::Error<LookupError>>(Some(bytes.to_vec()))
        })
        .await?;
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, LookupError> {
        match self.get_bytes(url).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn classify_transport_error(url: &str, err: reqwest::Error) -> backoff::Error<LookupError> {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        warn!("GET {} failed: {}, retrying", url, err);
        backoff::Error::transient(LookupError::Http(err))
    } else {
        backoff::Error::permanent(LookupError::Http(err))
    }
}

/// A name or id that stays a single path segment of `/pokemon/{key}`.
fn is_path_key(key: &str) -> bool {
    !key.is_empty()
        && !key.chars().all(|c| c == '.')
        && !key.contains(['/', '\\', '?', '#', '%'])
}

#[async_trait]
impl SpeciesSource for PokeApi {
    async fn species_list(&self) -> Result<Vec<NamedResource>, LookupError> {
        let url = format!("{}/pokemon-species?limit=20000&offset=0", self.base);
        let list: Option<SpeciesList> = self.get_json(&url).await?;
        Ok(list.map(|l| l.results).unwrap_or_default())
    }

    async fn species(
        &self,
        reference: &NamedResource,
    ) -> Result<Option<SpeciesDetail>, LookupError> {
        self.get_json(&reference.url).await
    }

    async fn pokemon(&self, name_or_id: &str) -> Result<Option<PokemonDetail>, LookupError> {
        let key = name_or_id.trim();
        if !is_path_key(key) {
            return Ok(None);
        }
        let url = format!("{}/pokemon/{}", self.base, key);
        let Some(bytes) = self.get_bytes(&url).await? else {
            return Ok(None);
        };
        // Some keys land on another endpoint; anything that is not a pokemon is a miss.
        match serde_json::from_slice(&bytes) {
            Ok(detail) => Ok(Some(detail)),
            Err(e) => {
                warn!("GET {} is not a pokemon: {}", url, e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const PIKACHU: &str =
        r#"{"id":25,"name":"pikachu","types":[{"slot":1,"type":{"name":"electric","url":"u"}}]}"#;

    #[derive(Clone, Copy)]
    enum Reply {
        Respond(u16, &'static str),
        Stall,
    }

    /// Serves `replies` in order over plain HTTP, repeating the last one.
    /// Returns the API base and the number of connections accepted.
    async fn serve(replies: Vec<Reply>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let reply = replies[n.min(replies.len() - 1)];
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(read) => request.extend_from_slice(&chunk[..read]),
                        }
                    }
                    match reply {
                        Reply::Respond(status, body) => {
                            let response = format!(
                                "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                                body.len()
                            );
                            let _ = socket.write_all(response.as_bytes()).await;
                            let _ = socket.shutdown().await;
                        }
                        Reply::Stall => {
                            tokio::time::sleep(Duration::from_secs(60)).await;
                        }
                    }
                });
            }
        });
        (format!("http://{addr}/api/v2"), hits)
    }

    fn api(base: String) -> PokeApi {
        PokeApi::new(&LookupConfig {
            api_base: base,
            retry_budget: Duration::from_secs(5),
            request_timeout: Duration::from_millis(300),
            ..LookupConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn transient_statuses() {
        assert!(is_transient_status(StatusCode::BAD_GATEWAY));
        assert!(is_transient_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_transient_status(StatusCode::NOT_FOUND));
        assert!(!is_transient_status(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn base_url_is_trimmed() {
        let config = LookupConfig {
            api_base: "http://localhost/api/v2/".to_string(),
            ..LookupConfig::default()
        };
        assert_eq!(PokeApi::new(&config).unwrap().base, "http://localhost/api/v2");
    }

    #[test]
    fn path_keys() {
        assert!(is_path_key("pikachu"));
        assert!(is_path_key("25"));
        assert!(is_path_key("mr-mime"));
        for bad in ["", ".", "..", "?", "a/b", "a#b", "%2f", "a\\b"] {
            assert!(!is_path_key(bad), "{bad}");
        }
    }

    #[tokio::test]
    async fn not_found_is_none_without_retry() {
        let (base, hits) = serve(vec![Reply::Respond(404, "")]).await;
        let detail = api(base).pokemon("missingno").await.unwrap();
        assert!(detail.is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_errors_are_retried() {
        let (base, hits) = serve(vec![
            Reply::Respond(503, ""),
            Reply::Respond(429, ""),
            Reply::Respond(200, PIKACHU),
        ])
        .await;
        let detail = api(base).pokemon("pikachu").await.unwrap().unwrap();
        assert_eq!(detail.id, 25);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let (base, hits) = serve(vec![Reply::Respond(400, "")]).await;
        let err = api(base).pokemon("pikachu").await.unwrap_err();
        assert!(matches!(err, LookupError::Status { status: 400, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stalled_server_times_out() {
        let (base, hits) = serve(vec![Reply::Stall]).await;
        let api = PokeApi::new(&LookupConfig {
            api_base: base,
            retry_budget: Duration::from_secs(1),
            request_timeout: Duration::from_millis(200),
            ..LookupConfig::default()
        })
        .unwrap();
        let result = tokio::time::timeout(Duration::from_secs(10), api.pokemon("pikachu"))
            .await
            .expect("lookup gives up within the retry budget");
        match result {
            Err(LookupError::Http(e)) => assert!(e.is_timeout(), "{e}"),
            other => panic!("expected a timeout, got {other:?}"),
        }
        assert!(hits.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn non_pokemon_body_is_a_miss() {
        let (base, hits) = serve(vec![Reply::Respond(200, r#"{"count":1,"results":[]}"#)]).await;
        let api = api(base);
        assert!(api.pokemon("?").await.unwrap().is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(api.pokemon("pokedex").await.unwrap().is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_species_is_a_decode_error() {
        let (base, _) = serve(vec![Reply::Respond(200, "not json")]).await;
        let reference = NamedResource {
            name: "bulbasaur".to_string(),
            url: format!("{base}/pokemon-species/1"),
        };
        let err = api(base).species(&reference).await.unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
    }
}
