//! HTTP client for the TorrentClaw REST API
//!
//! GET responses go through the shared [`ResponseCache`], keyed by the
//! fully resolved URL. POST requests always hit the network. HTTP 429 is
//! retried on an exponential schedule; every other non-2xx status fails
//! immediately with an [`ApiError`].

pub mod models;

use std::sync::Arc;
use std::time::Duration;

use backon::{BackoffBuilder, ExponentialBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use crate::cache::{CacheStatsSnapshot, ResponseCache};
use crate::config::{Config, RetryConfig};
use crate::error::ApiError;
use crate::{Error, Result};

pub use models::*;

/// Header identifying traffic that originates from this bridge
const SEARCH_SOURCE_HEADER: &str = "x-search-source";

/// Ordered query parameters; absent values are skipped at construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    /// Empty parameter list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    #[must_use]
    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    /// Append a parameter when present
    #[must_use]
    pub fn with_opt<T: ToString>(self, key: &'static str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    /// Whether no parameter was added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Retry schedule for rate-limited requests
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, first one included
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Cap on any single delay
    pub max_backoff: Duration,
    /// Growth factor between delays
    pub multiplier: f32,
}

impl RetryPolicy {
    /// Create from config
    #[must_use]
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
            multiplier: config.multiplier,
        }
    }

    /// Delays to sleep between attempts, one per retry
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        ExponentialBuilder::default()
            .with_min_delay(self.initial_backoff)
            .with_max_delay(self.max_backoff)
            .with_factor(self.multiplier)
            .with_max_times(self.max_attempts.saturating_sub(1) as usize)
            .build()
    }
}

/// TorrentClaw API client
pub struct TorrentClawClient {
    http: reqwest::Client,
    /// Validated base URL as configured
    base_url: String,
    /// Parsed base for joining endpoint paths
    base: Url,
    timeout: Duration,
    retry: RetryPolicy,
    cache: Arc<ResponseCache>,
}

impl TorrentClawClient {
    /// Build a client from configuration
    ///
    /// Validates the base URL and fails with [`Error::Config`] when it is
    /// malformed or points at a private address without the override.
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.validate()?;
        let base = Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("Invalid TORRENTCLAW_API_URL: {e}")))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("torrentclaw-mcp/", env!("CARGO_PKG_VERSION")))
            .default_headers(default_headers(config.api_key.as_deref())?)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        debug!(
            base_url = %base_url,
            authenticated = config.api_key.is_some(),
            cache_ttl = ?config.cache.ttl,
            cache_max_entries = config.cache.max_entries,
            "TorrentClaw client ready"
        );

        Ok(Self {
            http,
            base_url,
            base,
            timeout: config.timeout,
            retry: RetryPolicy::new(&config.retry),
            cache: Arc::new(ResponseCache::new(
                config.cache.ttl,
                config.cache.max_entries,
            )),
        })
    }

    /// The validated base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Shared response cache
    #[must_use]
    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Cache statistics snapshot
    #[must_use]
    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.cache.stats()
    }

    /// Resolve `path` against the base URL and append the query
    fn endpoint(&self, path: &str, query: &QueryParams) -> Result<Url> {
        let mut url = self
            .base
            .join(path)
            .map_err(|e| Error::Config(format!("Invalid endpoint path {path}: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &query.0 {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Cached GET returning a typed body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &QueryParams) -> Result<T> {
        let url = self.endpoint(path, query)?;

        if let Some(cached) = self.cache.get(url.as_str()) {
            debug!(url = %url, "Cache hit");
            return decode(path, &cached);
        }

        let response = self
            .send_with_retry(path, || self.http.get(url.clone()))
            .await?;
        let body = read_json(path, response).await?;
        let typed = decode(path, &body)?;
        self.cache.set(url.as_str(), body);
        Ok(typed)
    }

    /// Uncached POST with a JSON body
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path, &QueryParams::new())?;
        let response = self
            .send_with_retry(path, || {
                self.http
                    .post(url.clone())
                    .header(CONTENT_TYPE, "application/json")
                    .json(body)
            })
            .await?;
        let body = read_json(path, response).await?;
        decode(path, &body)
    }

    /// Send a request, retrying on HTTP 429
    ///
    /// Each attempt is bounded by the configured timeout. Exhausted retries
    /// and other non-2xx statuses surface as [`ApiError`].
    async fn send_with_retry<F>(&self, path: &str, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut delays = self.retry.delays();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let response = build().timeout(self.timeout).send().await?;
            let status = response.status();

            if status.is_success() {
                debug!(endpoint = path, status = status.as_u16(), attempt, "Request succeeded");
                return Ok(response);
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                if let Some(delay) = delays.next() {
                    warn!(
                        endpoint = path,
                        attempt,
                        delay_ms = delay.as_millis(),
                        "Rate limited, retrying after backoff"
                    );
                    sleep(delay).await;
                    continue;
                }
                debug!(endpoint = path, attempts = attempt, "Max retry attempts reached");
            }

            return Err(error_from_response(response).await.into());
        }
    }

    // ------------------------------------------------------------------
    // Endpoint wrappers
    // ------------------------------------------------------------------

    /// Full-text content search
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        let query = QueryParams::new()
            .with("q", &params.query)
            .with_opt("type", params.content_type.as_ref())
            .with_opt("genre", params.genre.as_ref())
            .with_opt("year_min", params.year_min)
            .with_opt("year_max", params.year_max)
            .with_opt("min_rating", params.min_rating)
            .with_opt("quality", params.quality.as_ref())
            .with_opt("lang", params.language.as_ref())
            .with_opt("audio", params.audio.as_ref())
            .with_opt("hdr", params.hdr.as_ref())
            .with_opt("availability", params.availability.as_ref())
            .with_opt("locale", params.locale.as_ref())
            .with_opt("season", params.season)
            .with_opt("episode", params.episode)
            .with_opt("sort", params.sort.as_ref())
            .with_opt("page", params.page)
            .with_opt("limit", params.limit)
            .with_opt("country", params.country.as_ref());
        self.get_json("/api/v1/search", &query).await
    }

    /// Type-ahead title suggestions
    pub async fn autocomplete(&self, query: &str) -> Result<AutocompleteResponse> {
        self.get_json("/api/v1/autocomplete", &QueryParams::new().with("q", query))
            .await
    }

    /// Most clicked content
    pub async fn popular(
        &self,
        limit: Option<u32>,
        page: Option<u32>,
        locale: Option<&str>,
    ) -> Result<PopularResponse> {
        let query = QueryParams::new()
            .with_opt("limit", limit)
            .with_opt("page", page)
            .with_opt("locale", locale);
        self.get_json("/api/v1/popular", &query).await
    }

    /// Most recently added content
    pub async fn recent(
        &self,
        limit: Option<u32>,
        page: Option<u32>,
        locale: Option<&str>,
    ) -> Result<RecentResponse> {
        let query = QueryParams::new()
            .with_opt("limit", limit)
            .with_opt("page", page)
            .with_opt("locale", locale);
        self.get_json("/api/v1/recent", &query).await
    }

    /// Streaming/rent/buy offers for one country
    pub async fn watch_providers(
        &self,
        content_id: u64,
        country: &str,
    ) -> Result<WatchProvidersResponse> {
        self.get_json(
            &format!("/api/v1/content/{content_id}/watch-providers"),
            &QueryParams::new().with("country", country),
        )
        .await
    }

    /// Director and cast
    pub async fn credits(&self, content_id: u64) -> Result<CreditsResponse> {
        self.get_json(
            &format!("/api/v1/content/{content_id}/credits"),
            &QueryParams::new(),
        )
        .await
    }

    /// Catalog statistics
    pub async fn stats(&self) -> Result<StatsResponse> {
        self.get_json("/api/v1/stats", &QueryParams::new()).await
    }

    /// Record a user interaction with a torrent
    pub async fn track(&self, info_hash: &str, action: TrackAction) -> Result<TrackResponse> {
        self.post_json(
            "/api/v1/track",
            &json!({ "infoHash": info_hash, "action": action }),
        )
        .await
    }

    /// Queue a torrent for media analysis
    pub async fn submit_scan_request(
        &self,
        info_hash: &str,
        email: &str,
    ) -> Result<ScanRequestResponse> {
        self.post_json(
            "/api/v1/scan-request",
            &json!({ "infoHash": info_hash, "email": email, "website": "" }),
        )
        .await
    }

    /// State of a previously submitted scan
    pub async fn scan_status(&self, info_hash: &str) -> Result<ScanRequestResponse> {
        self.get_json(
            &format!("/api/v1/scan-request/{info_hash}"),
            &QueryParams::new(),
        )
        .await
    }

    /// Direct `.torrent` download link; no request is made
    #[must_use]
    pub fn torrent_download_url(&self, info_hash: &str) -> String {
        format!(
            "{}/api/v1/torrent/{info_hash}",
            self.base_url.trim_end_matches('/')
        )
    }
}

/// Headers sent with every request
fn default_headers(api_key: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static(SEARCH_SOURCE_HEADER),
        HeaderValue::from_static("mcp"),
    );
    if let Some(key) = api_key {
        let mut value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| {
            Error::Config("TORRENTCLAW_API_KEY contains invalid characters".to_string())
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

/// Turn a non-2xx response into an [`ApiError`]
///
/// Client-error bodies are kept (truncated); server-error bodies are not
/// read at all.
async fn error_from_response(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = if response.status().is_client_error() {
        response.text().await.unwrap_or_default()
    } else {
        String::new()
    };
    warn!(status, "TorrentClaw API returned an error");
    ApiError::new(status, &body)
}

async fn read_json(path: &str, response: Response) -> Result<Value> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| Error::Decode {
        endpoint: path.to_string(),
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(path: &str, body: &Value) -> Result<T> {
    serde::Deserialize::deserialize(body).map_err(|e| Error::Decode {
        endpoint: path.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> TorrentClawClient {
        let config = Config {
            api_url: api_url.to_string(),
            ..Config::default()
        };
        TorrentClawClient::new(&config).unwrap()
    }

    #[test]
    fn default_retry_schedule_is_one_then_two_seconds() {
        let policy = RetryPolicy::new(&RetryConfig::default());
        let delays: Vec<_> = policy.delays().collect();
        assert_eq!(delays, vec![Duration::from_secs(1), Duration::from_secs(2)]);
    }

    #[test]
    fn retry_schedule_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 6,
            initial_backoff: Duration::from_secs(4),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
        };
        let delays: Vec<_> = policy.delays().collect();
        assert_eq!(delays.len(), 5);
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(10)));
        assert_eq!(delays[2], Duration::from_secs(10));
    }

    #[test]
    fn single_attempt_has_no_delays() {
        let policy = RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::new(&RetryConfig::default())
        };
        assert_eq!(policy.delays().count(), 0);
    }

    #[test]
    fn endpoint_keeps_parameter_order_and_skips_absent() {
        let client = client("https://torrentclaw.com");
        let query = QueryParams::new()
            .with("q", "the matrix")
            .with_opt::<u32>("page", None)
            .with_opt("limit", Some(20))
            .with("sort", "relevance");
        let url = client.endpoint("/api/v1/search", &query).unwrap();
        assert_eq!(
            url.as_str(),
            "https://torrentclaw.com/api/v1/search?q=the+matrix&limit=20&sort=relevance"
        );
    }

    #[test]
    fn endpoint_without_query_has_no_question_mark() {
        let client = client("https://torrentclaw.com");
        let url = client.endpoint("/api/v1/stats", &QueryParams::new()).unwrap();
        assert_eq!(url.as_str(), "https://torrentclaw.com/api/v1/stats");
    }

    #[test]
    fn torrent_download_url_is_pure() {
        let client = client("https://torrentclaw.com/");
        assert_eq!(
            client.torrent_download_url("abcdef0123456789abcdef0123456789abcdef01"),
            "https://torrentclaw.com/api/v1/torrent/abcdef0123456789abcdef0123456789abcdef01"
        );
    }

    #[test]
    fn private_base_url_is_rejected() {
        let config = Config {
            api_url: "http://10.0.0.5".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            TorrentClawClient::new(&config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn invalid_api_key_header_is_config_error() {
        let config = Config {
            api_key: Some("bad\nkey".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            TorrentClawClient::new(&config),
            Err(Error::Config(_))
        ));
    }
}
