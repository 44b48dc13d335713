//! Configuration management
//!
//! Layering, lowest to highest precedence: built-in defaults, an optional
//! YAML file, `TORRENTCLAW_*` environment variables (nested keys split on
//! `__`), then command-line flags applied by the binary.

use std::{path::Path, time::Duration};

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL};
use crate::security::validate_api_url;
use crate::{Error, Result};

/// Public TorrentClaw origin
pub const DEFAULT_API_URL: &str = "https://torrentclaw.com";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TORRENTCLAW_";

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the TorrentClaw API
    pub api_url: String,
    /// Bearer token sent with every request, if any
    pub api_key: Option<String>,
    /// Permit loopback/private hosts in `api_url` (self-hosted setups)
    #[serde(deserialize_with = "opt_in")]
    pub allow_private: bool,
    /// Per-attempt request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Response cache
    pub cache: CacheConfig,
    /// Rate-limit retry policy
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            allow_private: false,
            timeout: Duration::from_secs(15),
            cache: CacheConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

/// Response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Time-to-live for cached GET responses
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
    /// Maximum number of entries before LRU eviction (0 disables caching)
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Retry configuration for HTTP 429 responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, first one included
    pub max_attempts: u32,
    /// Delay before the first retry
    #[serde(with = "humantime_serde")]
    pub initial_backoff: Duration,
    /// Upper bound for any single delay
    #[serde(with = "humantime_serde")]
    pub max_backoff: Duration,
    /// Backoff multiplier
    pub multiplier: f32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

/// Only a literal `true` opts in; any other value reads as `false`
fn opt_in<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => s == "true",
        Flag::Other(_) => false,
    })
}

impl Config {
    /// Load configuration from an optional YAML file plus the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();

        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            figment = figment.merge(Yaml::file(p));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut config: Self = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        // Empty values behave like unset variables
        if config.api_url.trim().is_empty() {
            config.api_url = DEFAULT_API_URL.to_string();
        }
        if config.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            config.api_key = None;
        }

        Ok(config)
    }

    /// Validate the configuration; fatal at startup
    ///
    /// Returns the validated API base URL.
    pub fn validate(&self) -> Result<String> {
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        validate_api_url(&self.api_url, self.allow_private)
    }
}
