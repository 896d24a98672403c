//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls provider endpoints, per-source result limits,
//! request timeouts and the result cache. Every field has a default so a
//! partial TOML table deserializes cleanly.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SearchError;

/// Default User-Agent. Wikipedia and GitHub both reject anonymous clients.
pub const DEFAULT_USER_AGENT: &str = "tetra/0.1 (multi-source search aggregator)";

/// Provider API endpoints. Overridable so tests can point at mock servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// MediaWiki action API (`api.php`).
    pub wikipedia: String,
    /// Algolia Hacker News search endpoint.
    pub hackernews: String,
    /// Open Library `search.json` endpoint.
    pub openlibrary: String,
    /// GitHub repository search endpoint.
    pub github: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            wikipedia: "https://en.wikipedia.org/w/api.php".into(),
            hackernews: "https://hn.algolia.com/api/v1/search".into(),
            openlibrary: "https://openlibrary.org/search.json".into(),
            github: "https://api.github.com/search/repositories".into(),
        }
    }
}

/// Result cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long an aggregation stays fresh, in seconds.
    pub ttl_seconds: u64,
    /// Entry count above which a write triggers a sweep of expired entries.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            capacity: 100,
        }
    }
}

/// Configuration for the aggregator and its source adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoints: Endpoints,
    /// Maximum number of results requested from each provider.
    pub results_per_source: usize,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// User-Agent sent with every provider request.
    pub user_agent: String,
    pub cache: CacheConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            results_per_source: 5,
            timeout_seconds: 8,
            user_agent: DEFAULT_USER_AGENT.into(),
            cache: CacheConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `results_per_source`, `timeout_seconds`, `cache.ttl_seconds` and
    ///   `cache.capacity` must be greater than 0
    /// - `user_agent` must not be blank
    /// - every endpoint must be an absolute `http` or `https` URL
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.results_per_source == 0 {
            return Err(SearchError::Config(
                "results_per_source must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.cache.ttl_seconds == 0 {
            return Err(SearchError::Config(
                "cache.ttl_seconds must be greater than 0".into(),
            ));
        }
        if self.cache.capacity == 0 {
            return Err(SearchError::Config(
                "cache.capacity must be greater than 0".into(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(SearchError::Config("user_agent must not be empty".into()));
        }

        let endpoints = [
            ("wikipedia", &self.endpoints.wikipedia),
            ("hackernews", &self.endpoints.hackernews),
            ("openlibrary", &self.endpoints.openlibrary),
            ("github", &self.endpoints.github),
        ];
        for (name, endpoint) in endpoints {
            let parsed = Url::parse(endpoint).map_err(|e| {
                SearchError::Config(format!("endpoints.{name} is not a valid URL: {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(SearchError::Config(format!(
                    "endpoints.{name} must use http or https"
                )));
            }
        }
        Ok(())
    }
}
