//! Error types for the tetra-search crate.
//!
//! Messages are stable lower-case strings suitable for logs and for the
//! `details` field of HTTP error bodies. Provider failures never reach a
//! caller of [`crate::Aggregator`]; they are absorbed by the source adapters.

/// Errors that can occur while querying providers or aggregating results.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The query was empty or contained only whitespace.
    #[error("query must not be empty")]
    EmptyQuery,

    /// An HTTP request to a provider failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A provider request exceeded the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// A provider response did not have the expected JSON shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Something escaped every adapter boundary while aggregating.
    #[error("aggregation failed: {0}")]
    Aggregation(String),
}

impl SearchError {
    /// Classify a transport error from `reqwest`, tagging it with the provider name.
    pub(crate) fn from_request(provider: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{provider} request timed out"))
        } else if err.is_decode() {
            Self::Parse(format!("{provider} returned malformed JSON: {err}"))
        } else {
            Self::Http(format!("{provider} request failed: {err}"))
        }
    }
}

/// Convenience type alias for tetra-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
