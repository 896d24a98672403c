//! Shared HTTP client for provider API requests.
//!
//! One [`reqwest::Client`] is built per aggregator and cloned into every
//! source task; clones share the same connection pool.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::Source;

/// Build a [`reqwest::Client`] configured for the provider JSON APIs.
///
/// The client has:
/// - Timeout from config
/// - The configured identifying User-Agent
/// - `Accept: application/json` by default
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed, or
/// [`SearchError::Config`] if the User-Agent is not a valid header value.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let user_agent = HeaderValue::from_str(&config.user_agent)
        .map_err(|e| SearchError::Config(format!("invalid user_agent: {e}")))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(user_agent)
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Send a request, mapping transport failures to [`SearchError`].
pub(crate) async fn send(
    request: reqwest::RequestBuilder,
    source: Source,
) -> Result<reqwest::Response, SearchError> {
    request
        .send()
        .await
        .map_err(|e| SearchError::from_request(source.name(), &e))
}

/// Reject non-success statuses, then decode the body as JSON.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    source: Source,
) -> Result<T, SearchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::Http(format!(
            "{} returned HTTP {}",
            source.name(),
            status.as_u16()
        )));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| SearchError::from_request(source.name(), &e))
}

/// Truncate `text` to at most `max_chars` characters (not bytes).
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
