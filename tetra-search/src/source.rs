//! Trait definition for the provider source adapters.
//!
//! Each provider (Wikipedia, Hacker News, Open Library, GitHub) implements
//! [`SourceAdapter`] to translate its own JSON API into [`SearchResult`]s.

use std::future::Future;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{SearchResult, Source};

/// A provider backend.
///
/// Implementors handle their own:
///
/// - URL construction with query encoding
/// - HTTP request with provider-specific headers
/// - JSON decoding into the common result shape with `score = 0`
/// - Provider quirks such as rate-limit responses
///
/// All implementations must be `Send + Sync` so each can run on its own task.
pub trait SourceAdapter: Send + Sync {
    /// Query the provider and translate its response.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails, the provider answers
    /// with a non-success status, or the payload cannot be decoded.
    fn fetch(
        &self,
        client: &reqwest::Client,
        query: &str,
        config: &SearchConfig,
    ) -> impl Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;

    /// Returns which [`Source`] this adapter represents.
    fn source(&self) -> Source;

    /// Query the provider, degrading any failure to an empty contribution.
    ///
    /// Errors are logged at warn level and never propagated; one provider
    /// failing must not affect the others.
    fn search(
        &self,
        client: &reqwest::Client,
        query: &str,
        config: &SearchConfig,
    ) -> impl Future<Output = Vec<SearchResult>> + Send {
        async move {
            let source = self.source();
            match self.fetch(client, query, config).await {
                Ok(results) => {
                    tracing::debug!(%source, count = results.len(), "source returned results");
                    results
                }
                Err(err) => {
                    tracing::warn!(%source, error = %err, "source query failed");
                    Vec::new()
                }
            }
        }
    }
}
