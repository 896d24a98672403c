//! Core aggregator: cache lookup, concurrent per-source fan-out, rank, store.
//!
//! On a cache miss every provider is queried on its own spawned task. The
//! tasks are joined in declaration order (Wikipedia, Hacker News, Open
//! Library, GitHub) so the merged list is deterministic regardless of which
//! provider answers first.

use std::sync::Arc;

use tokio::task::JoinError;

use crate::cache::ResultCache;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::source::SourceAdapter;
use crate::sources::{GitHubSource, HackerNewsSource, OpenLibrarySource, WikipediaSource};
use crate::types::{Aggregation, CacheEntry, SearchResult, Source};

use super::scoring::rank;

/// Merges the four providers into one ranked, cached result list.
///
/// Construct once per process and share behind an [`Arc`]. Concurrent
/// misses for the same query are not coalesced; each fans out on its own
/// and the last write to the cache wins.
#[derive(Debug)]
pub struct Aggregator {
    client: reqwest::Client,
    config: Arc<SearchConfig>,
    cache: Arc<ResultCache>,
}

impl Aggregator {
    /// Build an aggregator over `cache`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` fails validation, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: SearchConfig, cache: Arc<ResultCache>) -> Result<Self, SearchError> {
        config.validate()?;
        let client = http::build_client(&config)?;
        Ok(Self {
            client,
            config: Arc::new(config),
            cache,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Aggregate results for `query`.
    ///
    /// # Pipeline
    ///
    /// 1. Refuse a blank query
    /// 2. Serve from the cache when a fresh entry exists
    /// 3. Fan out to all providers concurrently; each failure becomes an
    ///    empty contribution
    /// 4. Concatenate in declaration order
    /// 5. Score and stable-sort with [`rank`]
    /// 6. Write the ranked list to the cache
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::EmptyQuery`] for a blank query, or
    /// [`SearchError::Aggregation`] if a provider task panicked. Ordinary
    /// provider failures are never errors.
    pub async fn aggregate(&self, query: &str) -> Result<Aggregation, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        if let Some(entry) = self.cache.get(query) {
            tracing::debug!(count = entry.results.len(), "serving aggregation from cache");
            return Ok(Aggregation {
                query: entry.query.clone(),
                results: entry.results.clone(),
                timestamp: entry.timestamp,
                served_from_cache: true,
            });
        }

        tracing::trace!(query, "cache miss, querying all sources");
        let merged = self.fan_out(query).await?;
        let ranked = rank(&merged, query);
        let timestamp = self.cache.now_millis();

        self.cache.put(
            query,
            CacheEntry {
                query: query.to_string(),
                results: ranked.clone(),
                timestamp,
            },
        );
        tracing::debug!(count = ranked.len(), "aggregation complete");

        Ok(Aggregation {
            query: query.to_string(),
            results: ranked,
            timestamp,
            served_from_cache: false,
        })
    }

    async fn fan_out(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let query: Arc<str> = Arc::from(query);
        let handles: Vec<_> = Source::all()
            .iter()
            .map(|&source| {
                let client = self.client.clone();
                let config = Arc::clone(&self.config);
                let query = Arc::clone(&query);
                tokio::spawn(async move { query_source(source, &client, &query, &config).await })
            })
            .collect();

        let outcomes = futures::future::join_all(handles).await;
        merge_outcomes(Source::all().iter().copied().zip(outcomes))
    }
}

/// Query a single source, dispatching to the concrete adapter.
///
/// Never fails: adapter errors are logged and yield an empty list.
pub async fn query_source(
    source: Source,
    client: &reqwest::Client,
    query: &str,
    config: &SearchConfig,
) -> Vec<SearchResult> {
    match source {
        Source::Wikipedia => WikipediaSource.search(client, query, config).await,
        Source::HackerNews => HackerNewsSource.search(client, query, config).await,
        Source::OpenLibrary => OpenLibrarySource.search(client, query, config).await,
        Source::GitHub => GitHubSource.search(client, query, config).await,
    }
}

/// Concatenate per-source task outcomes in the order given.
///
/// A task that did not complete (panic or runtime shutdown) escaped every
/// adapter boundary, so the whole aggregation fails rather than returning
/// partial data.
fn merge_outcomes<I>(outcomes: I) -> Result<Vec<SearchResult>, SearchError>
where
    I: IntoIterator<Item = (Source, Result<Vec<SearchResult>, JoinError>)>,
{
    let mut merged = Vec::new();
    for (source, outcome) in outcomes {
        match outcome {
            Ok(results) => merged.extend(results),
            Err(err) => {
                tracing::error!(%source, error = %err, "source task did not complete");
                return Err(SearchError::Aggregation(format!(
                    "{source} task did not complete: {err}"
                )));
            }
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::types::{SourceDetails, WikipediaMeta};

    fn make_result(id: &str) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            title: format!("Title {id}"),
            snippet: String::new(),
            url: format!("https://example.com/{id}"),
            score: 0.0,
            details: SourceDetails::Wikipedia(WikipediaMeta::default()),
        }
    }

    fn offline_aggregator() -> (Aggregator, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let config = SearchConfig::default();
        let cache = Arc::new(ResultCache::with_clock(&config.cache, clock.clone()));
        let aggregator = Aggregator::new(config, cache).expect("valid config");
        (aggregator, clock)
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let cache = Arc::new(ResultCache::new(&config.cache));
        let err = Aggregator::new(config, cache).unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let (aggregator, _) = offline_aggregator();
        for query in ["", "   ", "\t\n"] {
            let err = aggregator.aggregate(query).await.unwrap_err();
            assert!(matches!(err, SearchError::EmptyQuery));
        }
        assert!(aggregator.cache().is_empty());
    }

    #[tokio::test]
    async fn cache_hit_skips_network() {
        // Default endpoints point at the public APIs; a hit must not touch them.
        let (aggregator, clock) = offline_aggregator();
        let entry = CacheEntry {
            query: "Rust".into(),
            results: vec![make_result("wikipedia-1")],
            timestamp: clock.now_millis(),
        };
        aggregator.cache().put("Rust", entry.clone());

        let outcome = aggregator.aggregate("  rust ").await.expect("cache hit");
        assert!(outcome.served_from_cache);
        assert_eq!(outcome.query, "Rust");
        assert_eq!(outcome.results, entry.results);
        assert_eq!(outcome.timestamp, entry.timestamp);
    }

    #[test]
    fn merge_keeps_declaration_order() {
        let outcomes = vec![
            (Source::Wikipedia, Ok(vec![make_result("w1"), make_result("w2")])),
            (Source::HackerNews, Ok(vec![])),
            (Source::OpenLibrary, Ok(vec![make_result("o1")])),
            (Source::GitHub, Ok(vec![make_result("g1")])),
        ];
        let merged = merge_outcomes(outcomes).expect("merge");
        let ids: Vec<&str> = merged.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["w1", "w2", "o1", "g1"]);
    }

    #[tokio::test]
    async fn panicked_task_fails_whole_aggregation() {
        let join_error = tokio::spawn(async { panic!("adapter blew up") })
            .await
            .unwrap_err();
        let outcomes = vec![
            (Source::Wikipedia, Ok(vec![make_result("w1")])),
            (Source::HackerNews, Err(join_error)),
        ];
        let err = merge_outcomes(outcomes).unwrap_err();
        assert!(matches!(err, SearchError::Aggregation(_)));
        assert!(err.to_string().contains("Hacker News"));
    }
}
