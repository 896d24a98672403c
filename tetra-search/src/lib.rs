//! # tetra-search
//!
//! Multi-source search aggregation for tetra.
//!
//! One query is sent to four public JSON APIs at once and the answers are
//! merged into a single relevance-ranked list. No API keys are needed.
//!
//! ## Design
//!
//! - Wikipedia, Hacker News (Algolia), Open Library and GitHub are queried
//!   concurrently, each on its own task
//! - A failing provider contributes nothing; the others still answer
//! - Results are scored 0–100 from title match, snippet length and a
//!   provider-specific popularity signal, then stable-sorted
//! - Ranked lists are cached in memory for five minutes per normalised query
//! - Ranked lists can be exported as JSON, CSV, XML or XLSX documents
//!
//! ## Security
//!
//! - No API keys or secrets to leak
//! - No network listeners; this is a library, the server lives in `tetra`
//! - Search queries are logged only at trace level

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod http;
pub mod orchestrator;
pub mod source;
pub mod sources;
pub mod types;

pub use cache::ResultCache;
pub use clock::{Clock, SystemClock};
pub use config::{CacheConfig, Endpoints, SearchConfig};
pub use error::{Result, SearchError};
pub use export::{export, ExportFormat};
pub use orchestrator::Aggregator;
pub use source::SourceAdapter;
pub use types::{Aggregation, CacheEntry, SearchResult, Source, SourceDetails};

/// Run one uncached aggregation with `config`.
///
/// Builds a throwaway [`Aggregator`] with an empty cache. Long-lived callers
/// should construct an [`Aggregator`] once and share it instead.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid and
/// [`SearchError::EmptyQuery`] if `query` is blank.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> tetra_search::Result<()> {
/// let config = tetra_search::SearchConfig::default();
/// let results = tetra_search::search("rust programming", &config).await?;
/// for result in &results {
///     println!("{:>5.1} {}: {}", result.score, result.source(), result.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<Vec<SearchResult>> {
    let cache = std::sync::Arc::new(ResultCache::new(&config.cache));
    let aggregator = Aggregator::new(config.clone(), cache)?;
    Ok(aggregator.aggregate(query).await?.results)
}
