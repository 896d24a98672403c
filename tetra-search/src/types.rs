//! Core types for aggregated search results and provider identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The providers tetra aggregates, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Wikipedia full-text search plus intro extracts.
    Wikipedia,
    /// Hacker News stories via the Algolia search API.
    HackerNews,
    /// Open Library book search.
    OpenLibrary,
    /// GitHub repository search.
    GitHub,
}

impl Source {
    /// Returns the wire identifier of this source (also the result id prefix).
    pub fn id(&self) -> &'static str {
        match self {
            Self::Wikipedia => "wikipedia",
            Self::HackerNews => "hackernews",
            Self::OpenLibrary => "openlibrary",
            Self::GitHub => "github",
        }
    }

    /// Returns the human-readable name of this source.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wikipedia => "Wikipedia",
            Self::HackerNews => "Hacker News",
            Self::OpenLibrary => "Open Library",
            Self::GitHub => "GitHub",
        }
    }

    /// Returns every source in the order their results are concatenated.
    pub fn all() -> &'static [Source] {
        &[
            Self::Wikipedia,
            Self::HackerNews,
            Self::OpenLibrary,
            Self::GitHub,
        ]
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wikipedia-specific attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WikipediaMeta {
    /// 0-based position in Wikipedia's own search ranking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pageid: Option<u64>,
}

/// Hacker News attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HackerNewsMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_comments: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Open Library attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OpenLibraryMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edition_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
}

/// GitHub repository attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GitHubMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Provider tag plus the metadata that provider populates.
///
/// Serialized as two sibling fields, `"source"` and `"metadata"`, so a
/// result's JSON keeps the flat shape clients expect while the scoring code
/// matches on a closed set of variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "metadata", rename_all = "lowercase")]
pub enum SourceDetails {
    Wikipedia(WikipediaMeta),
    HackerNews(HackerNewsMeta),
    OpenLibrary(OpenLibraryMeta),
    GitHub(GitHubMeta),
}

impl SourceDetails {
    /// Returns which provider these details belong to.
    pub fn source(&self) -> Source {
        match self {
            Self::Wikipedia(_) => Source::Wikipedia,
            Self::HackerNews(_) => Source::HackerNews,
            Self::OpenLibrary(_) => Source::OpenLibrary,
            Self::GitHub(_) => Source::GitHub,
        }
    }
}

/// A normalized hit from any provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Provider-prefixed identifier, unique within one aggregation.
    pub id: String,
    pub title: String,
    /// Short description; provider default text when none is available.
    pub snippet: String,
    /// Canonical link to the original resource.
    pub url: String,
    /// Relevance in `[0, 100]`. Zero until ranked.
    pub score: f64,
    #[serde(flatten)]
    pub details: SourceDetails,
}

impl SearchResult {
    /// Returns which provider produced this result.
    pub fn source(&self) -> Source {
        self.details.source()
    }
}

/// One cached aggregation, replaced wholesale on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The query as the first caller typed it, before normalization.
    pub query: String,
    /// Scored results in ranked order.
    pub results: Vec<SearchResult>,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Outcome of [`crate::Aggregator::aggregate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub timestamp: i64,
    pub served_from_cache: bool,
}
