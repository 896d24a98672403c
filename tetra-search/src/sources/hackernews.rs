//! Hacker News source, backed by the Algolia search API.

use serde::Deserialize;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::source::SourceAdapter;
use crate::types::{HackerNewsMeta, SearchResult, Source, SourceDetails};

const ITEM_BASE_URL: &str = "https://news.ycombinator.com/item?id=";

pub(crate) const NO_DESCRIPTION: &str = "No description available";

#[derive(Debug, Deserialize)]
struct AlgoliaResponse {
    #[serde(default)]
    hits: Option<Vec<Hit>>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "objectID")]
    object_id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    story_text: Option<String>,
    #[serde(default)]
    comment_text: Option<String>,
    #[serde(default)]
    points: Option<u64>,
    #[serde(default)]
    num_comments: Option<u64>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

/// Hacker News adapter (stories only).
pub struct HackerNewsSource;

impl SourceAdapter for HackerNewsSource {
    async fn fetch(
        &self,
        client: &reqwest::Client,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Hacker News search");

        let per_page = config.results_per_source.to_string();
        let request = client.get(&config.endpoints.hackernews).query(&[
            ("query", query),
            ("tags", "story"),
            ("hitsPerPage", per_page.as_str()),
        ]);
        let response = http::send(request, Source::HackerNews).await?;
        let body: AlgoliaResponse = http::read_json(response, Source::HackerNews).await?;

        Ok(build_results(
            body.hits.unwrap_or_default(),
            config.results_per_source,
        ))
    }

    fn source(&self) -> Source {
        Source::HackerNews
    }
}

fn build_results(hits: Vec<Hit>, max_results: usize) -> Vec<SearchResult> {
    hits.into_iter()
        .take(max_results)
        .map(|hit| {
            let snippet = non_empty(hit.story_text)
                .or_else(|| non_empty(hit.comment_text))
                .unwrap_or_else(|| NO_DESCRIPTION.to_string());
            let url = non_empty(hit.url)
                .unwrap_or_else(|| format!("{ITEM_BASE_URL}{}", hit.object_id));

            SearchResult {
                id: format!("hackernews-{}", hit.object_id),
                title: non_empty(hit.title).unwrap_or_else(|| "No title".to_string()),
                snippet,
                url,
                score: 0.0,
                details: SourceDetails::HackerNews(HackerNewsMeta {
                    points: Some(hit.points.unwrap_or(0)),
                    num_comments: Some(hit.num_comments.unwrap_or(0)),
                    author: hit.author,
                    created_at: hit.created_at,
                }),
            }
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
