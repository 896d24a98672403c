//! Wikipedia source: MediaWiki full-text search plus intro extracts.
//!
//! Two requests per query: `list=search` to find pages, then
//! `prop=extracts` for the plain-text intro of every page found.

use std::collections::HashMap;

use scraper::Html;
use serde::Deserialize;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http::{self, truncate_chars};
use crate::source::SourceAdapter;
use crate::types::{SearchResult, Source, SourceDetails, WikipediaMeta};

/// Articles are linked on the public site, not the API host.
const ARTICLE_BASE_URL: &str = "https://en.wikipedia.org/wiki/";

const MAX_SNIPPET_CHARS: usize = 300;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Option<Vec<SearchHit>>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    pageid: u64,
    title: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    #[serde(default)]
    extract: Option<String>,
}

/// Wikipedia adapter.
pub struct WikipediaSource;

impl SourceAdapter for WikipediaSource {
    async fn fetch(
        &self,
        client: &reqwest::Client,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Wikipedia search");

        let limit = config.results_per_source.to_string();
        let request = client.get(&config.endpoints.wikipedia).query(&[
            ("action", "query"),
            ("list", "search"),
            ("srsearch", query),
            ("format", "json"),
            ("srlimit", limit.as_str()),
        ]);
        let response = http::send(request, Source::Wikipedia).await?;
        let search: SearchResponse = http::read_json(response, Source::Wikipedia).await?;

        let hits = match search.query.and_then(|q| q.search) {
            Some(hits) if !hits.is_empty() => hits,
            _ => return Ok(Vec::new()),
        };

        let page_ids = hits
            .iter()
            .map(|hit| hit.pageid.to_string())
            .collect::<Vec<_>>()
            .join("|");
        let request = client.get(&config.endpoints.wikipedia).query(&[
            ("action", "query"),
            ("prop", "extracts"),
            ("exintro", ""),
            ("explaintext", ""),
            ("pageids", page_ids.as_str()),
            ("format", "json"),
        ]);
        let response = http::send(request, Source::Wikipedia).await?;
        let extracts: ExtractResponse = http::read_json(response, Source::Wikipedia).await?;
        let pages = extracts.query.map(|q| q.pages).unwrap_or_default();

        Ok(build_results(hits, &pages, config.results_per_source))
    }

    fn source(&self) -> Source {
        Source::Wikipedia
    }
}

fn build_results(
    hits: Vec<SearchHit>,
    pages: &HashMap<String, ExtractPage>,
    max_results: usize,
) -> Vec<SearchResult> {
    hits.into_iter()
        .take(max_results)
        .enumerate()
        .map(|(index, hit)| {
            let extract = pages
                .get(&hit.pageid.to_string())
                .and_then(|page| page.extract.as_deref())
                .filter(|text| !text.is_empty());
            let snippet = match extract {
                Some(text) => text.to_string(),
                None => strip_markup(&hit.snippet),
            };

            SearchResult {
                id: format!("wikipedia-{}", hit.pageid),
                url: article_url(&hit.title),
                title: hit.title,
                snippet: truncate_chars(&snippet, MAX_SNIPPET_CHARS),
                score: 0.0,
                details: SourceDetails::Wikipedia(WikipediaMeta {
                    index: u32::try_from(index).ok(),
                    pageid: Some(hit.pageid),
                }),
            }
        })
        .collect()
}

/// Remove HTML tags (search-match highlighting) from a search snippet.
pub(crate) fn strip_markup(fragment: &str) -> String {
    Html::parse_fragment(fragment)
        .root_element()
        .text()
        .collect::<String>()
}

fn article_url(title: &str) -> String {
    format!(
        "{ARTICLE_BASE_URL}{}",
        urlencoding::encode(&title.replace(' ', "_"))
    )
}
