//! Open Library source.
//!
//! Book hits carry no description, so the snippet is synthesised from the
//! authors, first publication year and leading subjects.

use serde::Deserialize;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http::{self, truncate_chars};
use crate::source::SourceAdapter;
use crate::types::{OpenLibraryMeta, SearchResult, Source, SourceDetails};

const SITE_BASE_URL: &str = "https://openlibrary.org";

const MAX_SNIPPET_CHARS: usize = 300;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Option<Vec<Doc>>,
}

#[derive(Debug, Deserialize)]
struct Doc {
    key: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author_name: Option<Vec<String>>,
    #[serde(default)]
    first_publish_year: Option<i32>,
    #[serde(default)]
    subject: Option<Vec<String>>,
    #[serde(default)]
    edition_count: Option<u64>,
}

/// Open Library adapter.
pub struct OpenLibrarySource;

impl SourceAdapter for OpenLibrarySource {
    async fn fetch(
        &self,
        client: &reqwest::Client,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Open Library search");

        let limit = config.results_per_source.to_string();
        let request = client
            .get(&config.endpoints.openlibrary)
            .query(&[("q", query), ("limit", limit.as_str())]);
        let response = http::send(request, Source::OpenLibrary).await?;
        let body: SearchResponse = http::read_json(response, Source::OpenLibrary).await?;

        Ok(build_results(
            body.docs.unwrap_or_default(),
            config.results_per_source,
        ))
    }

    fn source(&self) -> Source {
        Source::OpenLibrary
    }
}

fn build_results(docs: Vec<Doc>, max_results: usize) -> Vec<SearchResult> {
    docs.into_iter()
        .take(max_results)
        .map(|doc| {
            let snippet = truncate_chars(&describe(&doc), MAX_SNIPPET_CHARS);
            SearchResult {
                id: format!("openlibrary-{}", doc.key),
                url: format!("{SITE_BASE_URL}{}", doc.key),
                title: doc
                    .title
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "No title".to_string()),
                snippet,
                score: 0.0,
                details: SourceDetails::OpenLibrary(OpenLibraryMeta {
                    edition_count: Some(doc.edition_count.filter(|&n| n > 0).unwrap_or(1)),
                    publish_year: doc.first_publish_year,
                    authors: doc.author_name,
                }),
            }
        })
        .collect()
}

/// `By <authors> (<year>). <subjects>`
fn describe(doc: &Doc) -> String {
    let authors = doc
        .author_name
        .as_ref()
        .map(|names| names.join(", "))
        .filter(|joined| !joined.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());
    let year = doc
        .first_publish_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let subjects = doc
        .subject
        .as_ref()
        .map(|subjects| {
            subjects
                .iter()
                .take(3)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .filter(|joined| !joined.is_empty())
        .unwrap_or_else(|| "No subjects listed".to_string());

    format!("By {authors} ({year}). {subjects}")
}
