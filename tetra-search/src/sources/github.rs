//! GitHub repository search.
//!
//! Unauthenticated requests are heavily rate limited; GitHub answers those
//! with HTTP 403, which this adapter treats as "no results" rather than a
//! failure.

use reqwest::header;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::source::SourceAdapter;
use crate::sources::hackernews::NO_DESCRIPTION;
use crate::types::{GitHubMeta, SearchResult, Source, SourceDetails};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Option<Vec<Repository>>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    html_url: String,
    #[serde(default)]
    stargazers_count: Option<u64>,
    #[serde(default)]
    forks_count: Option<u64>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

/// GitHub adapter, ordered by star count.
pub struct GitHubSource;

impl SourceAdapter for GitHubSource {
    async fn fetch(
        &self,
        client: &reqwest::Client,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "GitHub search");

        let per_page = config.results_per_source.to_string();
        let request = client
            .get(&config.endpoints.github)
            .header(header::ACCEPT, GITHUB_ACCEPT)
            .query(&[
                ("q", query),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
            ]);
        let response = http::send(request, Source::GitHub).await?;

        if response.status() == StatusCode::FORBIDDEN {
            tracing::warn!("GitHub API rate limit exceeded, skipping source");
            return Ok(Vec::new());
        }

        let body: SearchResponse = http::read_json(response, Source::GitHub).await?;
        Ok(build_results(
            body.items.unwrap_or_default(),
            config.results_per_source,
        ))
    }

    fn source(&self) -> Source {
        Source::GitHub
    }
}

fn build_results(repos: Vec<Repository>, max_results: usize) -> Vec<SearchResult> {
    repos
        .into_iter()
        .take(max_results)
        .map(|repo| {
            let title = repo
                .full_name
                .filter(|n| !n.is_empty())
                .or(repo.name)
                .unwrap_or_default();
            SearchResult {
                id: format!("github-{}", repo.id),
                title,
                snippet: repo
                    .description
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                url: repo.html_url,
                score: 0.0,
                details: SourceDetails::GitHub(GitHubMeta {
                    stars: Some(repo.stargazers_count.unwrap_or(0)),
                    forks: Some(repo.forks_count.unwrap_or(0)),
                    language: repo.language,
                    updated_at: repo.updated_at,
                }),
            }
        })
        .collect()
}
