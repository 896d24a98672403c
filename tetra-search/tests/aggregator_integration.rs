//! Integration tests for the aggregation pipeline.
//!
//! Every provider is served by a local wiremock server loaded with the JSON
//! fixtures from `test-data/`, so the whole fan-out, fail-soft, rank, cache
//! path runs without touching the public APIs. Live tests are `#[ignore]`.

use std::sync::Arc;
use std::time::Duration;

use tetra_search::clock::{Clock, ManualClock};
use tetra_search::{Aggregator, ResultCache, SearchConfig, SearchError, Source};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WIKIPEDIA_SEARCH: &str = include_str!("../test-data/wikipedia_search.json");
const WIKIPEDIA_EXTRACTS: &str = include_str!("../test-data/wikipedia_extracts.json");
const HACKERNEWS: &str = include_str!("../test-data/hackernews.json");
const OPENLIBRARY: &str = include_str!("../test-data/openlibrary.json");
const GITHUB: &str = include_str!("../test-data/github.json");

/// Results the fixtures yield per aggregation: 3 + 3 + 3 + 2.
const FIXTURE_TOTAL: usize = 11;

/// Requests one full fan-out makes: two for Wikipedia, one for each other.
const REQUESTS_PER_FAN_OUT: usize = 5;

fn json(body: &'static str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/json")
}

fn config_for(server: &MockServer) -> SearchConfig {
    let mut config = SearchConfig {
        timeout_seconds: 2,
        ..Default::default()
    };
    let base = server.uri();
    config.endpoints.wikipedia = format!("{base}/w/api.php");
    config.endpoints.hackernews = format!("{base}/api/v1/search");
    config.endpoints.openlibrary = format!("{base}/search.json");
    config.endpoints.github = format!("{base}/search/repositories");
    config
}

async fn mount_wikipedia(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("list", "search"))
        .respond_with(json(WIKIPEDIA_SEARCH))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "extracts"))
        .respond_with(json(WIKIPEDIA_EXTRACTS))
        .mount(server)
        .await;
}

async fn mount_hackernews(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("tags", "story"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_openlibrary(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_github(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("sort", "stars"))
        .and(query_param("order", "desc"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_all(server: &MockServer) {
    mount_wikipedia(server).await;
    mount_hackernews(server, json(HACKERNEWS)).await;
    mount_openlibrary(server, json(OPENLIBRARY)).await;
    mount_github(server, json(GITHUB)).await;
}

fn aggregator(config: SearchConfig) -> (Aggregator, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let cache = Arc::new(ResultCache::with_clock(&config.cache, clock.clone()));
    let aggregator = Aggregator::new(config, cache).expect("valid config");
    (aggregator, clock)
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}

fn count_from(results: &[tetra_search::SearchResult], source: Source) -> usize {
    results.iter().filter(|r| r.source() == source).count()
}

fn assert_ranked(results: &[tetra_search::SearchResult]) {
    for result in results {
        assert!(
            (0.0..=100.0).contains(&result.score),
            "score out of range: {} for {}",
            result.score,
            result.id
        );
    }
    for pair in results.windows(2) {
        assert!(
            pair[0].score >= pair[1].score,
            "not sorted: {} ({}) before {} ({})",
            pair[0].id,
            pair[0].score,
            pair[1].id,
            pair[1].score
        );
    }
}

#[tokio::test]
async fn all_providers_merged_and_ranked() {
    let server = MockServer::start().await;
    mount_all(&server).await;
    let (aggregator, clock) = aggregator(config_for(&server));

    let outcome = aggregator.aggregate("rust").await.expect("aggregate");

    assert!(!outcome.served_from_cache);
    assert_eq!(outcome.query, "rust");
    assert_eq!(outcome.timestamp, clock.now_millis());
    assert_eq!(outcome.results.len(), FIXTURE_TOTAL);
    assert_eq!(count_from(&outcome.results, Source::Wikipedia), 3);
    assert_eq!(count_from(&outcome.results, Source::HackerNews), 3);
    assert_eq!(count_from(&outcome.results, Source::OpenLibrary), 3);
    assert_eq!(count_from(&outcome.results, Source::GitHub), 2);
    assert_ranked(&outcome.results);

    let exact = outcome
        .results
        .iter()
        .find(|r| r.id == "wikipedia-26041")
        .expect("exact match present");
    assert_eq!(exact.title, "Rust");
    assert_eq!(exact.score, 80.0);
    assert_eq!(outcome.results[0].id, "wikipedia-29414838");
}

#[tokio::test]
async fn equal_scores_keep_declaration_order() {
    let server = MockServer::start().await;
    mount_all(&server).await;
    let (aggregator, _) = aggregator(config_for(&server));

    let outcome = aggregator.aggregate("zzz").await.expect("aggregate");
    let position = |id: &str| {
        outcome
            .results
            .iter()
            .position(|r| r.id == id)
            .expect("result present")
    };

    // No title matches; each of these has a short snippet (5) and a
    // saturated popularity signal (40).
    let tied = ["hackernews-38000001", "openlibrary-/works/OL11111W", "github-12345"];
    for id in tied {
        assert_eq!(outcome.results[position(id)].score, 45.0, "{id}");
    }
    assert!(position(tied[0]) < position(tied[1]));
    assert!(position(tied[1]) < position(tied[2]));
    assert_ranked(&outcome.results);
}

#[tokio::test]
async fn provider_server_error_is_absorbed() {
    let server = MockServer::start().await;
    mount_wikipedia(&server).await;
    mount_hackernews(&server, ResponseTemplate::new(500)).await;
    mount_openlibrary(&server, json(OPENLIBRARY)).await;
    mount_github(&server, json(GITHUB)).await;
    let (aggregator, _) = aggregator(config_for(&server));

    let outcome = aggregator.aggregate("rust").await.expect("aggregate");

    assert_eq!(count_from(&outcome.results, Source::HackerNews), 0);
    assert_eq!(outcome.results.len(), FIXTURE_TOTAL - 3);
    assert_ranked(&outcome.results);
}

#[tokio::test]
async fn provider_network_error_is_absorbed() {
    let server = MockServer::start().await;
    mount_all(&server).await;
    let mut config = config_for(&server);
    // Nothing listens on port 1.
    config.endpoints.openlibrary = "http://127.0.0.1:1/search.json".into();
    let (aggregator, _) = aggregator(config);

    let outcome = aggregator.aggregate("rust").await.expect("aggregate");

    assert_eq!(count_from(&outcome.results, Source::OpenLibrary), 0);
    assert_eq!(count_from(&outcome.results, Source::Wikipedia), 3);
    assert_eq!(count_from(&outcome.results, Source::HackerNews), 3);
    assert_eq!(count_from(&outcome.results, Source::GitHub), 2);
    assert_ranked(&outcome.results);
}

#[tokio::test]
async fn malformed_payload_is_absorbed() {
    let server = MockServer::start().await;
    mount_wikipedia(&server).await;
    mount_hackernews(&server, json(HACKERNEWS)).await;
    mount_openlibrary(&server, json("{\"docs\": [ this is not json")).await;
    mount_github(&server, json(GITHUB)).await;
    let (aggregator, _) = aggregator(config_for(&server));

    let outcome = aggregator.aggregate("rust").await.expect("aggregate");

    assert_eq!(count_from(&outcome.results, Source::OpenLibrary), 0);
    assert_eq!(outcome.results.len(), FIXTURE_TOTAL - 3);
}

#[tokio::test]
async fn github_rate_limit_is_skipped() {
    let server = MockServer::start().await;
    mount_wikipedia(&server).await;
    mount_hackernews(&server, json(HACKERNEWS)).await;
    mount_openlibrary(&server, json(OPENLIBRARY)).await;
    mount_github(
        &server,
        ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "message": "API rate limit exceeded"
        })),
    )
    .await;
    let (aggregator, _) = aggregator(config_for(&server));

    let outcome = aggregator.aggregate("rust").await.expect("aggregate");

    assert_eq!(count_from(&outcome.results, Source::GitHub), 0);
    assert_eq!(outcome.results.len(), FIXTURE_TOTAL - 2);
}

#[tokio::test]
async fn all_providers_failing_yields_empty_success() {
    let server = MockServer::start().await;
    // No mocks mounted: wiremock answers 404 to everything.
    let (aggregator, _) = aggregator(config_for(&server));

    let outcome = aggregator.aggregate("rust").await.expect("aggregate");

    assert!(outcome.results.is_empty());
    assert!(!outcome.served_from_cache);
}

#[tokio::test]
async fn missing_collections_yield_empty_contributions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(json("{\"batchcomplete\": \"\"}"))
        .mount(&server)
        .await;
    mount_hackernews(&server, json("{\"nbHits\": 0}")).await;
    mount_openlibrary(&server, json("{\"numFound\": 0}")).await;
    mount_github(&server, json("{\"total_count\": 0}")).await;
    let (aggregator, _) = aggregator(config_for(&server));

    let outcome = aggregator.aggregate("rust").await.expect("aggregate");

    assert!(outcome.results.is_empty());
    // Wikipedia skips the extract request when the search list is absent.
    assert_eq!(request_count(&server).await, 4);
}

#[tokio::test]
async fn results_per_source_is_forwarded_and_enforced() {
    let server = MockServer::start().await;
    mount_all(&server).await;
    let config = SearchConfig {
        results_per_source: 1,
        ..config_for(&server)
    };
    let (aggregator, _) = aggregator(config);

    let outcome = aggregator.aggregate("rust").await.expect("aggregate");

    assert_eq!(outcome.results.len(), 4);
    let requests = server.received_requests().await.expect("recording enabled");
    let github = requests
        .iter()
        .find(|r| r.url.path() == "/search/repositories")
        .expect("github request");
    assert!(github
        .url
        .query_pairs()
        .any(|(k, v)| k == "per_page" && v == "1"));
}

#[tokio::test]
async fn second_request_served_from_cache() {
    let server = MockServer::start().await;
    mount_all(&server).await;
    let (aggregator, clock) = aggregator(config_for(&server));

    let first = aggregator.aggregate("Rust").await.expect("first");
    assert_eq!(request_count(&server).await, REQUESTS_PER_FAN_OUT);

    clock.advance(Duration::from_secs(60));
    let second = aggregator.aggregate("  rust  ").await.expect("second");

    assert!(second.served_from_cache);
    assert_eq!(second.query, "Rust");
    assert_eq!(second.timestamp, first.timestamp);
    assert_eq!(second.results, first.results);
    assert_eq!(request_count(&server).await, REQUESTS_PER_FAN_OUT);
}

#[tokio::test]
async fn expired_entry_triggers_fresh_fan_out() {
    let server = MockServer::start().await;
    mount_all(&server).await;
    let (aggregator, clock) = aggregator(config_for(&server));

    let first = aggregator.aggregate("rust").await.expect("first");
    clock.advance(Duration::from_secs(5 * 60 + 1));
    let second = aggregator.aggregate("rust").await.expect("second");

    assert!(!second.served_from_cache);
    assert!(second.timestamp > first.timestamp);
    assert_eq!(request_count(&server).await, 2 * REQUESTS_PER_FAN_OUT);
}

#[tokio::test]
async fn blank_query_makes_no_requests() {
    let server = MockServer::start().await;
    mount_all(&server).await;
    let (aggregator, _) = aggregator(config_for(&server));

    let err = aggregator.aggregate("  ").await.unwrap_err();

    assert!(matches!(err, SearchError::EmptyQuery));
    assert_eq!(request_count(&server).await, 0);
    assert!(aggregator.cache().is_empty());
}

#[tokio::test]
#[ignore] // Requires network access
async fn live_aggregation_returns_results() {
    let (aggregator, _) = aggregator(SearchConfig::default());
    let outcome = aggregator.aggregate("rust programming").await.expect("aggregate");
    assert!(!outcome.results.is_empty());
    assert_ranked(&outcome.results);
}
