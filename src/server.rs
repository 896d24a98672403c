//! HTTP boundary: axum router, handlers and the listener loop.
//!
//! Routes:
//!
//! - `GET /search?q=` ranked aggregation as JSON
//! - `GET /search/export?q=&format=json|csv|xml|xlsx` ranked aggregation as a
//!   downloadable document
//! - `GET /health` liveness probe
//!
//! Every response carries permissive CORS headers and `OPTIONS` preflights
//! are answered directly with `204 No Content`.

use std::future::Future;
use std::sync::Arc;

use axum::extract::{Query, Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tetra_search::{Aggregator, ExportFormat, ResultCache, SearchError, SearchResult};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::Result;

const MISSING_QUERY: &str = "Query parameter \"q\" is required";
const SEARCH_FAILED: &str = "An error occurred while searching";

const CORS_ALLOW_METHODS: &str = "GET, OPTIONS";
const CORS_ALLOW_HEADERS: &str = "Content-Type";

#[derive(Clone)]
struct AppState {
    aggregator: Arc<Aggregator>,
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
}

#[derive(Deserialize)]
struct ExportParams {
    q: Option<String>,
    format: Option<String>,
}

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    results: Vec<SearchResult>,
    timestamp: i64,
    cached: bool,
}

/// Build the application router over a shared aggregator.
pub fn router(aggregator: Arc<Aggregator>) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/search/export", get(export_results))
        .route("/health", get(health))
        .layer(middleware::from_fn(cors))
        .with_state(AppState { aggregator })
}

/// Bind the configured address and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the address cannot be
/// bound, or the server fails while running.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let addr = config.http.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    let cache = Arc::new(ResultCache::new(&config.search.cache));
    let aggregator = Arc::new(Aggregator::new(config.search, cache)?);
    serve_with_shutdown(listener, aggregator, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the listener fails.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    aggregator: Arc<Aggregator>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener.local_addr()?;
    tracing::info!("tetra listening on http://{local_addr}");
    axum::serve(listener, router(aggregator))
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("tetra server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let Some(query) = non_blank(params.q) else {
        return bad_request(MISSING_QUERY);
    };

    match state.aggregator.aggregate(&query).await {
        Ok(outcome) => Json(SearchResponse {
            query: outcome.query,
            results: outcome.results,
            timestamp: outcome.timestamp,
            cached: outcome.served_from_cache,
        })
        .into_response(),
        Err(err) => search_failed(err),
    }
}

async fn export_results(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> Response {
    let Some(query) = non_blank(params.q) else {
        return bad_request(MISSING_QUERY);
    };
    let format = match params.format.as_deref().unwrap_or("json").parse::<ExportFormat>() {
        Ok(format) => format,
        Err(err) => return bad_request(&err.to_string()),
    };

    let outcome = match state.aggregator.aggregate(&query).await {
        Ok(outcome) => outcome,
        Err(err) => return search_failed(err),
    };

    let exported_at = chrono::Utc::now();
    let body = match tetra_search::export(&outcome.results, format, exported_at) {
        Ok(body) => body,
        Err(err) => return search_failed(err),
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(format.content_type()),
    );
    let disposition = format!("attachment; filename=\"{}\"", format.file_name(exported_at));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    tracing::debug!(%format, count = outcome.results.len(), "exported results");
    (StatusCode::OK, headers, body).into_response()
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().timestamp_millis(),
    }))
}

async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
    response
}

fn non_blank(query: Option<String>) -> Option<String> {
    query.filter(|q| !q.trim().is_empty())
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": message})),
    )
        .into_response()
}

fn search_failed(err: SearchError) -> Response {
    if matches!(err, SearchError::EmptyQuery) {
        return bad_request(MISSING_QUERY);
    }
    tracing::error!(error = %err, "search request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": SEARCH_FAILED,
            "details": err.to_string(),
        })),
    )
        .into_response()
}
