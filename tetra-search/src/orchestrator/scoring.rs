//! Heuristic relevance scoring for aggregated results.
//!
//! Each result gets a score in `[0, 100]`, the sum of three components:
//!
//! | component        | range | basis                                   |
//! |------------------|-------|-----------------------------------------|
//! | title relevance  | 0–40  | how the query appears in the title      |
//! | content quality  | 0–20  | snippet length in characters            |
//! | source signal    | 0–40  | provider metadata (rank, points, stars) |
//!
//! The sum is capped at 100. Scoring is a pure function of the result and
//! the query, so identical inputs always produce identical scores.

use crate::types::{SearchResult, SourceDetails};

/// Upper bound of a final score.
pub const MAX_SCORE: f64 = 100.0;

/// Score a single result against `query`.
///
/// # Scoring Formula
///
/// ```text
/// score = min(title_relevance + content_quality + source_signal, 100)
/// ```
pub fn score(result: &SearchResult, query: &str) -> f64 {
    let total = title_relevance(&result.title, query)
        + content_quality(&result.snippet)
        + source_signal(&result.details);
    total.min(MAX_SCORE)
}

/// Score every result and return them sorted by score, highest first.
///
/// The input is left untouched; scored copies are returned. The sort is
/// stable, so equal scores keep their input order.
pub fn rank(results: &[SearchResult], query: &str) -> Vec<SearchResult> {
    let mut ranked: Vec<SearchResult> = results
        .iter()
        .map(|result| SearchResult {
            score: score(result, query),
            ..result.clone()
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Title relevance, 0–40.
///
/// - exact (case-insensitive) match: 40
/// - title starts with the query: 35
/// - title contains the query: 20
/// - otherwise `matched_words / query_words * 15`
pub fn title_relevance(title: &str, query: &str) -> f64 {
    let title = title.to_lowercase();
    let query = query.to_lowercase();

    if title == query {
        return 40.0;
    }
    if title.starts_with(&query) {
        return 35.0;
    }
    if title.contains(&query) {
        return 20.0;
    }

    let words: Vec<&str> = query.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }
    let matched = words.iter().filter(|word| title.contains(**word)).count();
    matched as f64 / words.len() as f64 * 15.0
}

/// Content quality from snippet length in characters, 0–20.
pub fn content_quality(snippet: &str) -> f64 {
    match snippet.chars().count() {
        0 => 0.0,
        100..=500 => 20.0,
        50..=99 => 10.0,
        _ => 5.0,
    }
}

/// Provider-specific signal, 0–40.
pub fn source_signal(details: &SourceDetails) -> f64 {
    match details {
        // Position in Wikipedia's own ranking: 40 for the top hit, minus 5 per place.
        SourceDetails::Wikipedia(meta) => match meta.index {
            Some(index) => (40.0 - f64::from(index) * 5.0).max(5.0),
            None => 20.0,
        },
        // 0 points → 5, 100+ points → 40.
        SourceDetails::HackerNews(meta) => match meta.points {
            Some(points) => (5.0 + points as f64 / 100.0 * 35.0).min(40.0),
            None => 10.0,
        },
        // 0 stars → 5, 1000+ stars → 40.
        SourceDetails::GitHub(meta) => match meta.stars {
            Some(stars) => (5.0 + stars as f64 / 1000.0 * 35.0).min(40.0),
            None => 10.0,
        },
        // 10 plus 3 per edition, capped at 40.
        SourceDetails::OpenLibrary(meta) => match meta.edition_count {
            Some(editions) => (10.0 + editions as f64 * 3.0).min(40.0),
            None => 15.0,
        },
    }
}
