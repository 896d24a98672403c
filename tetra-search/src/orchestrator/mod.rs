//! Search orchestrator: concurrent provider queries, scoring, ranking.
//!
//! This module fans a query out to every provider concurrently, concatenates
//! whatever each contributes, scores every result against the query and
//! returns a stable-sorted list through the shared result cache.

pub mod aggregate;
pub mod scoring;

pub use aggregate::{query_source, Aggregator};
