//! Tetra: multi-source search aggregator server.
//!
//! Serves the [`tetra_search`] aggregation over HTTP:
//! request → cache → concurrent fan-out to Wikipedia, Hacker News,
//! Open Library and GitHub → rank → cache → response.
//!
//! # Architecture
//!
//! - **Config**: TOML file with `[http]` listener and `[search]` settings
//! - **Server**: axum router with `/search`, `/search/export` and `/health`,
//!   permissive CORS, graceful shutdown on Ctrl-C
//! - **Search**: one process-wide [`tetra_search::Aggregator`] sharing one
//!   [`tetra_search::ResultCache`]

pub mod config;
pub mod error;
pub mod server;

pub use config::{HttpConfig, ServerConfig};
pub use error::{Result, ServerError};
pub use server::{router, serve, serve_with_shutdown};
