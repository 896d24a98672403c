//! Error types for the tetra server.

use tetra_search::SearchError;

/// Top-level error type for the server process.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Listener or file I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised by the search library.
    #[error("search error: {0}")]
    Search(#[from] SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ServerError>;
