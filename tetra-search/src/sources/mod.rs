//! Provider source implementations.
//!
//! Each module provides a struct implementing [`crate::source::SourceAdapter`]
//! for one provider's public JSON API.

pub mod github;
pub mod hackernews;
pub mod openlibrary;
pub mod wikipedia;

pub use github::GitHubSource;
pub use hackernews::HackerNewsSource;
pub use openlibrary::OpenLibrarySource;
pub use wikipedia::WikipediaSource;
