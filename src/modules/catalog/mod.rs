/// Remote title catalog
///
/// Fetches one page of titles per request category from the remote movie
/// catalog API and maps them to domain `TitleItem`s.
///
/// Architecture:
/// - Domain: title entities, request categories/filters, source traits
/// - Infrastructure: TMDB adapter over a rate-limited HTTP client
pub mod domain;
pub mod infrastructure;

// Re-exports for easy access
pub use domain::{
    entities::{TitleItem, TitlePage},
    repositories::{GenreSource, TitleSource},
    value_objects::{DiscoverFilter, RequestCategory, RequestParams, SortOrder},
};
pub use infrastructure::{RateLimitClient, RetryPolicy, TmdbAdapter};
