/// Repository trait for the global genre table
use super::entities::{Genre, GenreTable};
use crate::shared::errors::AppResult;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreRepository: Send + Sync {
    /// Load the full table as an id -> name lookup
    async fn all(&self) -> AppResult<GenreTable>;

    /// Insert or rename genres in one transaction. Existing ids are kept
    /// because cached genre associations reference them.
    async fn upsert_all(&self, genres: Vec<Genre>) -> AppResult<usize>;

    /// Number of stored genres
    async fn count(&self) -> AppResult<i64>;
}
