/// Local cache store of one request category
use crate::modules::catalog::{RequestCategory, TitleItem};
use crate::modules::title_cache::domain::entities::{CachedTitle, PageCommit, PageKeys, RemoteKey};
use crate::shared::application::{PaginatedResult, PaginationParams};
use crate::shared::domain::value_objects::MediaType;
use crate::shared::errors::AppResult;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TitleCacheRepository: Send + Sync {
    fn category(&self) -> RequestCategory;

    /// Apply one page (optional clear, rows, genres, keys) atomically.
    /// Returns the ids assigned to the inserted rows, in item order.
    async fn commit_page(&self, commit: PageCommit) -> AppResult<Vec<i64>>;

    /// Insert rows with replace-on-conflict on `(media_id, media_type)`
    async fn insert_page(&self, items: Vec<TitleItem>, keys: PageKeys) -> AppResult<Vec<i64>>;

    /// Rows ordered by page, then row id
    async fn paged_read(
        &self,
        params: PaginationParams,
    ) -> AppResult<PaginatedResult<CachedTitle>>;

    /// Delete every row (genre associations cascade). Returns rows removed.
    async fn clear_all(&self) -> AppResult<usize>;

    /// Delete every key row. Returns rows removed.
    async fn clear_keys(&self) -> AppResult<usize>;

    async fn get_remote_key(&self, title_id: i64) -> AppResult<Option<RemoteKey>>;

    /// Newest `created_on` over all key rows, `None` when empty
    async fn latest_creation_time(&self) -> AppResult<Option<i64>>;

    async fn count(&self) -> AppResult<i64>;

    /// Rewrite the bookmark flag of every row for this title
    async fn set_watchlisted(
        &self,
        media_id: i64,
        media_type: MediaType,
        watchlisted: bool,
    ) -> AppResult<usize>;
}
