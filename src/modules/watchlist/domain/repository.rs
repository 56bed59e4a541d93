use super::entities::WatchlistEntry;
use crate::shared::domain::value_objects::MediaType;
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use std::collections::HashSet;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WatchlistRepository: Send + Sync {
    /// Insert or replace the bookmark for the entry's title
    async fn add(&self, entry: WatchlistEntry) -> AppResult<()>;

    /// Returns true when a bookmark was removed
    async fn remove(&self, media_id: i64, media_type: MediaType) -> AppResult<bool>;

    async fn contains(&self, media_id: i64, media_type: MediaType) -> AppResult<bool>;

    /// All bookmarks, newest first
    async fn list(&self) -> AppResult<Vec<WatchlistEntry>>;

    /// Natural keys of every bookmarked title
    async fn keys(&self) -> AppResult<HashSet<(i64, MediaType)>>;
}
