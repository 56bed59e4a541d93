use super::clock::{Clock, SystemClock};
use super::coordinator::CacheCoordinator;
use super::page_stream::{page_stream, snapshot};
use crate::modules::catalog::{RequestCategory, RequestParams, TitleSource};
use crate::modules::genres::GenreRepository;
use crate::modules::title_cache::domain::{CachedTitle, PagingState, TitleCacheRepository};
use crate::modules::title_cache::infrastructure::SqliteTitleCacheRepository;
use crate::modules::watchlist::{WatchlistEntry, WatchlistRepository};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::Database;
use crate::{log_debug, log_info};
use dashmap::DashMap;
use futures::Stream;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Registry of one cache coordinator per category plus cache-wide operations
pub struct TitleCacheService {
    stores: HashMap<RequestCategory, Arc<dyn TitleCacheRepository>>,
    source: Arc<dyn TitleSource>,
    genres: Arc<dyn GenreRepository>,
    watchlist: Arc<dyn WatchlistRepository>,
    clock: Arc<dyn Clock>,
    cache_ttl: Duration,
    coordinators: DashMap<RequestCategory, Arc<CacheCoordinator>>,
}

impl TitleCacheService {
    pub fn new(
        stores: Vec<Arc<dyn TitleCacheRepository>>,
        source: Arc<dyn TitleSource>,
        genres: Arc<dyn GenreRepository>,
        watchlist: Arc<dyn WatchlistRepository>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            stores: stores
                .into_iter()
                .map(|store| (store.category(), store))
                .collect(),
            source,
            genres,
            watchlist,
            clock: Arc::new(SystemClock),
            cache_ttl,
            coordinators: DashMap::new(),
        }
    }

    /// SQLite-backed stores for every category
    pub fn with_database(
        db: Arc<Database>,
        source: Arc<dyn TitleSource>,
        genres: Arc<dyn GenreRepository>,
        watchlist: Arc<dyn WatchlistRepository>,
        cache_ttl: Duration,
    ) -> Self {
        let stores = RequestCategory::ALL
            .iter()
            .map(|category| {
                Arc::new(SqliteTitleCacheRepository::new(Arc::clone(&db), *category))
                    as Arc<dyn TitleCacheRepository>
            })
            .collect();
        Self::new(stores, source, genres, watchlist, cache_ttl)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self, category: RequestCategory) -> AppResult<Arc<dyn TitleCacheRepository>> {
        self.stores
            .get(&category)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("No cache store for {}", category)))
    }

    /// Coordinator for `category` and `params`.
    ///
    /// The same instance is returned while params stay equal. New params
    /// replace the coordinator and clear the category, since cached rows
    /// belong to the old query.
    pub async fn coordinator(
        &self,
        category: RequestCategory,
        params: RequestParams,
    ) -> AppResult<Arc<CacheCoordinator>> {
        params.validate_for(category)?;

        let previous = self.coordinators.get(&category).map(|c| Arc::clone(c.value()));
        if let Some(existing) = &previous {
            if existing.params() == &params {
                return Ok(Arc::clone(existing));
            }
        }

        if previous.is_some() {
            let cleared = self.clear_category(category).await?;
            log_info!(
                "Parameters for {} changed; cleared {} cached rows",
                category,
                cleared
            );
        }

        let mut coordinator = CacheCoordinator::new(
            self.store(category)?,
            Arc::clone(&self.source),
            Arc::clone(&self.genres),
            Arc::clone(&self.watchlist),
            params,
            self.cache_ttl,
        )
        .with_clock(Arc::clone(&self.clock));
        if previous.is_some() {
            coordinator = coordinator.requiring_refresh();
        }
        let coordinator = Arc::new(coordinator);
        self.coordinators
            .insert(category, Arc::clone(&coordinator));
        log_debug!("Registered cache coordinator for {}", category);

        Ok(coordinator)
    }

    /// Ordered pages of cached rows for UI consumers
    pub fn page_stream(
        &self,
        category: RequestCategory,
        page_size: u32,
    ) -> AppResult<impl Stream<Item = AppResult<Vec<CachedTitle>>>> {
        Ok(page_stream(self.store(category)?, page_size))
    }

    /// Current cache of `category` as a paging state
    pub async fn snapshot(
        &self,
        category: RequestCategory,
        anchor_position: Option<usize>,
    ) -> AppResult<PagingState> {
        snapshot(self.store(category)?, anchor_position).await
    }

    /// Drop rows and keys of one category. Returns rows removed.
    pub async fn clear_category(&self, category: RequestCategory) -> AppResult<usize> {
        let store = self.store(category)?;
        let rows = store.clear_all().await?;
        store.clear_keys().await?;
        Ok(rows)
    }

    pub async fn clear_all_caches(&self) -> AppResult<usize> {
        let mut total = 0;
        for category in RequestCategory::ALL {
            if self.stores.contains_key(&category) {
                total += self.clear_category(category).await?;
            }
        }
        log_info!("Cleared {} cached rows across all categories", total);
        Ok(total)
    }

    /// Add or remove a bookmark and mirror it into every cached copy.
    /// Returns the number of cached rows updated.
    pub async fn set_watchlisted(&self, entry: WatchlistEntry, watchlisted: bool) -> AppResult<usize> {
        let (media_id, media_type) = entry.key();
        if watchlisted {
            self.watchlist.add(entry).await?;
        } else {
            self.watchlist.remove(media_id, media_type).await?;
        }

        let mut updated = 0;
        for store in self.stores.values() {
            updated += store
                .set_watchlisted(media_id, media_type, watchlisted)
                .await?;
        }
        log_debug!(
            "{} {} watchlisted={} in {} cached rows",
            media_type,
            media_id,
            watchlisted,
            updated
        );
        Ok(updated)
    }
}
