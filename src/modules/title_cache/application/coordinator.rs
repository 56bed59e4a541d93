//! Remote mediator for one request category
//!
//! Decides which remote page a load needs, fetches it and commits the rows
//! together with their page keys. Expected fetch failures come back as
//! `MediatorResult::Error`; nothing escapes as a panic.

use super::clock::{Clock, SystemClock};
use crate::modules::catalog::{RequestCategory, RequestParams, TitleItem, TitlePage, TitleSource};
use crate::modules::genres::{GenreRepository, GenreTable};
use crate::modules::title_cache::domain::{
    InitializeAction, LoadError, LoadType, MediatorResult, PageCommit, PageKeys, PagingState,
    RemoteKey, TitleCacheRepository,
};
use crate::modules::watchlist::WatchlistRepository;
use crate::shared::errors::FetchErrorKind;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Where a load should go next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageTarget {
    Fetch(u32),
    /// Nothing to fetch; carries the end-of-pagination flag to report
    Done(bool),
}

pub struct CacheCoordinator {
    category: RequestCategory,
    params: RequestParams,
    store: Arc<dyn TitleCacheRepository>,
    source: Arc<dyn TitleSource>,
    genres: Arc<dyn GenreRepository>,
    watchlist: Arc<dyn WatchlistRepository>,
    clock: Arc<dyn Clock>,
    cache_ttl: Duration,
    /// Set when this coordinator replaced one for other params
    refresh_pending: AtomicBool,
}

impl CacheCoordinator {
    pub fn new(
        store: Arc<dyn TitleCacheRepository>,
        source: Arc<dyn TitleSource>,
        genres: Arc<dyn GenreRepository>,
        watchlist: Arc<dyn WatchlistRepository>,
        params: RequestParams,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            category: store.category(),
            params,
            store,
            source,
            genres,
            watchlist,
            clock: Arc::new(SystemClock),
            cache_ttl,
            refresh_pending: AtomicBool::new(false),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Make the first `initialize` launch a refresh whatever the cache age.
    ///
    /// Rows a superseded coordinator commits after its category was cleared
    /// carry a fresh timestamp but belong to the old params.
    pub fn requiring_refresh(self) -> Self {
        self.refresh_pending.store(true, Ordering::Release);
        self
    }

    pub fn category(&self) -> RequestCategory {
        self.category
    }

    pub fn params(&self) -> &RequestParams {
        &self.params
    }

    pub fn store(&self) -> Arc<dyn TitleCacheRepository> {
        Arc::clone(&self.store)
    }

    /// Staleness check run once before the first load.
    ///
    /// An empty cache, or one whose time cannot be read, is stale.
    pub async fn initialize(&self) -> InitializeAction {
        if self.refresh_pending.swap(false, Ordering::AcqRel) {
            debug!(category = %self.category, "params replaced; refreshing");
            return InitializeAction::LaunchInitialRefresh;
        }

        let latest = match self.store.latest_creation_time().await {
            Ok(latest) => latest,
            Err(e) => {
                warn!(category = %self.category, error = %e, "cannot read cache age; refreshing");
                return InitializeAction::LaunchInitialRefresh;
            }
        };

        let Some(created_on) = latest else {
            debug!(category = %self.category, "cache empty; refreshing");
            return InitializeAction::LaunchInitialRefresh;
        };

        let ttl_ms = i64::try_from(self.cache_ttl.as_millis()).unwrap_or(i64::MAX);
        let age_ms = self.clock.now_millis().saturating_sub(created_on);

        if age_ms < ttl_ms {
            debug!(category = %self.category, age_ms, "cache fresh; skipping initial refresh");
            InitializeAction::SkipInitialRefresh
        } else {
            debug!(category = %self.category, age_ms, "cache stale; refreshing");
            InitializeAction::LaunchInitialRefresh
        }
    }

    /// Run one load; the token aborts at the next suspension point.
    ///
    /// A commit already handed to the blocking pool still runs to the end,
    /// so a page is either fully stored or not at all.
    pub async fn load_with_cancellation(
        &self,
        load_type: LoadType,
        state: &PagingState,
        token: &CancellationToken,
    ) -> MediatorResult {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(category = %self.category, %load_type, "load cancelled");
                MediatorResult::Error(LoadError::Cancelled)
            }
            result = self.load(load_type, state) => result,
        }
    }

    pub async fn load(&self, load_type: LoadType, state: &PagingState) -> MediatorResult {
        let page = match self.target_page(load_type, state).await {
            Ok(PageTarget::Fetch(page)) => page,
            Ok(PageTarget::Done(end_of_pagination_reached)) => {
                debug!(
                    category = %self.category,
                    %load_type,
                    end_of_pagination_reached,
                    "nothing to fetch"
                );
                return MediatorResult::success(end_of_pagination_reached);
            }
            Err(e) => return MediatorResult::Error(e),
        };

        match self.fetch_and_commit(load_type, page).await {
            Ok(end_of_pagination_reached) => MediatorResult::success(end_of_pagination_reached),
            Err(e) => {
                warn!(category = %self.category, %load_type, page, error = %e, "load failed");
                MediatorResult::Error(e)
            }
        }
    }

    async fn target_page(
        &self,
        load_type: LoadType,
        state: &PagingState,
    ) -> Result<PageTarget, LoadError> {
        match load_type {
            LoadType::Refresh => {
                let Some(anchor) = state.anchor_item() else {
                    return Ok(PageTarget::Fetch(1));
                };
                let key = self.remote_key(anchor.id).await?;
                Ok(PageTarget::Fetch(key.map(|k| k.current_page).unwrap_or(1)))
            }
            LoadType::Prepend => {
                let Some(first) = state.first_item() else {
                    return Ok(PageTarget::Done(false));
                };
                let key = self
                    .remote_key(first.id)
                    .await?
                    .ok_or(LoadError::MissingRemoteKey { title_id: first.id })?;
                Ok(key.prev_key.map_or(PageTarget::Done(true), PageTarget::Fetch))
            }
            LoadType::Append => {
                let Some(last) = state.last_item() else {
                    return Ok(PageTarget::Done(false));
                };
                let key = self
                    .remote_key(last.id)
                    .await?
                    .ok_or(LoadError::MissingRemoteKey { title_id: last.id })?;
                Ok(key.next_key.map_or(PageTarget::Done(true), PageTarget::Fetch))
            }
        }
    }

    async fn remote_key(&self, title_id: i64) -> Result<Option<RemoteKey>, LoadError> {
        self.store
            .get_remote_key(title_id)
            .await
            .map_err(|e| LoadError::Fatal(e.to_string()))
    }

    /// Fetch `page` and store it; returns the end-of-pagination flag.
    ///
    /// Pages whose entries were all filtered out are stepped over in the
    /// load direction so that paging keeps moving.
    async fn fetch_and_commit(&self, load_type: LoadType, page: u32) -> Result<bool, LoadError> {
        let genre_table = self
            .genres
            .all()
            .await
            .map_err(|e| LoadError::Fatal(e.to_string()))?;

        let mut page = page;
        let mut fetched = loop {
            let fetched = match self.fetch(page, &genre_table).await? {
                Some(fetched) => fetched,
                None => {
                    info!(category = %self.category, %load_type, page, "nothing found; end of pagination");
                    if load_type == LoadType::Refresh {
                        // A refresh that finds nothing leaves an empty listing
                        self.commit(load_type, page, Vec::new(), true).await?;
                    }
                    return Ok(true);
                }
            };

            if !fetched.items.is_empty() || fetched.is_last_page() {
                break fetched;
            }

            let next = match load_type {
                LoadType::Prepend if page <= 1 => {
                    debug!(category = %self.category, "first page filtered out entirely");
                    return Ok(true);
                }
                LoadType::Prepend => page - 1,
                LoadType::Refresh | LoadType::Append => page + 1,
            };
            debug!(
                category = %self.category,
                %load_type,
                page,
                next,
                "page filtered out entirely; stepping over it"
            );
            page = next;
        };

        let end_of_pagination = fetched.is_last_page();

        let bookmarks = self
            .watchlist
            .keys()
            .await
            .map_err(|e| LoadError::Fatal(e.to_string()))?;
        for item in &mut fetched.items {
            item.is_watchlisted = bookmarks.contains(&item.natural_key());
        }

        self.commit(load_type, page, fetched.items, end_of_pagination)
            .await?;
        Ok(end_of_pagination)
    }

    /// One remote page; `None` when the remote has nothing at `page`
    async fn fetch(
        &self,
        page: u32,
        genre_table: &GenreTable,
    ) -> Result<Option<TitlePage>, LoadError> {
        let fetched = AssertUnwindSafe(async {
            self.source
                .fetch_page(self.category, page, &self.params, genre_table)
                .await
        })
        .catch_unwind()
        .await
        .map_err(|_| {
            LoadError::Fatal(format!(
                "title source panicked while fetching {} page {}",
                self.category, page
            ))
        })?;

        match fetched {
            Ok(fetched) => Ok(Some(fetched)),
            Err(e) if e.kind == FetchErrorKind::NothingFound => Ok(None),
            Err(e) => Err(LoadError::Fetch(e)),
        }
    }

    async fn commit(
        &self,
        load_type: LoadType,
        page: u32,
        items: Vec<TitleItem>,
        end_of_pagination: bool,
    ) -> Result<(), LoadError> {
        let commit = PageCommit {
            items,
            keys: PageKeys::for_page(page, end_of_pagination, self.clock.now_millis()),
            clear_existing: load_type == LoadType::Refresh,
        };

        self.store
            .commit_page(commit)
            .await
            .map(|_| ())
            .map_err(|e| LoadError::Fatal(e.to_string()))
    }
}
