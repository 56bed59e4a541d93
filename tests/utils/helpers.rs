/// Test doubles and service builders
use super::test_db::TestDb;
use async_trait::async_trait;
use cinelist_lib::modules::catalog::{RequestCategory, RequestParams, TitlePage, TitleSource};
use cinelist_lib::modules::genres::{GenreRepository, GenreTable, SqliteGenreRepository};
use cinelist_lib::modules::title_cache::{
    CacheCoordinator, Clock, FixedClock, SqliteTitleCacheRepository, TitleCacheRepository,
    TitleCacheService,
};
use cinelist_lib::modules::watchlist::{SqliteWatchlistRepository, WatchlistRepository};
use cinelist_lib::shared::errors::{FetchContext, FetchError, FetchResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_TTL: Duration = Duration::from_secs(60 * 60);
pub const TEST_NOW: i64 = 1_700_000_000_000;

/// Title source answering from a per-page script and recording every call
#[derive(Default)]
pub struct ScriptedSource {
    pages: Mutex<HashMap<u32, FetchResult<TitlePage>>>,
    calls: Mutex<Vec<(RequestCategory, u32, RequestParams)>>,
    genre_table_sizes: Mutex<Vec<usize>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page: TitlePage) -> Self {
        self.set_page(page);
        self
    }

    pub fn with_error(self, page: u32, error: FetchError) -> Self {
        self.pages.lock().unwrap().insert(page, Err(error));
        self
    }

    pub fn set_page(&self, page: TitlePage) {
        self.pages.lock().unwrap().insert(page.page, Ok(page));
    }

    pub fn calls(&self) -> Vec<(RequestCategory, u32, RequestParams)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.calls().into_iter().map(|(_, page, _)| page).collect()
    }

    pub fn genre_table_sizes(&self) -> Vec<usize> {
        self.genre_table_sizes.lock().unwrap().clone()
    }
}

#[async_trait]
impl TitleSource for ScriptedSource {
    async fn fetch_page(
        &self,
        category: RequestCategory,
        page: u32,
        params: &RequestParams,
        genres: &GenreTable,
    ) -> FetchResult<TitlePage> {
        self.calls
            .lock()
            .unwrap()
            .push((category, page, params.clone()));
        self.genre_table_sizes.lock().unwrap().push(genres.len());

        self.pages
            .lock()
            .unwrap()
            .get(&page)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::nothing_found(
                    category.fetch_context(),
                    format!("no scripted page {}", page),
                ))
            })
    }
}

pub fn offline() -> FetchError {
    FetchError::no_connection(FetchContext::Titles, "network unreachable")
}

pub struct CoordinatorHarness {
    pub store: Arc<SqliteTitleCacheRepository>,
    pub source: Arc<ScriptedSource>,
    pub watchlist: Arc<SqliteWatchlistRepository>,
    pub clock: Arc<FixedClock>,
    pub coordinator: CacheCoordinator,
}

/// Coordinator over real SQLite stores with a scripted source and fixed clock
pub fn coordinator_for(
    test_db: &TestDb,
    category: RequestCategory,
    params: RequestParams,
    source: ScriptedSource,
) -> CoordinatorHarness {
    let store = Arc::new(SqliteTitleCacheRepository::new(test_db.db(), category));
    let source = Arc::new(source);
    let watchlist = Arc::new(SqliteWatchlistRepository::new(test_db.db()));
    let genres: Arc<dyn GenreRepository> = Arc::new(SqliteGenreRepository::new(test_db.db()));
    let clock = Arc::new(FixedClock::new(TEST_NOW));

    let coordinator = CacheCoordinator::new(
        store.clone() as Arc<dyn TitleCacheRepository>,
        source.clone() as Arc<dyn TitleSource>,
        genres,
        watchlist.clone() as Arc<dyn WatchlistRepository>,
        params,
        TEST_TTL,
    )
    .with_clock(clock.clone() as Arc<dyn Clock>);

    CoordinatorHarness {
        store,
        source,
        watchlist,
        clock,
        coordinator,
    }
}

/// Service over every category's SQLite store
pub fn title_cache_service(test_db: &TestDb, source: Arc<ScriptedSource>) -> TitleCacheService {
    TitleCacheService::with_database(
        test_db.db(),
        source,
        Arc::new(SqliteGenreRepository::new(test_db.db())),
        Arc::new(SqliteWatchlistRepository::new(test_db.db())),
        TEST_TTL,
    )
    .with_clock(Arc::new(FixedClock::new(TEST_NOW)))
}
