pub mod modules;
pub mod shared;

use modules::{
    catalog::TmdbAdapter,
    genres::{GenreRepository, GenreSyncService, SqliteGenreRepository},
    title_cache::{create_category_tables, TitleCacheService},
    watchlist::{SqliteWatchlistRepository, WatchlistRepository},
};
use shared::errors::AppResult;
use shared::{AppConfig, Database};
use std::sync::Arc;

/// Open the database, apply migrations and create every category's cache tables
pub fn initialize_database(config: &AppConfig) -> AppResult<Arc<Database>> {
    let database = Database::new(config)?;
    database.run_migrations()?;
    create_category_tables(&database)?;
    Ok(Arc::new(database))
}

/// Wired services sharing one database and one catalog adapter
pub struct AppServices {
    pub database: Arc<Database>,
    pub genre_sync: Arc<GenreSyncService>,
    pub watchlist: Arc<dyn WatchlistRepository>,
    pub title_cache: Arc<TitleCacheService>,
}

impl AppServices {
    pub fn build(config: &AppConfig) -> AppResult<Self> {
        let database = initialize_database(config)?;
        Ok(Self::with_database(config, database))
    }

    pub fn with_database(config: &AppConfig, database: Arc<Database>) -> Self {
        let tmdb = Arc::new(TmdbAdapter::new(config));

        let genre_repo: Arc<dyn GenreRepository> =
            Arc::new(SqliteGenreRepository::new(Arc::clone(&database)));
        let watchlist: Arc<dyn WatchlistRepository> =
            Arc::new(SqliteWatchlistRepository::new(Arc::clone(&database)));

        let genre_sync = Arc::new(GenreSyncService::new(tmdb.clone(), Arc::clone(&genre_repo)));

        let title_cache = Arc::new(TitleCacheService::with_database(
            Arc::clone(&database),
            tmdb,
            genre_repo,
            Arc::clone(&watchlist),
            config.cache_ttl,
        ));

        Self {
            database,
            genre_sync,
            watchlist,
            title_cache,
        }
    }
}
