/// Offline-first title cache
///
/// One cache store per request category and a coordinator that keeps it in
/// step with the remote catalog through refresh, prepend and append loads.
///
/// Architecture:
/// - Domain: cached rows, remote keys, paging state, load outcomes
/// - Infrastructure: per-category SQLite tables
/// - Application: cache coordinator, page streams, coordinator registry
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{CacheCoordinator, Clock, FixedClock, SystemClock, TitleCacheService};
pub use domain::{
    CachedTitle, InitializeAction, LoadError, LoadType, LoadedPage, MediatorResult, PageCommit,
    PageKeys, PagingState, RemoteKey, TitleCacheRepository,
};
pub use infrastructure::{create_category_tables, CategoryTables, SqliteTitleCacheRepository};
