/// User bookmarks
///
/// The watchlist outlives every cache refresh; cached rows only mirror its
/// state through `is_watchlisted`.
pub mod domain;
pub mod infrastructure;

pub use domain::{WatchlistEntry, WatchlistRepository};
pub use infrastructure::SqliteWatchlistRepository;
