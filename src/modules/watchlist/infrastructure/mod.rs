mod models;
mod repository;

pub use repository::SqliteWatchlistRepository;
