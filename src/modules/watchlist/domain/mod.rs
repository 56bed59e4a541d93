mod entities;
mod repository;

pub use entities::WatchlistEntry;
pub use repository::WatchlistRepository;

#[cfg(test)]
pub use repository::MockWatchlistRepository;
