pub mod catalog;
pub mod genres;
pub mod title_cache;
pub mod watchlist;
