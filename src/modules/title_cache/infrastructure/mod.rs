mod models;
mod repository;
mod tables;

pub use repository::SqliteTitleCacheRepository;
pub use tables::{create_category_tables, CategoryTables};
