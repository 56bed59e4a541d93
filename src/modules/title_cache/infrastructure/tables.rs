//! Per-category cache tables
//!
//! Each request category owns three tables named after its prefix. Names are
//! derived from the closed category enum, never from user input.

use crate::log_info;
use crate::modules::catalog::RequestCategory;
use crate::shared::errors::AppResult;
use crate::shared::Database;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTables {
    pub titles: String,
    pub genres: String,
    pub keys: String,
}

impl CategoryTables {
    pub fn for_category(category: RequestCategory) -> Self {
        let prefix = category.prefix();
        Self {
            titles: format!("{}_titles", prefix),
            genres: format!("{}_title_genres", prefix),
            keys: format!("{}_remote_keys", prefix),
        }
    }

    /// Idempotent DDL for the three tables
    pub fn create_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {titles} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                media_id BIGINT NOT NULL,
                media_type TEXT NOT NULL CHECK (media_type IN ('movie', 'tv')),
                name TEXT NOT NULL,
                overview TEXT NOT NULL,
                popularity DOUBLE NOT NULL,
                poster_path TEXT,
                release_date TEXT,
                vote_count BIGINT NOT NULL,
                vote_average DOUBLE NOT NULL,
                is_watchlisted BOOLEAN NOT NULL DEFAULT 0,
                page INTEGER NOT NULL,
                UNIQUE (media_id, media_type)
            );
            CREATE INDEX IF NOT EXISTS {titles}_page_idx ON {titles} (page, id);
            CREATE TABLE IF NOT EXISTS {genres} (
                title_id INTEGER NOT NULL REFERENCES {titles} (id) ON DELETE CASCADE,
                genre_id BIGINT NOT NULL REFERENCES genres (id),
                position INTEGER NOT NULL,
                PRIMARY KEY (title_id, genre_id)
            );
            CREATE TABLE IF NOT EXISTS {keys} (
                title_id INTEGER PRIMARY KEY NOT NULL,
                prev_key INTEGER,
                next_key INTEGER,
                current_page INTEGER NOT NULL,
                created_on BIGINT NOT NULL
            );",
            titles = self.titles,
            genres = self.genres,
            keys = self.keys,
        )
    }
}

/// Create cache tables for every category; requires the global genres table
pub fn create_category_tables(db: &Database) -> AppResult<()> {
    for category in RequestCategory::ALL {
        db.execute_batch(&CategoryTables::for_category(category).create_sql())?;
    }
    log_info!(
        "Cache tables ready for {} categories",
        RequestCategory::ALL.len()
    );
    Ok(())
}
