/// Diesel-based implementation of WatchlistRepository
use super::models::{parse_media_type, CountResult, WatchlistKeyModel, WatchlistModel};
use crate::log_debug;
use crate::modules::watchlist::domain::{WatchlistEntry, WatchlistRepository};
use crate::shared::domain::value_objects::MediaType;
use crate::shared::errors::AppResult;
use crate::shared::Database;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable, Text};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task;

pub struct SqliteWatchlistRepository {
    db: Arc<Database>,
}

impl SqliteWatchlistRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WatchlistRepository for SqliteWatchlistRepository {
    async fn add(&self, entry: WatchlistEntry) -> AppResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<()> {
            let mut conn = db.get_connection()?;
            diesel::sql_query(
                "INSERT OR REPLACE INTO watchlist (media_id, media_type, name, poster_path, added_on)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind::<BigInt, _>(entry.media_id)
            .bind::<Text, _>(entry.media_type.as_str())
            .bind::<Text, _>(&entry.name)
            .bind::<Nullable<Text>, _>(entry.poster_path.as_deref())
            .bind::<BigInt, _>(entry.added_on)
            .execute(&mut conn)?;

            log_debug!(
                "Watchlisted {} {} ({})",
                entry.media_type,
                entry.media_id,
                entry.name
            );
            Ok(())
        })
        .await?
    }

    async fn remove(&self, media_id: i64, media_type: MediaType) -> AppResult<bool> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<bool> {
            let mut conn = db.get_connection()?;
            let deleted =
                diesel::sql_query("DELETE FROM watchlist WHERE media_id = ? AND media_type = ?")
                    .bind::<BigInt, _>(media_id)
                    .bind::<Text, _>(media_type.as_str())
                    .execute(&mut conn)?;
            Ok(deleted > 0)
        })
        .await?
    }

    async fn contains(&self, media_id: i64, media_type: MediaType) -> AppResult<bool> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<bool> {
            let mut conn = db.get_connection()?;
            let result: CountResult = diesel::sql_query(
                "SELECT COUNT(*) AS count FROM watchlist WHERE media_id = ? AND media_type = ?",
            )
            .bind::<BigInt, _>(media_id)
            .bind::<Text, _>(media_type.as_str())
            .get_result(&mut conn)?;
            Ok(result.count > 0)
        })
        .await?
    }

    async fn list(&self) -> AppResult<Vec<WatchlistEntry>> {
        let db = Arc::clone(&self.db);

        let models = task::spawn_blocking(move || -> AppResult<Vec<WatchlistModel>> {
            let mut conn = db.get_connection()?;
            let rows = diesel::sql_query(
                "SELECT media_id, media_type, name, poster_path, added_on
                 FROM watchlist ORDER BY added_on DESC, media_id",
            )
            .load::<WatchlistModel>(&mut conn)?;
            Ok(rows)
        })
        .await??;

        models.into_iter().map(|m| m.to_entry()).collect()
    }

    async fn keys(&self) -> AppResult<HashSet<(i64, MediaType)>> {
        let db = Arc::clone(&self.db);

        let rows = task::spawn_blocking(move || -> AppResult<Vec<WatchlistKeyModel>> {
            let mut conn = db.get_connection()?;
            let rows = diesel::sql_query("SELECT media_id, media_type FROM watchlist")
                .load::<WatchlistKeyModel>(&mut conn)?;
            Ok(rows)
        })
        .await??;

        rows.into_iter()
            .map(|row| Ok((row.media_id, parse_media_type(&row.media_type)?)))
            .collect()
    }
}
