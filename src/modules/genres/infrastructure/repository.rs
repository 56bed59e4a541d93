/// Diesel-based implementation of GenreRepository
use super::models::{CountResult, GenreModel};
use crate::log_debug;
use crate::modules::genres::domain::{Genre, GenreRepository, GenreTable};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::Database;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use std::sync::Arc;
use tokio::task;

pub struct SqliteGenreRepository {
    db: Arc<Database>,
}

impl SqliteGenreRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GenreRepository for SqliteGenreRepository {
    async fn all(&self) -> AppResult<GenreTable> {
        let db = Arc::clone(&self.db);

        let models = task::spawn_blocking(move || -> AppResult<Vec<GenreModel>> {
            let mut conn = db.get_connection()?;
            let rows = diesel::sql_query("SELECT id, name FROM genres ORDER BY id")
                .load::<GenreModel>(&mut conn)?;
            Ok(rows)
        })
        .await??;

        Ok(GenreTable::new(models.into_iter().map(|m| m.to_genre())))
    }

    async fn upsert_all(&self, genres: Vec<Genre>) -> AppResult<usize> {
        if genres.is_empty() {
            return Ok(0);
        }

        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<usize> {
            db.write_transaction(|conn| {
                for genre in &genres {
                    diesel::sql_query(
                        "INSERT INTO genres (id, name) VALUES (?, ?)
                         ON CONFLICT(id) DO UPDATE SET name = excluded.name",
                    )
                    .bind::<BigInt, _>(genre.id)
                    .bind::<Text, _>(&genre.name)
                    .execute(conn)
                    .map_err(|e| {
                        AppError::DatabaseError(format!(
                            "Failed to upsert genre {}: {}",
                            genre.id, e
                        ))
                    })?;
                }
                log_debug!("Upserted {} genres", genres.len());
                Ok(genres.len())
            })
        })
        .await?
    }

    async fn count(&self) -> AppResult<i64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> AppResult<i64> {
            let mut conn = db.get_connection()?;
            let result: CountResult = diesel::sql_query("SELECT COUNT(*) AS count FROM genres")
                .get_result(&mut conn)?;
            Ok(result.count)
        })
        .await?
    }
}
