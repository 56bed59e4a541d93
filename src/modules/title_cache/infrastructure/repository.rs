/// Diesel-based implementation of TitleCacheRepository over one category's tables
use super::models::{
    page_to_sql, CachedTitleModel, CountResult, IdResult, LatestResult, RemoteKeyModel,
    TitleGenreModel,
};
use super::tables::CategoryTables;
use crate::modules::catalog::{RequestCategory, TitleItem};
use crate::modules::genres::Genre;
use crate::modules::title_cache::domain::{
    CachedTitle, PageCommit, PageKeys, RemoteKey, TitleCacheRepository,
};
use crate::shared::application::{PaginatedResult, PaginationParams};
use crate::shared::domain::value_objects::MediaType;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;
use crate::shared::Database;
use crate::log_debug;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Double, Integer, Nullable, Text};
use diesel::sqlite::SqliteConnection;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task;

pub struct SqliteTitleCacheRepository {
    db: Arc<Database>,
    category: RequestCategory,
    tables: Arc<CategoryTables>,
}

impl SqliteTitleCacheRepository {
    pub fn new(db: Arc<Database>, category: RequestCategory) -> Self {
        Self {
            db,
            category,
            tables: Arc::new(CategoryTables::for_category(category)),
        }
    }

    /// Create this category's tables if missing
    pub async fn ensure_schema(&self) -> AppResult<()> {
        let db = Arc::clone(&self.db);
        let sql = self.tables.create_sql();
        task::spawn_blocking(move || db.execute_batch(&sql)).await?
    }

    pub fn tables(&self) -> &CategoryTables {
        &self.tables
    }
}

/// Remove every row and its genre associations
fn delete_all_rows(conn: &mut SqliteConnection, tables: &CategoryTables) -> AppResult<usize> {
    diesel::sql_query(format!("DELETE FROM {}", tables.genres)).execute(conn)?;
    let deleted = diesel::sql_query(format!("DELETE FROM {}", tables.titles)).execute(conn)?;
    Ok(deleted)
}

fn delete_all_keys(conn: &mut SqliteConnection, tables: &CategoryTables) -> AppResult<usize> {
    let deleted = diesel::sql_query(format!("DELETE FROM {}", tables.keys)).execute(conn)?;
    Ok(deleted)
}

/// Drop the row holding `(media_id, media_type)`, with its genres and key
fn delete_existing(
    conn: &mut SqliteConnection,
    tables: &CategoryTables,
    item: &TitleItem,
) -> AppResult<()> {
    let existing: Option<IdResult> = diesel::sql_query(format!(
        "SELECT id FROM {} WHERE media_id = ? AND media_type = ?",
        tables.titles
    ))
    .bind::<BigInt, _>(item.media_id)
    .bind::<Text, _>(item.media_type.as_str())
    .get_result(conn)
    .optional()?;

    if let Some(IdResult { id }) = existing {
        diesel::sql_query(format!("DELETE FROM {} WHERE title_id = ?", tables.keys))
            .bind::<BigInt, _>(id)
            .execute(conn)?;
        diesel::sql_query(format!("DELETE FROM {} WHERE title_id = ?", tables.genres))
            .bind::<BigInt, _>(id)
            .execute(conn)?;
        diesel::sql_query(format!("DELETE FROM {} WHERE id = ?", tables.titles))
            .bind::<BigInt, _>(id)
            .execute(conn)?;
    }
    Ok(())
}

/// Insert rows, genre links and keys; must run inside a transaction
fn insert_rows(
    conn: &mut SqliteConnection,
    tables: &CategoryTables,
    items: &[TitleItem],
    keys: &PageKeys,
) -> AppResult<Vec<i64>> {
    let page = page_to_sql(keys.current_page)?;
    let prev_key = keys.prev_key.map(page_to_sql).transpose()?;
    let next_key = keys.next_key.map(page_to_sql).transpose()?;

    // A title listed twice keeps only the row of its last occurrence
    let mut inserted: Vec<((i64, MediaType), i64)> = Vec::with_capacity(items.len());

    for item in items {
        delete_existing(conn, tables, item)?;

        diesel::sql_query(format!(
            "INSERT INTO {} (media_id, media_type, name, overview, popularity, poster_path,
                release_date, vote_count, vote_average, is_watchlisted, page)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            tables.titles
        ))
        .bind::<BigInt, _>(item.media_id)
        .bind::<Text, _>(item.media_type.as_str())
        .bind::<Text, _>(&item.name)
        .bind::<Text, _>(&item.overview)
        .bind::<Double, _>(item.popularity)
        .bind::<Nullable<Text>, _>(&item.poster_path)
        .bind::<Nullable<Text>, _>(&item.release_date)
        .bind::<BigInt, _>(item.vote_count)
        .bind::<Double, _>(item.vote_average)
        .bind::<Bool, _>(item.is_watchlisted)
        .bind::<Integer, _>(page)
        .execute(conn)?;

        let IdResult { id } =
            diesel::sql_query("SELECT last_insert_rowid() AS id").get_result(conn)?;

        for (position, genre) in item.genres.iter().enumerate() {
            diesel::sql_query(format!(
                "INSERT OR IGNORE INTO {} (title_id, genre_id, position) VALUES (?, ?, ?)",
                tables.genres
            ))
            .bind::<BigInt, _>(id)
            .bind::<BigInt, _>(genre.id)
            .bind::<Integer, _>(position as i32)
            .execute(conn)
            .map_err(|e| {
                AppError::DatabaseError(format!(
                    "Failed to link genre {} to {} {}: {}",
                    genre.id, item.media_type, item.media_id, e
                ))
            })?;
        }

        diesel::sql_query(format!(
            "INSERT INTO {} (title_id, prev_key, next_key, current_page, created_on)
             VALUES (?, ?, ?, ?, ?)",
            tables.keys
        ))
        .bind::<BigInt, _>(id)
        .bind::<Nullable<Integer>, _>(prev_key)
        .bind::<Nullable<Integer>, _>(next_key)
        .bind::<Integer, _>(page)
        .bind::<BigInt, _>(keys.created_on)
        .execute(conn)?;

        let key = item.natural_key();
        inserted.retain(|(existing, _)| *existing != key);
        inserted.push((key, id));
    }

    Ok(inserted.into_iter().map(|(_, id)| id).collect())
}

fn load_genres(
    conn: &mut SqliteConnection,
    tables: &CategoryTables,
    params: &PaginationParams,
) -> AppResult<HashMap<i64, Vec<Genre>>> {
    let rows = diesel::sql_query(format!(
        "SELECT tg.title_id, tg.genre_id, g.name
         FROM {genres} tg
         JOIN genres g ON g.id = tg.genre_id
         WHERE tg.title_id IN (SELECT id FROM {titles} ORDER BY page, id LIMIT ? OFFSET ?)
         ORDER BY tg.title_id, tg.position",
        genres = tables.genres,
        titles = tables.titles
    ))
    .bind::<BigInt, _>(params.limit())
    .bind::<BigInt, _>(params.offset())
    .load::<TitleGenreModel>(conn)?;

    let mut by_title: HashMap<i64, Vec<Genre>> = HashMap::new();
    for row in rows {
        by_title
            .entry(row.title_id)
            .or_default()
            .push(Genre::new(row.genre_id, row.name));
    }
    Ok(by_title)
}

#[async_trait]
impl TitleCacheRepository for SqliteTitleCacheRepository {
    fn category(&self) -> RequestCategory {
        self.category
    }

    async fn commit_page(&self, commit: PageCommit) -> AppResult<Vec<i64>> {
        let db = Arc::clone(&self.db);
        let tables = Arc::clone(&self.tables);
        let category = self.category;

        task::spawn_blocking(move || -> AppResult<Vec<i64>> {
            let started = std::time::Instant::now();
            let ids = db.write_transaction(|conn| {
                if commit.clear_existing {
                    let rows = delete_all_rows(conn, &tables)?;
                    let keys = delete_all_keys(conn, &tables)?;
                    log_debug!(
                        "Cleared {} rows and {} keys from {}",
                        rows,
                        keys,
                        tables.titles
                    );
                }
                insert_rows(conn, &tables, &commit.items, &commit.keys)
            })?;

            LogContext::page_commit(
                category.prefix(),
                commit.page(),
                ids.len(),
                commit.clear_existing,
            );
            LogContext::db_operation(
                "commit_page",
                &tables.titles,
                Some(started.elapsed().as_millis() as u64),
            );
            Ok(ids)
        })
        .await?
    }

    async fn insert_page(&self, items: Vec<TitleItem>, keys: PageKeys) -> AppResult<Vec<i64>> {
        let db = Arc::clone(&self.db);
        let tables = Arc::clone(&self.tables);

        task::spawn_blocking(move || -> AppResult<Vec<i64>> {
            db.write_transaction(|conn| insert_rows(conn, &tables, &items, &keys))
        })
        .await?
    }

    async fn paged_read(
        &self,
        params: PaginationParams,
    ) -> AppResult<PaginatedResult<CachedTitle>> {
        let db = Arc::clone(&self.db);
        let tables = Arc::clone(&self.tables);

        task::spawn_blocking(move || -> AppResult<PaginatedResult<CachedTitle>> {
            db.read_transaction(|conn| {
                let total: CountResult =
                    diesel::sql_query(format!("SELECT COUNT(*) AS count FROM {}", tables.titles))
                        .get_result(conn)?;

                let rows = diesel::sql_query(format!(
                    "SELECT id, media_id, media_type, name, overview, popularity, poster_path,
                        release_date, vote_count, vote_average, is_watchlisted, page
                     FROM {} ORDER BY page, id LIMIT ? OFFSET ?",
                    tables.titles
                ))
                .bind::<BigInt, _>(params.limit())
                .bind::<BigInt, _>(params.offset())
                .load::<CachedTitleModel>(conn)?;

                let mut genres = load_genres(conn, &tables, &params)?;

                let items = rows
                    .into_iter()
                    .map(|row| {
                        let row_genres = genres.remove(&row.id).unwrap_or_default();
                        row.to_cached_title(row_genres)
                    })
                    .collect::<AppResult<Vec<_>>>()?;

                Ok(PaginatedResult::new(items, total.count.max(0) as u64, &params))
            })
        })
        .await?
    }

    async fn clear_all(&self) -> AppResult<usize> {
        let db = Arc::clone(&self.db);
        let tables = Arc::clone(&self.tables);

        task::spawn_blocking(move || -> AppResult<usize> {
            db.write_transaction(|conn| delete_all_rows(conn, &tables))
        })
        .await?
    }

    async fn clear_keys(&self) -> AppResult<usize> {
        let db = Arc::clone(&self.db);
        let tables = Arc::clone(&self.tables);

        task::spawn_blocking(move || -> AppResult<usize> {
            db.write_transaction(|conn| delete_all_keys(conn, &tables))
        })
        .await?
    }

    async fn get_remote_key(&self, title_id: i64) -> AppResult<Option<RemoteKey>> {
        let db = Arc::clone(&self.db);
        let tables = Arc::clone(&self.tables);

        let model = task::spawn_blocking(move || -> AppResult<Option<RemoteKeyModel>> {
            let mut conn = db.get_connection()?;
            let key = diesel::sql_query(format!(
                "SELECT title_id, prev_key, next_key, current_page, created_on
                 FROM {} WHERE title_id = ?",
                tables.keys
            ))
            .bind::<BigInt, _>(title_id)
            .get_result::<RemoteKeyModel>(&mut conn)
            .optional()?;
            Ok(key)
        })
        .await??;

        model.map(|m| m.to_remote_key()).transpose()
    }

    async fn latest_creation_time(&self) -> AppResult<Option<i64>> {
        let db = Arc::clone(&self.db);
        let tables = Arc::clone(&self.tables);

        task::spawn_blocking(move || -> AppResult<Option<i64>> {
            let mut conn = db.get_connection()?;
            let result: LatestResult = diesel::sql_query(format!(
                "SELECT MAX(created_on) AS latest FROM {}",
                tables.keys
            ))
            .get_result(&mut conn)?;
            Ok(result.latest)
        })
        .await?
    }

    async fn count(&self) -> AppResult<i64> {
        let db = Arc::clone(&self.db);
        let tables = Arc::clone(&self.tables);

        task::spawn_blocking(move || -> AppResult<i64> {
            let mut conn = db.get_connection()?;
            let result: CountResult =
                diesel::sql_query(format!("SELECT COUNT(*) AS count FROM {}", tables.titles))
                    .get_result(&mut conn)?;
            Ok(result.count)
        })
        .await?
    }

    async fn set_watchlisted(
        &self,
        media_id: i64,
        media_type: MediaType,
        watchlisted: bool,
    ) -> AppResult<usize> {
        let db = Arc::clone(&self.db);
        let tables = Arc::clone(&self.tables);

        task::spawn_blocking(move || -> AppResult<usize> {
            let mut conn = db.get_connection()?;
            let updated = diesel::sql_query(format!(
                "UPDATE {} SET is_watchlisted = ? WHERE media_id = ? AND media_type = ?",
                tables.titles
            ))
            .bind::<Bool, _>(watchlisted)
            .bind::<BigInt, _>(media_id)
            .bind::<Text, _>(media_type.as_str())
            .execute(&mut conn)?;
            Ok(updated)
        })
        .await?
    }
}
