/// Keeps the global genre table in step with the remote catalog
use crate::modules::catalog::GenreSource;
use crate::modules::genres::domain::{Genre, GenreRepository, GenreTable};
use crate::shared::domain::value_objects::MediaType;
use crate::shared::errors::{AppError, FetchContext, FetchError};
use crate::shared::utils::logger::TimedOperation;
use crate::{log_error, log_info, log_warn};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreSyncOutcome {
    /// Table already populated and no refresh was requested
    Skipped { stored: i64 },
    /// Remote lists fetched and merged into the table
    Synced { upserted: usize },
}

#[derive(Error, Debug)]
pub enum GenreSyncError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Storage(#[from] AppError),
}

pub struct GenreSyncService {
    source: Arc<dyn GenreSource>,
    repository: Arc<dyn GenreRepository>,
}

impl GenreSyncService {
    pub fn new(source: Arc<dyn GenreSource>, repository: Arc<dyn GenreRepository>) -> Self {
        Self { source, repository }
    }

    /// Fetch movie and TV genre lists unless the table is already filled.
    ///
    /// Pass `force = true` to refresh names even when genres exist.
    pub async fn sync(&self, force: bool) -> Result<GenreSyncOutcome, GenreSyncError> {
        let stored = self.repository.count().await?;
        if stored > 0 && !force {
            return Ok(GenreSyncOutcome::Skipped { stored });
        }

        let timer = TimedOperation::new("genre_sync");
        let mut merged: BTreeMap<i64, String> = BTreeMap::new();
        for media_type in [MediaType::Movie, MediaType::Tv] {
            let genres = self
                .source
                .fetch_genres(media_type)
                .await
                .map_err(|e| e.in_context(FetchContext::Genres))?;
            for genre in genres {
                merged.entry(genre.id).or_insert(genre.name);
            }
        }

        if merged.is_empty() {
            log_warn!("Genre sync returned no genres from either list");
            return Err(GenreSyncError::Fetch(FetchError::nothing_found(
                FetchContext::Genres,
                "catalog returned empty genre lists",
            )));
        }

        let genres: Vec<Genre> = merged
            .into_iter()
            .map(|(id, name)| Genre::new(id, name))
            .collect();
        let upserted = self.repository.upsert_all(genres).await.map_err(|e| {
            log_error!("Failed to store synced genres: {}", e);
            e
        })?;

        timer.finish_with_info(&format!("{} genres", upserted));
        log_info!("Genre table synced with {} genres", upserted);
        Ok(GenreSyncOutcome::Synced { upserted })
    }

    /// Current genre lookup table
    pub async fn table(&self) -> Result<GenreTable, GenreSyncError> {
        Ok(self.repository.all().await?)
    }
}
