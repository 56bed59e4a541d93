/// Diesel row models for the per-category cache tables
use crate::modules::catalog::TitleItem;
use crate::modules::genres::Genre;
use crate::modules::title_cache::domain::{CachedTitle, RemoteKey};
use crate::shared::domain::value_objects::MediaType;
use crate::shared::errors::{AppError, AppResult};
use diesel::sql_types::{BigInt, Bool, Double, Integer, Nullable, Text};
use diesel::QueryableByName;

#[derive(QueryableByName, Debug, Clone)]
pub struct CachedTitleModel {
    #[diesel(sql_type = BigInt)]
    pub id: i64,
    #[diesel(sql_type = BigInt)]
    pub media_id: i64,
    #[diesel(sql_type = Text)]
    pub media_type: String,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Text)]
    pub overview: String,
    #[diesel(sql_type = Double)]
    pub popularity: f64,
    #[diesel(sql_type = Nullable<Text>)]
    pub poster_path: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub release_date: Option<String>,
    #[diesel(sql_type = BigInt)]
    pub vote_count: i64,
    #[diesel(sql_type = Double)]
    pub vote_average: f64,
    #[diesel(sql_type = Bool)]
    pub is_watchlisted: bool,
    #[diesel(sql_type = Integer)]
    pub page: i32,
}

impl CachedTitleModel {
    pub fn to_cached_title(self, genres: Vec<Genre>) -> AppResult<CachedTitle> {
        let media_type = self
            .media_type
            .parse::<MediaType>()
            .map_err(AppError::DatabaseError)?;

        Ok(CachedTitle {
            id: self.id,
            page: to_page(self.page)?,
            title: TitleItem {
                media_id: self.media_id,
                media_type,
                name: self.name,
                overview: self.overview,
                popularity: self.popularity,
                poster_path: self.poster_path,
                release_date: self.release_date,
                vote_count: self.vote_count,
                vote_average: self.vote_average,
                genres,
                is_watchlisted: self.is_watchlisted,
            },
        })
    }
}

/// Genre association joined with the global genre name
#[derive(QueryableByName, Debug, Clone)]
pub struct TitleGenreModel {
    #[diesel(sql_type = BigInt)]
    pub title_id: i64,
    #[diesel(sql_type = BigInt)]
    pub genre_id: i64,
    #[diesel(sql_type = Text)]
    pub name: String,
}

#[derive(QueryableByName, Debug, Clone)]
pub struct RemoteKeyModel {
    #[diesel(sql_type = BigInt)]
    pub title_id: i64,
    #[diesel(sql_type = Nullable<Integer>)]
    pub prev_key: Option<i32>,
    #[diesel(sql_type = Nullable<Integer>)]
    pub next_key: Option<i32>,
    #[diesel(sql_type = Integer)]
    pub current_page: i32,
    #[diesel(sql_type = BigInt)]
    pub created_on: i64,
}

impl RemoteKeyModel {
    pub fn to_remote_key(self) -> AppResult<RemoteKey> {
        Ok(RemoteKey {
            title_id: self.title_id,
            prev_key: self.prev_key.map(to_page).transpose()?,
            next_key: self.next_key.map(to_page).transpose()?,
            current_page: to_page(self.current_page)?,
            created_on: self.created_on,
        })
    }
}

#[derive(QueryableByName, Debug)]
pub struct IdResult {
    #[diesel(sql_type = BigInt)]
    pub id: i64,
}

#[derive(QueryableByName, Debug)]
pub struct CountResult {
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

#[derive(QueryableByName, Debug)]
pub struct LatestResult {
    #[diesel(sql_type = Nullable<BigInt>)]
    pub latest: Option<i64>,
}

fn to_page(raw: i32) -> AppResult<u32> {
    u32::try_from(raw)
        .map_err(|_| AppError::DatabaseError(format!("Negative page number {} in cache", raw)))
}

/// Page numbers are stored as SQLite INTEGER
pub fn page_to_sql(page: u32) -> AppResult<i32> {
    i32::try_from(page)
        .map_err(|_| AppError::InvalidInput(format!("Page number {} is out of range", page)))
}
