use crate::modules::watchlist::domain::WatchlistEntry;
use crate::shared::domain::value_objects::MediaType;
use crate::shared::errors::{AppError, AppResult};
use diesel::sql_types::{BigInt, Nullable, Text};
use diesel::QueryableByName;

#[derive(QueryableByName, Debug, Clone)]
pub struct WatchlistModel {
    #[diesel(sql_type = BigInt)]
    pub media_id: i64,
    #[diesel(sql_type = Text)]
    pub media_type: String,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub poster_path: Option<String>,
    #[diesel(sql_type = BigInt)]
    pub added_on: i64,
}

impl WatchlistModel {
    pub fn to_entry(self) -> AppResult<WatchlistEntry> {
        Ok(WatchlistEntry {
            media_id: self.media_id,
            media_type: parse_media_type(&self.media_type)?,
            name: self.name,
            poster_path: self.poster_path,
            added_on: self.added_on,
        })
    }
}

#[derive(QueryableByName, Debug)]
pub struct WatchlistKeyModel {
    #[diesel(sql_type = BigInt)]
    pub media_id: i64,
    #[diesel(sql_type = Text)]
    pub media_type: String,
}

#[derive(QueryableByName, Debug)]
pub struct CountResult {
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}

pub fn parse_media_type(raw: &str) -> AppResult<MediaType> {
    raw.parse::<MediaType>().map_err(AppError::DatabaseError)
}
