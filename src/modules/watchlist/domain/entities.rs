use crate::modules::catalog::TitleItem;
use crate::shared::domain::value_objects::MediaType;
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub media_id: i64,
    pub media_type: MediaType,
    pub name: String,
    pub poster_path: Option<String>,
    /// Milliseconds since the Unix epoch
    pub added_on: i64,
}

impl WatchlistEntry {
    /// Bookmark a title as of now
    pub fn from_title(title: &TitleItem) -> Self {
        Self {
            media_id: title.media_id,
            media_type: title.media_type,
            name: title.name.clone(),
            poster_path: title.poster_path.clone(),
            added_on: Utc::now().timestamp_millis(),
        }
    }

    pub fn key(&self) -> (i64, MediaType) {
        (self.media_id, self.media_type)
    }
}
