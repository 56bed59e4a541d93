/// Domain entities for catalog titles
use crate::modules::genres::Genre;
use crate::shared::domain::value_objects::MediaType;
use serde::{Deserialize, Serialize};

/// One movie or TV show as returned by a catalog listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleItem {
    /// Remote catalog id; unique together with `media_type`
    pub media_id: i64,
    pub media_type: MediaType,
    pub name: String,
    pub overview: String,
    pub popularity: f64,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_count: i64,
    pub vote_average: f64,
    pub genres: Vec<Genre>,
    /// Bookmark state when the item was last written to a cache
    pub is_watchlisted: bool,
}

impl TitleItem {
    /// Natural key used for replace-on-conflict in the cache
    pub fn natural_key(&self) -> (i64, MediaType) {
        (self.media_id, self.media_type)
    }
}

/// One fetched page of a catalog listing
#[derive(Debug, Clone, PartialEq)]
pub struct TitlePage {
    /// 1-based page number that was requested
    pub page: u32,
    pub items: Vec<TitleItem>,
    /// Entries the remote listed before unsupported media were filtered out
    pub remote_count: usize,
    pub total_pages: u32,
    pub total_results: u32,
}

impl TitlePage {
    /// True when no page follows this one.
    ///
    /// A page whose entries were all filtered out still has successors.
    pub fn is_last_page(&self) -> bool {
        self.remote_count == 0 || self.page >= self.total_pages
    }
}
