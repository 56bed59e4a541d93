/// Test data factories using builder pattern
///
/// Provides convenient methods to create test data with sensible defaults
use cinelist_lib::modules::catalog::{TitleItem, TitlePage};
use cinelist_lib::modules::genres::Genre;
use cinelist_lib::shared::domain::value_objects::MediaType;

pub struct TitleFactory {
    media_id: i64,
    media_type: MediaType,
    name: String,
    overview: String,
    popularity: f64,
    vote_average: f64,
    genres: Vec<Genre>,
}

impl TitleFactory {
    pub fn movie(media_id: i64) -> Self {
        Self {
            media_id,
            media_type: MediaType::Movie,
            name: format!("Movie {}", media_id),
            overview: "An overview".to_string(),
            popularity: 10.0,
            vote_average: 7.0,
            genres: vec![],
        }
    }

    pub fn tv(media_id: i64) -> Self {
        Self {
            media_type: MediaType::Tv,
            name: format!("Show {}", media_id),
            ..Self::movie(media_id)
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn overview(mut self, overview: &str) -> Self {
        self.overview = overview.to_string();
        self
    }

    pub fn vote_average(mut self, vote_average: f64) -> Self {
        self.vote_average = vote_average;
        self
    }

    pub fn genres(mut self, genres: Vec<Genre>) -> Self {
        self.genres = genres;
        self
    }

    pub fn build(self) -> TitleItem {
        TitleItem {
            media_id: self.media_id,
            media_type: self.media_type,
            name: self.name,
            overview: self.overview,
            popularity: self.popularity,
            poster_path: Some(format!("/poster_{}.jpg", self.media_id)),
            release_date: Some("2024-05-01".to_string()),
            vote_count: 1200,
            vote_average: self.vote_average,
            genres: self.genres,
            is_watchlisted: false,
        }
    }
}

/// `count` distinct movies for `page`; media ids are `page * 1000 + n`
pub fn movies_for_page(page: u32, count: usize) -> Vec<TitleItem> {
    (0..count)
        .map(|n| TitleFactory::movie(page as i64 * 1000 + n as i64).build())
        .collect()
}

pub fn title_page(page: u32, count: usize, total_pages: u32) -> TitlePage {
    TitlePage {
        page,
        items: movies_for_page(page, count),
        remote_count: count,
        total_pages,
        total_results: total_pages * count as u32,
    }
}

/// A page whose `listed` remote entries were all dropped, e.g. people only
pub fn filtered_page(page: u32, listed: usize, total_pages: u32) -> TitlePage {
    TitlePage {
        items: Vec::new(),
        ..title_page(page, listed, total_pages)
    }
}
