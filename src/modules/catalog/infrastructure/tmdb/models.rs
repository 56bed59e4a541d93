use serde::{Deserialize, Serialize};

// Response envelopes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmdbError {
    pub status_code: u16,
    pub status_message: String,
    #[serde(default)]
    pub success: Option<bool>,
}

/// Listing entry. Movies carry `title`/`release_date`, TV shows carry
/// `name`/`first_air_date`; mixed listings add `media_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmdbTitle {
    pub id: i64,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreListResponse {
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmdbGenre {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trending_page_deserializes() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 550, "media_type": "movie", "title": "Fight Club",
                 "release_date": "1999-10-15", "genre_ids": [18], "popularity": 61.4,
                 "vote_count": 27000, "vote_average": 8.4, "poster_path": "/p.jpg"},
                {"id": 1399, "media_type": "tv", "name": "Game of Thrones",
                 "first_air_date": "2011-04-17"}
            ],
            "total_pages": 500,
            "total_results": 10000
        }"#;

        let page: PagedResponse<TmdbTitle> = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].title.as_deref(), Some("Fight Club"));
        assert_eq!(page.results[1].genre_ids, Vec::<i64>::new());
        assert_eq!(page.total_pages, 500);
    }

    #[test]
    fn test_error_body_deserializes() {
        let json = r#"{"status_code": 7, "status_message": "Invalid API key", "success": false}"#;
        let error: TmdbError = serde_json::from_str(json).unwrap();
        assert_eq!(error.status_code, 7);
        assert_eq!(error.success, Some(false));
    }
}
