use crate::shared::domain::value_objects::MediaType;
use crate::shared::errors::FetchContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Independently cached title listing.
///
/// Every category owns its own cache tables; categories share only the
/// caching algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestCategory {
    Trending,
    PopularMovies,
    PopularTv,
    TopRatedMovies,
    TopRatedTv,
    UpcomingMovies,
    DiscoverMovies,
    DiscoverTv,
    SearchAll,
    SearchMovies,
    SearchTv,
}

impl RequestCategory {
    pub const ALL: [RequestCategory; 11] = [
        RequestCategory::Trending,
        RequestCategory::PopularMovies,
        RequestCategory::PopularTv,
        RequestCategory::TopRatedMovies,
        RequestCategory::TopRatedTv,
        RequestCategory::UpcomingMovies,
        RequestCategory::DiscoverMovies,
        RequestCategory::DiscoverTv,
        RequestCategory::SearchAll,
        RequestCategory::SearchMovies,
        RequestCategory::SearchTv,
    ];

    /// Stable identifier, also the prefix of the category's table names
    pub fn prefix(&self) -> &'static str {
        match self {
            RequestCategory::Trending => "trending",
            RequestCategory::PopularMovies => "popular_movies",
            RequestCategory::PopularTv => "popular_tv",
            RequestCategory::TopRatedMovies => "top_rated_movies",
            RequestCategory::TopRatedTv => "top_rated_tv",
            RequestCategory::UpcomingMovies => "upcoming_movies",
            RequestCategory::DiscoverMovies => "discover_movies",
            RequestCategory::DiscoverTv => "discover_tv",
            RequestCategory::SearchAll => "search_all",
            RequestCategory::SearchMovies => "search_movies",
            RequestCategory::SearchTv => "search_tv",
        }
    }

    /// Catalog endpoint path serving this category
    pub fn endpoint(&self) -> &'static str {
        match self {
            RequestCategory::Trending => "/trending/all/day",
            RequestCategory::PopularMovies => "/movie/popular",
            RequestCategory::PopularTv => "/tv/popular",
            RequestCategory::TopRatedMovies => "/movie/top_rated",
            RequestCategory::TopRatedTv => "/tv/top_rated",
            RequestCategory::UpcomingMovies => "/movie/upcoming",
            RequestCategory::DiscoverMovies => "/discover/movie",
            RequestCategory::DiscoverTv => "/discover/tv",
            RequestCategory::SearchAll => "/search/multi",
            RequestCategory::SearchMovies => "/search/movie",
            RequestCategory::SearchTv => "/search/tv",
        }
    }

    /// Media type of every item in the listing, or `None` for mixed listings
    pub fn media_type(&self) -> Option<MediaType> {
        match self {
            RequestCategory::Trending | RequestCategory::SearchAll => None,
            RequestCategory::PopularMovies
            | RequestCategory::TopRatedMovies
            | RequestCategory::UpcomingMovies
            | RequestCategory::DiscoverMovies
            | RequestCategory::SearchMovies => Some(MediaType::Movie),
            RequestCategory::PopularTv
            | RequestCategory::TopRatedTv
            | RequestCategory::DiscoverTv
            | RequestCategory::SearchTv => Some(MediaType::Tv),
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(
            self,
            RequestCategory::SearchAll | RequestCategory::SearchMovies | RequestCategory::SearchTv
        )
    }

    pub fn is_discover(&self) -> bool {
        matches!(
            self,
            RequestCategory::DiscoverMovies | RequestCategory::DiscoverTv
        )
    }

    pub fn fetch_context(&self) -> FetchContext {
        if self.is_search() {
            FetchContext::Search
        } else {
            FetchContext::Titles
        }
    }
}

impl fmt::Display for RequestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

impl std::str::FromStr for RequestCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        RequestCategory::ALL
            .iter()
            .copied()
            .find(|category| category.prefix() == normalized)
            .ok_or_else(|| format!("Invalid request category: {}", s))
    }
}
