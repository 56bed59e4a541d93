use super::request_category::RequestCategory;
use crate::shared::domain::value_objects::MediaType;
use crate::shared::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sort order accepted by discover listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOrder {
    #[default]
    PopularityDesc,
    PopularityAsc,
    VoteAverageDesc,
    VoteAverageAsc,
    ReleaseDateDesc,
    ReleaseDateAsc,
}

impl SortOrder {
    /// Query value; TV listings sort by first air date instead of release date
    pub fn as_query_value(&self, media_type: MediaType) -> String {
        let date_field = match media_type {
            MediaType::Movie => "primary_release_date",
            MediaType::Tv => "first_air_date",
        };
        match self {
            SortOrder::PopularityDesc => "popularity.desc".to_string(),
            SortOrder::PopularityAsc => "popularity.asc".to_string(),
            SortOrder::VoteAverageDesc => "vote_average.desc".to_string(),
            SortOrder::VoteAverageAsc => "vote_average.asc".to_string(),
            SortOrder::ReleaseDateDesc => format!("{}.desc", date_field),
            SortOrder::ReleaseDateAsc => format!("{}.asc", date_field),
        }
    }
}

/// Filter of a discover listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DiscoverFilter {
    pub sort_by: SortOrder,
    pub genre_ids: Vec<i64>,
    pub release_from: Option<NaiveDate>,
    pub release_to: Option<NaiveDate>,
    pub min_score: Option<f32>,
    pub max_score: Option<f32>,
}

impl DiscoverFilter {
    pub fn validate(&self) -> AppResult<()> {
        if let (Some(from), Some(to)) = (self.release_from, self.release_to) {
            if from > to {
                return Err(AppError::InvalidInput(format!(
                    "Release range is inverted: {} > {}",
                    from, to
                )));
            }
        }

        for score in [self.min_score, self.max_score].into_iter().flatten() {
            if !(0.0..=10.0).contains(&score) {
                return Err(AppError::InvalidInput(format!(
                    "Score {} is outside 0..=10",
                    score
                )));
            }
        }

        if let (Some(min), Some(max)) = (self.min_score, self.max_score) {
            if min > max {
                return Err(AppError::InvalidInput(format!(
                    "Score range is inverted: {} > {}",
                    min, max
                )));
            }
        }

        Ok(())
    }

    /// Render as catalog query parameters
    pub fn to_query_params(&self, media_type: MediaType) -> Vec<(String, String)> {
        let date_field = match media_type {
            MediaType::Movie => "primary_release_date",
            MediaType::Tv => "first_air_date",
        };

        let mut params = vec![(
            "sort_by".to_string(),
            self.sort_by.as_query_value(media_type),
        )];

        if !self.genre_ids.is_empty() {
            let ids: Vec<String> = self.genre_ids.iter().map(|id| id.to_string()).collect();
            params.push(("with_genres".to_string(), ids.join(",")));
        }
        if let Some(from) = self.release_from {
            params.push((
                format!("{}.gte", date_field),
                from.format("%Y-%m-%d").to_string(),
            ));
        }
        if let Some(to) = self.release_to {
            params.push((
                format!("{}.lte", date_field),
                to.format("%Y-%m-%d").to_string(),
            ));
        }
        if let Some(min) = self.min_score {
            params.push(("vote_average.gte".to_string(), min.to_string()));
        }
        if let Some(max) = self.max_score {
            params.push(("vote_average.lte".to_string(), max.to_string()));
        }

        params
    }
}

/// Category-specific request parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum RequestParams {
    #[default]
    None,
    Discover(DiscoverFilter),
    Search(String),
}

impl RequestParams {
    pub fn search(query: impl Into<String>) -> Self {
        RequestParams::Search(query.into())
    }

    /// Check that the parameter shape fits the category
    pub fn validate_for(&self, category: RequestCategory) -> AppResult<()> {
        match self {
            RequestParams::Search(query) if category.is_search() => {
                if query.trim().is_empty() {
                    Err(AppError::InvalidInput(format!(
                        "Category {} needs a non-blank search query",
                        category
                    )))
                } else {
                    Ok(())
                }
            }
            RequestParams::None if category.is_search() => Err(AppError::InvalidInput(format!(
                "Category {} needs a search query",
                category
            ))),
            RequestParams::Discover(filter) if category.is_discover() => filter.validate(),
            RequestParams::None => Ok(()),
            RequestParams::Search(_) => Err(AppError::InvalidInput(format!(
                "Category {} does not take a search query",
                category
            ))),
            RequestParams::Discover(_) => Err(AppError::InvalidInput(format!(
                "Category {} does not take a discover filter",
                category
            ))),
        }
    }
}
