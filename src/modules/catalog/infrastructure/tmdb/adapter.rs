use crate::modules::catalog::domain::{
    GenreSource, RequestCategory, RequestParams, TitlePage, TitleSource,
};
use crate::modules::catalog::infrastructure::http_client::RateLimitClient;
use crate::modules::genres::{Genre, GenreTable};
use crate::shared::config::AppConfig;
use crate::shared::domain::value_objects::MediaType;
use crate::shared::errors::{FetchContext, FetchError, FetchResult};
use async_trait::async_trait;

use super::mapper::TmdbMapper;
use super::models::*;

/// TMDB (The Movie Database) REST adapter serving every request category
pub struct TmdbAdapter {
    http_client: RateLimitClient,
    base_url: String,
    api_key: String,
    language: String,
    mapper: TmdbMapper,
}

impl TmdbAdapter {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(
            RateLimitClient::for_tmdb(config.requests_per_second),
            config,
        )
    }

    /// Create adapter with custom HTTP client (for testing)
    pub fn with_client(http_client: RateLimitClient, config: &AppConfig) -> Self {
        Self {
            http_client,
            base_url: config.tmdb_base_url.trim_end_matches('/').to_string(),
            api_key: config.tmdb_api_key.clone(),
            language: config.language.clone(),
            mapper: TmdbMapper::new(),
        }
    }

    /// Check if a request can be made immediately (for testing and monitoring)
    pub fn can_make_request_now(&self) -> bool {
        self.http_client.can_make_request_now()
    }

    /// Build URL with API key, language and additional query parameters
    fn build_url_with_params(&self, endpoint: &str, params: &[(String, String)]) -> String {
        let mut url = format!(
            "{}{}?api_key={}&language={}",
            self.base_url,
            endpoint,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.language)
        );
        for (key, value) in params {
            if key != "api_key" && key != "language" {
                url.push_str(&format!("&{}={}", key, urlencoding::encode(value)));
            }
        }
        url
    }

    /// Query parameters a category adds on top of `page`
    fn category_params(
        category: RequestCategory,
        params: &RequestParams,
    ) -> FetchResult<Vec<(String, String)>> {
        params.validate_for(category).map_err(|e| {
            FetchError::failed_request(category.fetch_context(), e.to_string())
        })?;

        Ok(match params {
            RequestParams::None => Vec::new(),
            RequestParams::Search(query) => vec![
                ("query".to_string(), query.trim().to_string()),
                ("include_adult".to_string(), "false".to_string()),
            ],
            RequestParams::Discover(filter) => {
                // Discover categories always carry a concrete media type
                let media_type = category.media_type().unwrap_or(MediaType::Movie);
                filter.to_query_params(media_type)
            }
        })
    }
}

#[async_trait]
impl TitleSource for TmdbAdapter {
    async fn fetch_page(
        &self,
        category: RequestCategory,
        page: u32,
        params: &RequestParams,
        genres: &GenreTable,
    ) -> FetchResult<TitlePage> {
        let context = category.fetch_context();
        if page == 0 {
            return Err(FetchError::failed_request(
                context,
                "Page numbers start at 1",
            ));
        }

        let mut query = vec![("page".to_string(), page.to_string())];
        query.extend(Self::category_params(category, params)?);

        let endpoint = category.endpoint();
        let url = self.build_url_with_params(endpoint, &query);

        log::debug!("TMDB: fetching {} page {}", category, page);

        let response: PagedResponse<TmdbTitle> =
            self.http_client.get(&url, endpoint, context).await?;

        if response.total_results == 0 || page > response.total_pages {
            return Err(FetchError::nothing_found(
                context,
                format!(
                    "{} has no page {} ({} pages, {} results)",
                    category, page, response.total_pages, response.total_results
                ),
            ));
        }

        let raw_count = response.results.len();
        let items = self
            .mapper
            .map_titles(response.results, category.media_type(), genres);

        log::debug!(
            "TMDB: {} page {}/{} mapped {} of {} entries",
            category,
            page,
            response.total_pages,
            items.len(),
            raw_count
        );

        Ok(TitlePage {
            page,
            items,
            remote_count: raw_count,
            total_pages: response.total_pages,
            total_results: response.total_results,
        })
    }
}

#[async_trait]
impl GenreSource for TmdbAdapter {
    async fn fetch_genres(&self, media_type: MediaType) -> FetchResult<Vec<Genre>> {
        let endpoint = match media_type {
            MediaType::Movie => "/genre/movie/list",
            MediaType::Tv => "/genre/tv/list",
        };
        let url = self.build_url_with_params(endpoint, &[]);

        let response: GenreListResponse = self
            .http_client
            .get(&url, endpoint, FetchContext::Genres)
            .await?;

        if response.genres.is_empty() {
            return Err(FetchError::nothing_found(
                FetchContext::Genres,
                format!("TMDB returned no {} genres", media_type),
            ));
        }

        Ok(self.mapper.map_genres(response.genres))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::domain::DiscoverFilter;
    use crate::shared::errors::FetchErrorKind;

    fn config() -> AppConfig {
        AppConfig::from_lookup(|key| match key {
            "TMDB_API_KEY" => Some("secret key".to_string()),
            "TMDB_BASE_URL" => Some("http://localhost:9/3/".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_build_url_encodes_params() {
        let adapter = TmdbAdapter::new(&config());
        let url = adapter.build_url_with_params(
            "/search/multi",
            &[
                ("page".to_string(), "2".to_string()),
                ("query".to_string(), "the thing".to_string()),
                ("api_key".to_string(), "ignored".to_string()),
            ],
        );
        assert_eq!(
            url,
            "http://localhost:9/3/search/multi?api_key=secret%20key&language=en-US&page=2&query=the%20thing"
        );
    }

    #[test]
    fn test_category_params() {
        let search = TmdbAdapter::category_params(
            RequestCategory::SearchTv,
            &RequestParams::search(" dark "),
        )
        .unwrap();
        assert_eq!(search[0], ("query".to_string(), "dark".to_string()));

        let discover = TmdbAdapter::category_params(
            RequestCategory::DiscoverTv,
            &RequestParams::Discover(DiscoverFilter::default()),
        )
        .unwrap();
        assert_eq!(
            discover,
            vec![("sort_by".to_string(), "popularity.desc".to_string())]
        );

        let err = TmdbAdapter::category_params(RequestCategory::SearchAll, &RequestParams::None)
            .unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::FailedApiRequest);
        assert_eq!(err.context, FetchContext::Search);
    }

    #[tokio::test]
    async fn test_page_zero_is_rejected_without_request() {
        let adapter = TmdbAdapter::new(&config());
        let err = adapter
            .fetch_page(
                RequestCategory::Trending,
                0,
                &RequestParams::None,
                &GenreTable::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::FailedApiRequest);
    }
}
