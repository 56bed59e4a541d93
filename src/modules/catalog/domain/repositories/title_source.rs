/// Outbound ports to the remote catalog
///
/// Expected failures come back as `FetchError`; implementations never
/// panic on bad responses.
use crate::modules::catalog::domain::{RequestCategory, RequestParams, TitlePage};
use crate::modules::genres::{Genre, GenreTable};
use crate::shared::domain::value_objects::MediaType;
use crate::shared::errors::FetchResult;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TitleSource: Send + Sync {
    /// Fetch one 1-based page of `category`, mapping genre ids through `genres`
    async fn fetch_page(
        &self,
        category: RequestCategory,
        page: u32,
        params: &RequestParams,
        genres: &GenreTable,
    ) -> FetchResult<TitlePage>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreSource: Send + Sync {
    /// Fetch the catalog's genre list for one media type
    async fn fetch_genres(&self, media_type: MediaType) -> FetchResult<Vec<Genre>>;
}
