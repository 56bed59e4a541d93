/// TMDB adapter tests against a local stub server
///
/// Tests cover:
/// - Listing mapping and people filtering
/// - Pages emptied by filtering keep paging open
/// - NothingFound detection
/// - Error classification (server, payload, transport)
/// - Genre list fetches
mod utils;

use cinelist_lib::modules::catalog::{
    GenreSource, RateLimitClient, RequestCategory, RequestParams, RetryPolicy, TitleSource,
    TmdbAdapter,
};
use cinelist_lib::modules::genres::{Genre, GenreTable};
use cinelist_lib::shared::domain::value_objects::MediaType;
use cinelist_lib::shared::errors::{FetchContext, FetchErrorKind};
use cinelist_lib::shared::AppConfig;
use std::time::Duration;
use utils::http_stub::{closed_port_url, StubServer};
use utils::test_db::standard_genres;

const TEST_API_KEY: &str = "test-key";

const TRENDING_PAGE: &str = r#"{
    "page": 1,
    "total_pages": 4,
    "total_results": 80,
    "results": [
        {"id": 603, "media_type": "movie", "title": "The Matrix", "overview": "Neo",
         "popularity": 88.2, "poster_path": "/matrix.jpg", "release_date": "1999-03-31",
         "vote_count": 25000, "vote_average": 8.2, "genre_ids": [28, 878]},
        {"id": 1234, "media_type": "person", "name": "Keanu Reeves", "popularity": 50.0},
        {"id": 1399, "media_type": "tv", "name": "Game of Thrones", "overview": "",
         "poster_path": "", "first_air_date": "2011-04-17",
         "vote_count": 22000, "vote_average": 8.4, "genre_ids": [18, 10765, 4242]}
    ]
}"#;

fn config(base_url: &str) -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "TMDB_API_KEY" => Some(TEST_API_KEY.to_string()),
        "TMDB_BASE_URL" => Some(base_url.to_string()),
        _ => None,
    })
    .unwrap()
}

fn adapter_with_policy(base_url: &str, policy: RetryPolicy) -> TmdbAdapter {
    let client = RateLimitClient::new(
        "TMDB",
        policy,
        RateLimitClient::create_rate_limiter(100.0, 10),
    );
    TmdbAdapter::with_client(client, &config(base_url))
}

fn adapter(base_url: &str) -> TmdbAdapter {
    adapter_with_policy(base_url, RetryPolicy::no_retry())
}

fn genres() -> GenreTable {
    GenreTable::new(standard_genres())
}

#[tokio::test]
async fn test_trending_page_is_mapped() {
    let server = StubServer::start().await;
    server.route("/trending/all/day", 200, TRENDING_PAGE);

    let page = adapter(&server.base_url)
        .fetch_page(RequestCategory::Trending, 1, &RequestParams::None, &genres())
        .await
        .unwrap();

    assert_eq!(page.page, 1);
    assert_eq!(page.total_pages, 4);
    assert!(!page.is_last_page());
    assert_eq!(page.items.len(), 2);

    let matrix = &page.items[0];
    assert_eq!(matrix.media_id, 603);
    assert_eq!(matrix.media_type, MediaType::Movie);
    assert_eq!(matrix.name, "The Matrix");
    assert_eq!(matrix.release_date.as_deref(), Some("1999-03-31"));
    assert_eq!(
        matrix.genres,
        vec![Genre::new(28, "Action"), Genre::new(878, "Science Fiction")]
    );

    let got = &page.items[1];
    assert_eq!(got.media_type, MediaType::Tv);
    assert_eq!(got.poster_path, None);
    // Genre 4242 is not in the table
    assert_eq!(
        got.genres,
        vec![Genre::new(18, "Drama"), Genre::new(10765, "Sci-Fi & Fantasy")]
    );
}

#[tokio::test]
async fn test_request_carries_key_language_and_page() {
    let server = StubServer::start().await;
    server.route("/movie/popular", 200, TRENDING_PAGE);

    adapter(&server.base_url)
        .fetch_page(RequestCategory::PopularMovies, 3, &RequestParams::None, &genres())
        .await
        .ok();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        "/3/movie/popular?api_key=test-key&language=en-US&page=3"
    );
}

#[tokio::test]
async fn test_search_sends_trimmed_query() {
    let server = StubServer::start().await;
    server.route("/search/tv", 200, TRENDING_PAGE);

    adapter(&server.base_url)
        .fetch_page(
            RequestCategory::SearchTv,
            1,
            &RequestParams::search("  breaking bad "),
            &genres(),
        )
        .await
        .unwrap();

    assert_eq!(
        server.requests()[0],
        "/3/search/tv?api_key=test-key&language=en-US&page=1&query=breaking%20bad&include_adult=false"
    );
}

#[tokio::test]
async fn test_fixed_media_type_listing_uses_category_type() {
    let server = StubServer::start().await;
    server.route(
        "/tv/popular",
        200,
        r#"{"page": 1, "total_pages": 1, "total_results": 1,
            "results": [{"id": 1396, "name": "Breaking Bad", "first_air_date": "2008-01-20"}]}"#,
    );

    let page = adapter(&server.base_url)
        .fetch_page(RequestCategory::PopularTv, 1, &RequestParams::None, &genres())
        .await
        .unwrap();

    assert_eq!(page.items[0].media_type, MediaType::Tv);
    assert_eq!(page.items[0].name, "Breaking Bad");
    assert!(page.is_last_page());
}

#[tokio::test]
async fn test_people_only_page_is_not_the_last() {
    let server = StubServer::start().await;
    server.route(
        "/search/multi",
        200,
        r#"{"page": 1, "total_pages": 5, "total_results": 90,
            "results": [
                {"id": 6384, "media_type": "person", "name": "Keanu Reeves"},
                {"id": 6385, "media_type": "person", "name": "Keanu Pires"}
            ]}"#,
    );

    let page = adapter(&server.base_url)
        .fetch_page(
            RequestCategory::SearchAll,
            1,
            &RequestParams::search("keanu"),
            &genres(),
        )
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.remote_count, 2);
    assert!(!page.is_last_page());
}

#[tokio::test]
async fn test_empty_results_are_nothing_found() {
    let server = StubServer::start().await;
    server.route(
        "/search/movie",
        200,
        r#"{"page": 1, "total_pages": 0, "total_results": 0, "results": []}"#,
    );

    let err = adapter(&server.base_url)
        .fetch_page(
            RequestCategory::SearchMovies,
            1,
            &RequestParams::search("qwertyuiop"),
            &genres(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::NothingFound);
    assert_eq!(err.context, FetchContext::Search);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_page_past_the_end_is_nothing_found() {
    let server = StubServer::start().await;
    server.route(
        "/movie/top_rated",
        200,
        r#"{"page": 9, "total_pages": 8, "total_results": 160, "results": []}"#,
    );

    let err = adapter(&server.base_url)
        .fetch_page(RequestCategory::TopRatedMovies, 9, &RequestParams::None, &genres())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::NothingFound);
    assert_eq!(err.context, FetchContext::Titles);
}

#[tokio::test]
async fn test_server_error_is_failed_request() {
    let server = StubServer::start().await;
    server.route("/movie/upcoming", 500, r#"{"status_message":"boom"}"#);

    let err = adapter(&server.base_url)
        .fetch_page(RequestCategory::UpcomingMovies, 1, &RequestParams::None, &genres())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::FailedApiRequest);
    assert!(err.message.contains("500"));
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let server = StubServer::start().await;
    server.route("/movie/upcoming", 503, "{}");

    let policy = RetryPolicy {
        max_retries: 1,
        base_delay: Duration::from_millis(10),
        ..RetryPolicy::no_retry()
    };
    let err = adapter_with_policy(&server.base_url, policy)
        .fetch_page(RequestCategory::UpcomingMovies, 1, &RequestParams::None, &genres())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::FailedApiRequest);
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = StubServer::start().await;

    let policy = RetryPolicy {
        max_retries: 2,
        base_delay: Duration::from_millis(10),
        ..RetryPolicy::no_retry()
    };
    // Unrouted path answers 404
    let err = adapter_with_policy(&server.base_url, policy)
        .fetch_page(RequestCategory::DiscoverTv, 1, &RequestParams::None, &genres())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::FailedApiRequest);
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_malformed_body_is_failed_request() {
    let server = StubServer::start().await;
    server.route("/trending/all/day", 200, "<html>not json</html>");

    let err = adapter(&server.base_url)
        .fetch_page(RequestCategory::Trending, 1, &RequestParams::None, &genres())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::FailedApiRequest);
    assert!(err.message.contains("not json"));
}

#[tokio::test]
async fn test_unreachable_host_is_no_connection() {
    let base_url = closed_port_url().await;

    let err = adapter(&base_url)
        .fetch_page(RequestCategory::Trending, 1, &RequestParams::None, &genres())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FetchErrorKind::NoConnection);
    assert!(err.is_retryable());
    assert!(!err.message.contains(TEST_API_KEY));
}

#[tokio::test]
async fn test_genre_lists_are_fetched_per_media_type() {
    let server = StubServer::start().await;
    server.route(
        "/genre/movie/list",
        200,
        r#"{"genres": [{"id": 28, "name": "Action"}, {"id": 12, "name": "Adventure"}]}"#,
    );
    server.route("/genre/tv/list", 200, r#"{"genres": []}"#);

    let adapter = adapter(&server.base_url);
    let movie_genres = adapter.fetch_genres(MediaType::Movie).await.unwrap();
    assert_eq!(
        movie_genres,
        vec![Genre::new(28, "Action"), Genre::new(12, "Adventure")]
    );

    let err = adapter.fetch_genres(MediaType::Tv).await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::NothingFound);
    assert_eq!(err.context, FetchContext::Genres);
}
