//! HTTP client with rate limiting and retry logic for the catalog API
//!
//! Every failure is classified into a `FetchError` so that callers can tell
//! "no network" apart from "bad response".

use super::retry_policy::{is_retryable_error, RateLimitInfo, RetryPolicy};
use crate::shared::errors::{FetchContext, FetchError, FetchErrorKind, FetchResult};
use crate::shared::utils::logger::LogContext;
use governor::{Jitter, Quota, RateLimiter as GovernorRateLimiter};
use reqwest::{Client, Response};
use std::num::NonZeroU32;
use std::time::{Duration, Instant};
use tokio::time::sleep;

type DirectRateLimiter = GovernorRateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
    governor::middleware::NoOpMiddleware,
>;

const USER_AGENT: &str = "cinelist/0.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client that handles rate limiting and retries
pub struct RateLimitClient {
    client: Client,
    rate_limiter: DirectRateLimiter,
    retry_policy: RetryPolicy,
    user_agent: String,
    provider_name: String,
}

impl RateLimitClient {
    /// Create a client for TMDB with the given sustained request rate
    pub fn for_tmdb(requests_per_second: f64) -> Self {
        Self::new(
            "TMDB",
            RetryPolicy::tmdb(),
            Self::create_rate_limiter(requests_per_second, 4),
        )
    }

    /// Create a rate limiter with specified requests per second and burst capacity
    pub fn create_rate_limiter(requests_per_second: f64, burst_size: u32) -> DirectRateLimiter {
        // Rates too small to express as a period fall back to one per second
        let duration = Some(requests_per_second)
            .filter(|rate| *rate > 0.0)
            .and_then(|rate| Duration::try_from_secs_f64(1.0 / rate).ok())
            .unwrap_or(Duration::from_secs(1));

        let burst = NonZeroU32::new(burst_size.max(1)).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(duration)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst);

        GovernorRateLimiter::direct(quota)
    }

    /// Create a custom client
    pub fn new(provider_name: &str, retry_policy: RetryPolicy, rate_limiter: DirectRateLimiter) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            rate_limiter,
            retry_policy,
            user_agent: USER_AGENT.to_string(),
            provider_name: provider_name.to_string(),
        }
    }

    /// Make a GET request with rate limiting and retries.
    ///
    /// `endpoint` is only used for logging so that secrets in `url` never
    /// reach the log.
    pub async fn get<T>(&self, url: &str, endpoint: &str, context: FetchContext) -> FetchResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let started = Instant::now();
        LogContext::api_call(&self.provider_name, endpoint, "started", None);

        let result = self.request_with_retries(url, context).await;

        let status = match &result {
            Ok(_) => "ok".to_string(),
            Err(e) => format!("{:?}", e.kind),
        };
        LogContext::api_call(
            &self.provider_name,
            endpoint,
            &status,
            Some(started.elapsed().as_millis() as u64),
        );
        result
    }

    async fn request_with_retries<T>(&self, url: &str, context: FetchContext) -> FetchResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let attempts = self.retry_policy.max_retries + 1;

        for attempt in 0..=self.retry_policy.max_retries {
            self.rate_limiter
                .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
                .await;

            match self.send(url).await {
                Ok(response) => {
                    if response.status() == 429 {
                        let rate_limit_info = RateLimitInfo::from_headers(response.headers());

                        if attempt < self.retry_policy.max_retries {
                            let delay = self.calculate_retry_delay(attempt, &rate_limit_info);
                            log::warn!(
                                "{} API rate limited (attempt {}/{}). Waiting {:?} before retry.",
                                self.provider_name,
                                attempt + 1,
                                attempts,
                                delay
                            );
                            sleep(delay).await;
                            continue;
                        }
                        return Err(FetchError::failed_request(
                            context,
                            format!(
                                "{} API rate limit exceeded after {} attempts",
                                self.provider_name, attempts
                            ),
                        ));
                    }

                    if !response.status().is_success() {
                        let error_msg = format!(
                            "{} API returned error: {}",
                            self.provider_name,
                            response.status()
                        );

                        // Only retry server errors
                        if response.status().is_server_error()
                            && attempt < self.retry_policy.max_retries
                        {
                            let delay = self.retry_policy.calculate_delay(attempt, None);
                            log::warn!(
                                "{} (attempt {}/{}). Retrying in {:?}",
                                error_msg,
                                attempt + 1,
                                attempts,
                                delay
                            );
                            sleep(delay).await;
                            continue;
                        }
                        return Err(FetchError::failed_request(context, error_msg));
                    }

                    return self.parse_response(response, context).await;
                }
                Err(e) => {
                    let e = e.without_url();
                    if is_retryable_error(&e) && attempt < self.retry_policy.max_retries {
                        let delay = self.retry_policy.calculate_delay(attempt, None);
                        log::warn!(
                            "{} API request failed (attempt {}/{}): {}. Retrying in {:?}",
                            self.provider_name,
                            attempt + 1,
                            attempts,
                            e,
                            delay
                        );
                        sleep(delay).await;
                        continue;
                    }
                    return Err(FetchError::new(
                        context,
                        classify_transport_error(&e),
                        format!("{} API request failed: {}", self.provider_name, e),
                    ));
                }
            }
        }

        Err(FetchError::failed_request(
            context,
            format!(
                "{} API request failed after {} attempts",
                self.provider_name, attempts
            ),
        ))
    }

    async fn send(&self, url: &str) -> Result<Response, reqwest::Error> {
        self.client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .send()
            .await
    }

    async fn parse_response<T>(&self, response: Response, context: FetchContext) -> FetchResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response_text = response.text().await.map_err(|e| {
            FetchError::failed_request(
                context,
                format!(
                    "Failed to read {} response: {}",
                    self.provider_name,
                    e.without_url()
                ),
            )
        })?;

        serde_json::from_str(&response_text).map_err(|e| {
            FetchError::failed_request(
                context,
                format!(
                    "Failed to parse {} response: {}. Response: {}",
                    self.provider_name,
                    e,
                    truncate_body(&response_text)
                ),
            )
        })
    }

    /// Server-provided delay wins over the policy backoff
    fn calculate_retry_delay(&self, attempt: u32, rate_limit_info: &RateLimitInfo) -> Duration {
        if let Some(server_delay) = rate_limit_info.recommended_delay() {
            return server_delay.min(self.retry_policy.max_delay);
        }

        self.retry_policy.calculate_delay(attempt, None)
    }

    /// Check if a request can be made now (for testing/debugging)
    pub fn can_make_request_now(&self) -> bool {
        self.rate_limiter.check().is_ok()
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }
}

/// Connect and timeout failures mean the network path is missing
fn classify_transport_error(error: &reqwest::Error) -> FetchErrorKind {
    if error.is_connect() || error.is_timeout() {
        FetchErrorKind::NoConnection
    } else {
        FetchErrorKind::FailedApiRequest
    }
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(200) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
