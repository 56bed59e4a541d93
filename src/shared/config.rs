//! Environment-driven configuration
//!
//! Values are read once at startup; `.env` files are honoured through dotenvy.

use crate::shared::errors::{AppError, AppResult};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Maximum age of a category cache before it must be refreshed from the network
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_DATABASE_PATH: &str = "cinelist.db";
pub const DEFAULT_REQUESTS_PER_SECOND: f64 = 4.0;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub language: String,
    pub database_path: PathBuf,
    pub cache_ttl: Duration,
    pub requests_per_second: f64,
}

impl AppConfig {
    /// Load configuration from the process environment (after reading `.env`)
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (useful for testing)
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tmdb_api_key = lookup("TMDB_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::ConfigurationError(
                    "TMDB_API_KEY environment variable not found".to_string(),
                )
            })?;

        let tmdb_base_url = lookup("TMDB_BASE_URL")
            .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if !tmdb_base_url.starts_with("http://") && !tmdb_base_url.starts_with("https://") {
            return Err(AppError::ConfigurationError(format!(
                "TMDB_BASE_URL must be an http(s) URL, got '{}'",
                tmdb_base_url
            )));
        }

        let cache_ttl = match lookup("CINELIST_CACHE_TTL_MINUTES") {
            Some(raw) => {
                let minutes: u64 = raw.trim().parse().map_err(|e| {
                    AppError::ConfigurationError(format!(
                        "CINELIST_CACHE_TTL_MINUTES is not a number: {}",
                        e
                    ))
                })?;
                minutes
                    .checked_mul(60)
                    .map(Duration::from_secs)
                    .ok_or_else(|| {
                        AppError::ConfigurationError(format!(
                            "CINELIST_CACHE_TTL_MINUTES is too large: {}",
                            minutes
                        ))
                    })?
            }
            None => DEFAULT_CACHE_TTL,
        };

        let requests_per_second = match lookup("TMDB_REQUESTS_PER_SECOND") {
            Some(raw) => {
                let rate: f64 = raw.trim().parse().map_err(|e| {
                    AppError::ConfigurationError(format!(
                        "TMDB_REQUESTS_PER_SECOND is not a number: {}",
                        e
                    ))
                })?;
                if !rate.is_finite() || rate <= 0.0 {
                    return Err(AppError::ConfigurationError(
                        "TMDB_REQUESTS_PER_SECOND must be positive".to_string(),
                    ));
                }
                // The limiter spaces requests 1/rate seconds apart
                if Duration::try_from_secs_f64(1.0 / rate).is_err() {
                    return Err(AppError::ConfigurationError(format!(
                        "TMDB_REQUESTS_PER_SECOND is too small: {}",
                        rate
                    )));
                }
                rate
            }
            None => DEFAULT_REQUESTS_PER_SECOND,
        };

        Ok(Self {
            tmdb_api_key,
            tmdb_base_url,
            language: lookup("TMDB_LANGUAGE").unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            database_path: lookup("CINELIST_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            cache_ttl,
            requests_per_second,
        })
    }
}
