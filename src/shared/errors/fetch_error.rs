use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which remote operation produced a fetch failure (used for messaging only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FetchContext {
    Titles,
    Search,
    Genres,
}

impl fmt::Display for FetchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchContext::Titles => "titles",
            FetchContext::Search => "search",
            FetchContext::Genres => "genres",
        };
        write!(f, "{}", name)
    }
}

/// Closed set of expected remote failure causes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FetchErrorKind {
    /// No network path to the catalog API
    NoConnection,
    /// Transport worked but the response was unusable
    FailedApiRequest,
    /// Well-formed response with an empty result set
    NothingFound,
}

/// Failure outcome of any remote fetch (titles, search, genres)
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{context} fetch failed ({kind:?}): {message}")]
pub struct FetchError {
    pub context: FetchContext,
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(context: FetchContext, kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            context,
            kind,
            message: message.into(),
        }
    }

    pub fn no_connection(context: FetchContext, message: impl Into<String>) -> Self {
        Self::new(context, FetchErrorKind::NoConnection, message)
    }

    pub fn failed_request(context: FetchContext, message: impl Into<String>) -> Self {
        Self::new(context, FetchErrorKind::FailedApiRequest, message)
    }

    pub fn nothing_found(context: FetchContext, message: impl Into<String>) -> Self {
        Self::new(context, FetchErrorKind::NothingFound, message)
    }

    /// Rebind the failure to another context, keeping kind and message
    pub fn in_context(mut self, context: FetchContext) -> Self {
        self.context = context;
        self
    }

    /// NothingFound ends pagination; the other kinds are worth a retry
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            FetchErrorKind::NoConnection | FetchErrorKind::FailedApiRequest
        )
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_found_is_not_retryable() {
        let err = FetchError::nothing_found(FetchContext::Search, "no matches");
        assert!(!err.is_retryable());
        assert!(FetchError::no_connection(FetchContext::Titles, "offline").is_retryable());
        assert!(FetchError::failed_request(FetchContext::Titles, "HTTP 500").is_retryable());
    }

    #[test]
    fn test_display_mentions_context() {
        let err = FetchError::failed_request(FetchContext::Genres, "HTTP 401");
        assert_eq!(
            err.to_string(),
            "genres fetch failed (FailedApiRequest): HTTP 401"
        );
    }
}
