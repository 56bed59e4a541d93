use crate::shared::errors::FetchError;
use thiserror::Error;

/// Outcome of the one-time staleness check before the first load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializeAction {
    /// Cache is fresh; serve it as-is
    SkipInitialRefresh,
    /// Cache is stale or empty; a refresh load must run first
    LaunchInitialRefresh,
}

/// Why a load did not complete
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// NoConnection or FailedApiRequest from the title source
    #[error(transparent)]
    Fetch(FetchError),

    /// A loaded boundary row has no key row, so its neighbours are unknown
    #[error("No remote key stored for cached title {title_id}")]
    MissingRemoteKey { title_id: i64 },

    #[error("Load was cancelled")]
    Cancelled,

    /// Storage failure or unexpected fault; retrying will not help
    #[error("Load failed: {0}")]
    Fatal(String),
}

impl LoadError {
    pub fn is_retryable(&self) -> bool {
        match self {
            LoadError::Fetch(e) => e.is_retryable(),
            LoadError::MissingRemoteKey { .. } | LoadError::Cancelled => true,
            LoadError::Fatal(_) => false,
        }
    }
}

/// Result reported back to the paging consumer for one load call
#[derive(Debug, Clone, PartialEq)]
pub enum MediatorResult {
    Success { end_of_pagination_reached: bool },
    Error(LoadError),
}

impl MediatorResult {
    pub fn success(end_of_pagination_reached: bool) -> Self {
        MediatorResult::Success {
            end_of_pagination_reached,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MediatorResult::Success { .. })
    }

    pub fn end_of_pagination_reached(&self) -> bool {
        matches!(
            self,
            MediatorResult::Success {
                end_of_pagination_reached: true
            }
        )
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            MediatorResult::Error(e) => Some(e),
            MediatorResult::Success { .. } => None,
        }
    }
}
