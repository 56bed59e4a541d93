mod sync_service;

pub use sync_service::{GenreSyncError, GenreSyncOutcome, GenreSyncService};
