/// Global genre table
///
/// Every cached title's genre association must reference a genre stored
/// here. The table is filled from the catalog's genre lists and refreshed
/// only on demand.
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{GenreSyncError, GenreSyncOutcome, GenreSyncService};
pub use domain::{Genre, GenreRepository, GenreTable};
pub use infrastructure::SqliteGenreRepository;
