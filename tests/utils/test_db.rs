/// Isolated SQLite database per test
///
/// Each test gets its own file in a temporary directory that is removed when
/// the `TestDb` is dropped.
use cinelist_lib::modules::genres::{Genre, GenreRepository, SqliteGenreRepository};
use cinelist_lib::modules::title_cache::create_category_tables;
use cinelist_lib::shared::Database;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestDb {
    _dir: TempDir,
    pub db: Arc<Database>,
}

impl TestDb {
    /// Migrated database with every category's cache tables
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db = Database::open(&dir.path().join("cinelist-test.db"))
            .expect("Failed to open test database");
        db.run_migrations().expect("Failed to run migrations");
        create_category_tables(&db).expect("Failed to create cache tables");

        Self {
            _dir: dir,
            db: Arc::new(db),
        }
    }

    /// Same as `new` with the standard genre list stored
    pub async fn with_genres() -> Self {
        let test_db = Self::new();
        SqliteGenreRepository::new(Arc::clone(&test_db.db))
            .upsert_all(standard_genres())
            .await
            .expect("Failed to seed genres");
        test_db
    }

    pub fn db(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }
}

pub fn standard_genres() -> Vec<Genre> {
    vec![
        Genre::new(16, "Animation"),
        Genre::new(18, "Drama"),
        Genre::new(28, "Action"),
        Genre::new(35, "Comedy"),
        Genre::new(878, "Science Fiction"),
        Genre::new(10765, "Sci-Fi & Fantasy"),
    ]
}
