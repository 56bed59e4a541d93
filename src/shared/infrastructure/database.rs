use crate::log_info;
use crate::shared::config::AppConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::path::Path;
use std::time::Duration;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

/// Global tables (genres, watchlist). Per-category cache tables are created
/// by the title cache module from its category descriptors.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pragmas applied to every pooled SQLite connection
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL;",
            self.busy_timeout.as_millis()
        ))
        .map_err(r2d2::Error::QueryError)
    }
}

#[derive(Debug)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open (or create) the SQLite database file described by the configuration
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        Self::open(&config.database_path)
    }

    /// Open (or create) a SQLite database file at `path`
    pub fn open(path: &Path) -> AppResult<Self> {
        let database_url = path.to_str().ok_or_else(|| {
            AppError::ConfigurationError(format!(
                "Database path is not valid UTF-8: {}",
                path.display()
            ))
        })?;

        let manager = ConnectionManager::<SqliteConnection>::new(database_url);

        let pool_config = Self::get_optimal_pool_config();
        let pool = r2d2::Pool::builder()
            .max_size(pool_config.max_size)
            .min_idle(Some(pool_config.min_idle))
            .connection_timeout(Duration::from_secs(10))
            .connection_customizer(Box::new(ConnectionOptions {
                busy_timeout: BUSY_TIMEOUT,
            }))
            .build(manager)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to create connection pool: {}", e))
            })?;

        log_info!(
            "Database connection pool initialized for {} with max_size: {}",
            path.display(),
            pool.max_size()
        );

        Ok(Self { pool })
    }

    /// Create a Database instance from an existing pool (useful for testing)
    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    /// SQLite serializes writers, so a small pool is enough for a client app
    fn get_optimal_pool_config() -> PoolConfig {
        let cpu_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        let max_size = std::cmp::min(cpu_count, 8).max(2);

        PoolConfig {
            max_size: max_size as u32,
            min_idle: 1,
        }
    }

    /// Apply embedded migrations for the global tables
    pub fn run_migrations(&self) -> AppResult<()> {
        let mut conn = self.get_connection()?;
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            AppError::DatabaseError(format!("Failed to run database migrations: {}", e))
        })?;

        log_info!("Database migrations completed ({} applied)", applied.len());
        Ok(())
    }

    pub fn get_connection(&self) -> AppResult<DbConnection> {
        let start = std::time::Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                let duration = start.elapsed().as_millis() as u64;
                if duration > 100 {
                    LogContext::performance_metric("db_connection_acquire", duration, Some("slow"));
                }
                Ok(conn)
            }
            Err(e) => {
                LogContext::error_with_context(
                    &e,
                    "Failed to acquire database connection from pool",
                );
                Err(AppError::from(e))
            }
        }
    }

    /// Run `work` as one IMMEDIATE transaction on a pooled connection.
    ///
    /// Commits when `work` returns `Ok`, rolls back on `Err`. The connection
    /// goes back to the pool on every exit path when the guard drops.
    pub fn write_transaction<T, F>(&self, work: F) -> AppResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> AppResult<T>,
    {
        let mut conn = self.get_connection()?;
        conn.immediate_transaction::<T, AppError, _>(work)
    }

    /// Run `work` inside a deferred (read) transaction for a consistent snapshot
    pub fn read_transaction<T, F>(&self, work: F) -> AppResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> AppResult<T>,
    {
        use diesel::Connection;

        let mut conn = self.get_connection()?;
        conn.transaction::<T, AppError, _>(|c| work(c))
    }

    /// Execute a batch of DDL statements
    pub fn execute_batch(&self, sql: &str) -> AppResult<()> {
        let mut conn = self.get_connection()?;
        conn.batch_execute(sql)?;
        Ok(())
    }

    /// Get pool statistics for monitoring
    pub fn pool_status(&self) -> PoolStatus {
        let state = self.pool.state();
        PoolStatus {
            connections: state.connections,
            idle_connections: state.idle_connections,
            max_size: self.pool.max_size(),
        }
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[derive(Debug)]
pub struct PoolStatus {
    pub connections: u32,
    pub idle_connections: u32,
    pub max_size: u32,
}

#[derive(Debug)]
struct PoolConfig {
    max_size: u32,
    min_idle: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::RunQueryDsl;

    #[derive(diesel::QueryableByName)]
    struct CountRow {
        #[diesel(sql_type = diesel::sql_types::BigInt)]
        count: i64,
    }

    fn temp_database() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.db")).unwrap();
        db.run_migrations().unwrap();
        (dir, db)
    }

    #[test]
    fn test_write_transaction_rolls_back_on_error() {
        let (_dir, db) = temp_database();

        let result: AppResult<()> = db.write_transaction(|conn| {
            diesel::sql_query("INSERT INTO genres (id, name) VALUES (1, 'Action')")
                .execute(conn)?;
            Err(AppError::InternalError("abort".to_string()))
        });
        assert!(result.is_err());

        let mut conn = db.get_connection().unwrap();
        let count: CountRow = diesel::sql_query("SELECT COUNT(*) AS count FROM genres")
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(count.count, 0);
    }

    #[test]
    fn test_read_transaction_sees_committed_rows() {
        let (_dir, db) = temp_database();

        db.write_transaction(|conn| {
            diesel::sql_query("INSERT INTO genres (id, name) VALUES (18, 'Drama')")
                .execute(conn)?;
            Ok(())
        })
        .unwrap();

        let count = db
            .read_transaction(|conn| {
                let row: CountRow = diesel::sql_query("SELECT COUNT(*) AS count FROM genres")
                    .get_result(conn)?;
                Ok(row.count)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_read_transaction_propagates_work_error() {
        let (_dir, db) = temp_database();
        let result: AppResult<i64> =
            db.read_transaction(|_| Err(AppError::InternalError("stop".to_string())));
        assert!(matches!(result, Err(AppError::InternalError(_))));
    }

    #[test]
    fn test_pool_status_reports_max_size() {
        let (_dir, db) = temp_database();
        let status = db.pool_status();
        assert!(status.max_size >= 2);
    }
}
