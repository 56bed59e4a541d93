// Shared Kernel
// Cross-module building blocks: errors, configuration, database, logging

pub mod application; // Shared application layer patterns (pagination)
pub mod config; // Environment-driven configuration
pub mod domain; // Shared domain concepts (value objects)
pub mod errors; // Shared error types
pub mod infrastructure; // Shared infrastructure (database)
pub mod utils; // Logging helpers

// Re-exports for convenience
pub use config::AppConfig;
pub use infrastructure::database::Database;
