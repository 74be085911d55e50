//! listsync Cache - Local entity persistence
//!
//! SQLite-based store for:
//! - Mailing lists, with their Mailchimp ids
//! - List members, with their Mailchimp ids and subscriber hashes
//!
//! ## Architecture
//!
//! This crate implements the `IEntityRepository` port from `listsync-core`
//! using SQLite as the storage backend. It is a driven (secondary) adapter
//! in the hexagonal architecture.
//!
//! ## Key Components
//!
//! - [`DatabasePool`] - Connection pool with migration support
//! - [`SqliteEntityRepository`] - Full `IEntityRepository` implementation
//! - [`CacheError`] - Error types for cache operations
//!
//! ## Usage
//!
//! ```no_run
//! use listsync_cache::{DatabasePool, SqliteEntityRepository};
//! use listsync_core::config::Config;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load_or_default(&Config::default_path());
//! let pool = DatabasePool::from_config(&config.database).await?;
//! let repo = SqliteEntityRepository::new(pool.pool().clone());
//! // Use repo as IEntityRepository...
//! # Ok(())
//! # }
//! ```

pub mod pool;
pub mod repository;

pub use pool::DatabasePool;
pub use repository::SqliteEntityRepository;

/// Errors that can occur during cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Failed to establish a database connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A database query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Serialization or deserialization of domain types failed
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<sqlx::Error> for CacheError {
    fn from(e: sqlx::Error) -> Self {
        CacheError::QueryFailed(e.to_string())
    }
}
