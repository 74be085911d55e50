//! SQLite connection pool for the listsync store
//!
//! File databases run in WAL mode. Foreign keys are switched on for every
//! connection, file-backed or in-memory, since removing a list relies on the
//! `ON DELETE CASCADE` from `list_members` to `mailing_lists`. The schema is
//! applied when the pool is opened.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use listsync_core::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::CacheError;

/// Pool of SQLite connections holding mailing lists and their members
pub struct DatabasePool {
    pool: SqlitePool,
}

impl DatabasePool {
    /// Opens the database described by the `database` config section
    ///
    /// Parent directories and the file itself are created when missing.
    ///
    /// # Errors
    ///
    /// `CacheError::ConnectionFailed` if the file cannot be opened, or
    /// `CacheError::MigrationFailed` if the schema cannot be applied.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, CacheError> {
        let db_path = config.path.as_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CacheError::ConnectionFailed(format!(
                    "cannot create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| {
                CacheError::ConnectionFailed(format!("cannot open {}: {}", db_path.display(), e))
            })?;

        apply_schema(&pool).await?;

        tracing::info!(
            path = %db_path.display(),
            max_connections = config.max_connections,
            "List store opened"
        );

        Ok(Self { pool })
    }

    /// Opens `db_path` with the default pool settings
    ///
    /// # Errors
    ///
    /// See [`DatabasePool::from_config`].
    pub async fn new(db_path: &Path) -> Result<Self, CacheError> {
        Self::from_config(&DatabaseConfig {
            path: db_path.to_path_buf(),
            ..DatabaseConfig::default()
        })
        .await
    }

    /// Opens a throwaway in-memory store
    ///
    /// An in-memory SQLite database lives and dies with its connection, so
    /// the pool holds exactly one.
    ///
    /// # Errors
    ///
    /// `CacheError::ConnectionFailed` or `CacheError::MigrationFailed`.
    pub async fn in_memory() -> Result<Self, CacheError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| CacheError::ConnectionFailed(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| {
                CacheError::ConnectionFailed(format!("cannot open in-memory store: {}", e))
            })?;

        apply_schema(&pool).await?;
        tracing::debug!("In-memory list store opened");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Creates the `mailing_lists` and `list_members` tables when absent
async fn apply_schema(pool: &SqlitePool) -> Result<(), CacheError> {
    sqlx::raw_sql(include_str!("migrations/20261019_initial.sql"))
        .execute(pool)
        .await
        .map_err(|e| CacheError::MigrationFailed(format!("initial schema: {}", e)))?;
    Ok(())
}
