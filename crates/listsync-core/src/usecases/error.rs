//! Use-case error types

use std::fmt::Display;

use thiserror::Error;

use crate::domain::{SyncEntity, ValidationErrors};

/// Errors returned by the synchronization use cases
#[derive(Debug, Error)]
pub enum SyncError {
    /// Attribute map failed the entity's rule table
    #[error("Invalid data given: {0}")]
    Validation(#[from] ValidationErrors),

    /// No local record with this id
    #[error("{entity}[{id}] not found")]
    NotFound {
        /// Entity type name, e.g. `MailingList`
        entity: &'static str,
        /// The id that was looked up
        id: String,
    },

    /// The remote API rejected or failed the call; holds the upstream message
    #[error("{0}")]
    RemoteSync(String),

    /// The local store failed
    #[error("Storage failure: {0}")]
    Persistence(String),
}

impl SyncError {
    /// Not-found error for entity type `E`
    pub fn not_found<E: SyncEntity>(id: impl Display) -> Self {
        Self::NotFound {
            entity: E::ENTITY_TYPE,
            id: id.to_string(),
        }
    }

    /// Wrap a remote port error, keeping its message verbatim
    pub fn remote(err: anyhow::Error) -> Self {
        Self::RemoteSync(err.to_string())
    }

    /// Wrap a repository port error with its full context chain
    pub fn persistence(err: anyhow::Error) -> Self {
        Self::Persistence(format!("{err:#}"))
    }
}

/// Result alias for use-case operations
pub type SyncResult<T> = Result<T, SyncError>;
