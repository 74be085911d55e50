//! Domain error types
//!
//! This module defines error types raised while constructing domain
//! values: identifiers, email addresses, subscriber hashes and enumerations.
//! Attribute-map validation failures use [`ValidationErrors`] instead.
//!
//! [`ValidationErrors`]: super::validation::ValidationErrors

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid email address format
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    /// Invalid remote ID format
    #[error("Invalid remote ID: {0}")]
    InvalidRemoteId(String),

    /// Subscriber hash is malformed or does not belong to the email address
    #[error("Invalid subscriber hash: {0}")]
    InvalidSubscriberHash(String),

    /// Value is not part of a closed enumeration (member status, visibility)
    #[error("Invalid value for {field}: {value}")]
    InvalidVariant {
        /// The enumeration being parsed
        field: String,
        /// The rejected input
        value: String,
    },

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),
}
