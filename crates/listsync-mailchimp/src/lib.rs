//! listsync Mailchimp - Mailchimp Marketing API client
//!
//! Provides async client for:
//! - API key authentication (HTTP basic auth)
//! - Base URL resolution from the key's data center
//! - Resource create/update/delete/read on lists and list members
//!
//! ## Modules
//!
//! - [`client`] - Mailchimp Marketing API HTTP client
//! - [`provider`] - `IRemoteApi` implementation on top of the client

pub mod client;
pub mod provider;

pub use client::MailchimpClient;
pub use provider::MailchimpRemoteApi;

use thiserror::Error;

/// Errors that can occur when communicating with the Mailchimp API
#[derive(Debug, Error)]
pub enum MailchimpError {
    /// The API answered with an error status
    ///
    /// Displays the problem detail exactly as Mailchimp sent it.
    #[error("{message}")]
    Api {
        /// HTTP status code of the response
        status: u16,
        /// `detail` of the problem document, or its `title`
        message: String,
    },

    /// No API key is configured
    #[error("Mailchimp API key is not configured")]
    MissingApiKey,

    /// The API key does not end in a data center suffix (`-us6`)
    #[error("API key has no data center suffix")]
    MissingDataCenter,

    /// A network-level error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl MailchimpError {
    /// HTTP status of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
