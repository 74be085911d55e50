//! Remote API port (driven/secondary port)
//!
//! This module defines the interface for talking to the Mailchimp Marketing
//! API. Resources are addressed by [`RemotePath`], which renders to the
//! relative URL path under the API root.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are adapter-specific.
//!   Adapters must make the `Display` of their errors the upstream message,
//!   unmodified, since use cases pass it through to callers.
//! - `RemoteResource` is a port-level DTO, not a domain entity; use cases
//!   copy the remote id back onto the entity.

use std::fmt;

use crate::domain::{Attributes, RemoteId, SubscriberHash};

/// A remote collection or resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemotePath {
    /// All lists (`lists`)
    Lists,
    /// One list (`lists/{list_id}`)
    List(RemoteId),
    /// Members of a list (`lists/{list_id}/members`)
    Members(RemoteId),
    /// One member (`lists/{list_id}/members/{subscriber_hash}`)
    Member {
        list: RemoteId,
        member: SubscriberHash,
    },
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lists => write!(f, "lists"),
            Self::List(list) => write!(f, "lists/{list}"),
            Self::Members(list) => write!(f, "lists/{list}/members"),
            Self::Member { list, member } => write!(f, "lists/{list}/members/{member}"),
        }
    }
}

/// A resource as returned by the remote API
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResource {
    /// Remote identifier of the resource
    pub id: RemoteId,
    /// Full response body
    pub attributes: Attributes,
}

/// Port trait for the remote list-management API
#[async_trait::async_trait]
pub trait IRemoteApi: Send + Sync {
    /// Creates a resource under a collection path
    async fn create(
        &self,
        path: &RemotePath,
        attributes: &Attributes,
    ) -> anyhow::Result<RemoteResource>;

    /// Updates the resource at `path` with the given attributes
    async fn update(
        &self,
        path: &RemotePath,
        attributes: &Attributes,
    ) -> anyhow::Result<RemoteResource>;

    /// Deletes the resource at `path`
    async fn delete(&self, path: &RemotePath) -> anyhow::Result<()>;

    /// Reads the resource at `path`
    async fn read(&self, path: &RemotePath) -> anyhow::Result<RemoteResource>;
}
