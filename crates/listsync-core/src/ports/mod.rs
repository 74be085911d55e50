//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IEntityRepository`] - Persistent storage for lists and members
//! - [`IRemoteApi`] - Mailchimp Marketing API operations

pub mod entity_repository;
pub mod remote_api;

pub use entity_repository::{IEntityRepository, ListFilter, MemberFilter};
pub use remote_api::{IRemoteApi, RemotePath, RemoteResource};
