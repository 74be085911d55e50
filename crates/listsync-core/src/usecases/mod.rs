//! Use cases (interactors) for listsync
//!
//! This module contains the application use cases that orchestrate
//! domain entities and port interfaces. Use cases are thin coordinators
//! that delegate business rules to domain methods and I/O to ports.
//!
//! ## Use Cases
//!
//! - [`ListSyncUseCase`] - Mailing list create/update/delete with remote sync
//! - [`MemberSyncUseCase`] - List member create/update/delete with remote sync
//!
//! [`ApiResponse`] maps their outcomes onto status codes and JSON bodies.

pub mod error;
pub mod list_sync;
pub mod member_sync;
pub mod response;

#[cfg(test)]
pub(crate) mod fakes;

pub use error::{SyncError, SyncResult};
pub use list_sync::ListSyncUseCase;
pub use member_sync::MemberSyncUseCase;
pub use response::ApiResponse;
