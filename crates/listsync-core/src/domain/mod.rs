//! Domain entities and business logic
//!
//! This module contains the core domain types for listsync:
//! - Newtypes for type-safe identifiers and validated domain types
//! - Declarative validation rule tables
//! - The `SyncEntity` contract shared by synchronized entities
//! - Mailing list and list member entities
//! - Domain-specific error types

pub mod entity;
pub mod errors;
pub mod list_member;
pub mod mailing_list;
pub mod newtypes;
pub mod validation;

// Re-export commonly used types
pub use entity::SyncEntity;
pub use errors::DomainError;
pub use list_member::{ListMember, MemberStatus};
pub use mailing_list::{CampaignDefaults, Contact, MailingList, Visibility};
pub use newtypes::*;
pub use validation::{Attributes, FieldKind, FieldRule, Presence, ValidationErrors};
