//! listsync Core - Domain logic and synchronization rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `MailingList`, `ListMember`
//! - **Validation** - Declarative per-entity rule tables
//! - **Use cases** - `ListSyncUseCase`, `MemberSyncUseCase`
//! - **Port definitions** - Traits for adapters: `IEntityRepository`, `IRemoteApi`
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement
//! (`listsync-cache` for SQLite, `listsync-mailchimp` for the remote API).
//! Use cases orchestrate domain entities through port interfaces and keep
//! local records consistent with their remote counterparts.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
