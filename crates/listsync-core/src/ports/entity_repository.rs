//! Entity repository port (driven/secondary port)
//!
//! This module defines the interface for persisting and querying mailing
//! lists and their members.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific
//!   and don't need domain-level classification.
//! - The filter structs provide a composable query mechanism without
//!   exposing storage implementation details.
//! - Members reference lists by local id; deleting a list removes its
//!   members in the same call.

use crate::domain::{ListId, ListMember, MailingList, MemberId, MemberStatus, SyncEntity};

// ============================================================================
// Filters
// ============================================================================

/// Filter criteria for querying mailing lists
///
/// All fields are optional; when `None`, no filtering is applied for that field.
/// Multiple filters are combined with AND logic.
///
/// # Example
///
/// ```
/// use listsync_core::ports::ListFilter;
///
/// // Lists that have not reached Mailchimp yet
/// let filter = ListFilter::new().with_synced(false);
/// assert!(!filter.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// `Some(true)` for lists with a remote id, `Some(false)` for lists without
    pub synced: Option<bool>,
    /// Exact name match
    pub name: Option<String>,
}

impl ListFilter {
    /// Creates a new empty filter (matches all lists)
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the synced filter
    pub fn with_synced(mut self, synced: bool) -> Self {
        self.synced = Some(synced);
        self
    }

    /// Sets the name filter
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns true if no filters are set
    pub fn is_empty(&self) -> bool {
        self.synced.is_none() && self.name.is_none()
    }

    /// Whether `list` satisfies every set criterion
    pub fn matches(&self, list: &MailingList) -> bool {
        self.synced.map_or(true, |s| list.remote_id().is_some() == s)
            && self.name.as_deref().map_or(true, |n| list.name() == n)
    }
}

/// Filter criteria for querying list members
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilter {
    /// Members of this list
    pub list_id: Option<ListId>,
    /// Members with this status
    pub status: Option<MemberStatus>,
    /// Case-insensitive email match
    pub email_address: Option<String>,
    /// `Some(true)` for members with a remote id, `Some(false)` for members without
    pub synced: Option<bool>,
}

impl MemberFilter {
    /// Creates a new empty filter (matches all members)
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the list filter
    pub fn with_list_id(mut self, list_id: ListId) -> Self {
        self.list_id = Some(list_id);
        self
    }

    /// Sets the status filter
    pub fn with_status(mut self, status: MemberStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the email filter
    pub fn with_email_address(mut self, email: impl Into<String>) -> Self {
        self.email_address = Some(email.into());
        self
    }

    /// Sets the synced filter
    pub fn with_synced(mut self, synced: bool) -> Self {
        self.synced = Some(synced);
        self
    }

    /// Returns true if no filters are set
    pub fn is_empty(&self) -> bool {
        self.list_id.is_none()
            && self.status.is_none()
            && self.email_address.is_none()
            && self.synced.is_none()
    }

    /// Whether `member` satisfies every set criterion
    pub fn matches(&self, member: &ListMember) -> bool {
        self.list_id.map_or(true, |id| member.list_id() == Some(id))
            && self.status.map_or(true, |s| member.status() == s)
            && self.email_address.as_deref().map_or(true, |e| {
                member.email_address().as_str().eq_ignore_ascii_case(e)
            })
            && self.synced.map_or(true, |s| member.remote_id().is_some() == s)
    }
}

// ============================================================================
// IEntityRepository trait
// ============================================================================

/// Port trait for persistent entity storage
///
/// ## Implementation Notes
///
/// - Every call is durable and atomic on its own.
/// - `save_*` inserts or replaces the whole record; last writer wins.
/// - `delete_*` of an unknown id is not an error.
/// - `delete_list` also removes the list's members.
#[async_trait::async_trait]
pub trait IEntityRepository: Send + Sync {
    // --- MailingList operations ---

    /// Saves a mailing list (insert or update)
    async fn save_list(&self, list: &MailingList) -> anyhow::Result<()>;

    /// Retrieves a mailing list by its local ID
    async fn get_list(&self, id: &ListId) -> anyhow::Result<Option<MailingList>>;

    /// Deletes a mailing list and its members
    async fn delete_list(&self, id: &ListId) -> anyhow::Result<()>;

    /// Queries mailing lists matching the filter, oldest first
    async fn query_lists(&self, filter: &ListFilter) -> anyhow::Result<Vec<MailingList>>;

    // --- ListMember operations ---

    /// Saves a list member (insert or update)
    async fn save_member(&self, member: &ListMember) -> anyhow::Result<()>;

    /// Retrieves a list member by its local ID
    async fn get_member(&self, id: &MemberId) -> anyhow::Result<Option<ListMember>>;

    /// Deletes a list member
    async fn delete_member(&self, id: &MemberId) -> anyhow::Result<()>;

    /// Queries list members matching the filter, oldest first
    async fn query_members(&self, filter: &MemberFilter) -> anyhow::Result<Vec<ListMember>>;
}
