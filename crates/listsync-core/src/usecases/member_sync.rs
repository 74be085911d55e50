//! List member synchronization use case
//!
//! Members are pushed under their list's remote id and addressed afterwards
//! by subscriber hash. A member whose list is unknown to Mailchimp (no list,
//! or a list that was never synced) is kept locally and not pushed.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::{SyncError, SyncResult};
use crate::domain::{
    Attributes, ListId, ListMember, MailingList, MemberId, RemoteId, SyncEntity,
    ValidationErrors,
};
use crate::ports::{IEntityRepository, IRemoteApi, MemberFilter, RemotePath};

/// Use case for creating, updating and deleting list members
pub struct MemberSyncUseCase {
    repository: Arc<dyn IEntityRepository + Send + Sync>,
    remote: Arc<dyn IRemoteApi + Send + Sync>,
}

impl MemberSyncUseCase {
    /// Creates a new MemberSyncUseCase with the required dependencies
    pub fn new(
        repository: Arc<dyn IEntityRepository + Send + Sync>,
        remote: Arc<dyn IRemoteApi + Send + Sync>,
    ) -> Self {
        Self { repository, remote }
    }

    /// Validates, stores and pushes a new member
    ///
    /// # Errors
    ///
    /// - `Validation` if `attributes` break the rule table
    /// - `NotFound` if `list_id` names a list that is not stored; nothing is
    ///   stored in that case
    /// - `RemoteSync` if Mailchimp rejects the member; the local record is
    ///   kept without remote id or subscriber hash
    pub async fn create(&self, attributes: &Attributes) -> SyncResult<ListMember> {
        let mut member = ListMember::from_attributes(attributes)?;
        let list = self.resolve_list(member.list_id()).await?;
        self.persist(&member).await?;

        let Some(list_remote) = list.as_ref().and_then(|l| l.remote_id()).cloned() else {
            info!(
                member_id = %member.id(),
                "Member has no synced list, skipping remote create"
            );
            return Ok(member);
        };

        debug!(member_id = %member.id(), list = %list_remote, "Pushing member to Mailchimp");
        let resource = self
            .remote
            .create(&RemotePath::Members(list_remote), &member.remote_attributes())
            .await
            .map_err(|e| {
                warn!(
                    member_id = %member.id(),
                    error = %e,
                    "Remote create failed, member kept locally without remote id"
                );
                SyncError::remote(e)
            })?;

        member.set_remote_id(resource.id);
        member.refresh_subscriber_hash();
        member.mark_synced();
        self.persist(&member).await?;
        info!(
            member_id = %member.id(),
            subscriber_hash = ?member.subscriber_hash().map(|h| h.as_str()),
            "Member created on Mailchimp"
        );

        Ok(member)
    }

    /// Loads a member from the local store
    ///
    /// # Errors
    ///
    /// `NotFound` if no member has this id
    pub async fn read(&self, id: &MemberId) -> SyncResult<ListMember> {
        self.repository
            .get_member(id)
            .await
            .map_err(SyncError::persistence)?
            .ok_or_else(|| SyncError::not_found::<ListMember>(id))
    }

    /// Lists stored members matching `filter`
    pub async fn list(&self, filter: &MemberFilter) -> SyncResult<Vec<ListMember>> {
        self.repository
            .query_members(filter)
            .await
            .map_err(SyncError::persistence)
    }

    /// Merges `changes` into a stored member, stores it and pushes it
    ///
    /// The remote request is addressed by the subscriber hash Mailchimp last
    /// confirmed, so an email change renames the remote member. The new hash
    /// is only stored once Mailchimp accepts the change.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no member has this id, or a new `list_id` is not stored
    /// - `Validation` if the merged attributes break the rule table, or the
    ///   change moves a synced member to another list
    /// - `RemoteSync` if Mailchimp rejects the update; the local change is kept
    pub async fn update(&self, id: &MemberId, changes: &Attributes) -> SyncResult<ListMember> {
        let mut member = self.read(id).await?;
        let previous_key = member.remote_key();
        let previous_list = member.list_id();

        member.apply_changes(changes)?;

        if member.list_id() != previous_list {
            if member.is_synced() {
                return Err(ValidationErrors::single(
                    "list_id",
                    "The list id cannot change once the member is synced.",
                )
                .into());
            }
            self.resolve_list(member.list_id()).await?;
        }

        self.persist(&member).await?;

        if !member.is_synced() {
            info!(member_id = %id, "Member has no remote id, skipping remote update");
            return Ok(member);
        }

        let Some(list_remote) = self.list_remote_id(member.list_id()).await? else {
            info!(member_id = %id, "Member's list is not synced, skipping remote update");
            return Ok(member);
        };

        self.remote
            .update(
                &RemotePath::Member {
                    list: list_remote,
                    member: previous_key,
                },
                &member.remote_attributes(),
            )
            .await
            .map_err(|e| {
                warn!(member_id = %id, error = %e, "Remote update failed, local change kept");
                SyncError::remote(e)
            })?;

        member.refresh_subscriber_hash();
        member.mark_synced();
        self.persist(&member).await?;
        Ok(member)
    }

    /// Deletes a member remotely (when synced) and then locally
    ///
    /// # Errors
    ///
    /// - `NotFound` if no member has this id
    /// - `RemoteSync` if the remote delete failed, after local deletion
    pub async fn delete(&self, id: &MemberId) -> SyncResult<()> {
        let member = self.read(id).await?;

        let remote_result = if member.is_synced() {
            match self.list_remote_id(member.list_id()).await? {
                Some(list_remote) => {
                    self.remote
                        .delete(&RemotePath::Member {
                            list: list_remote,
                            member: member.remote_key(),
                        })
                        .await
                }
                None => Ok(()),
            }
        } else {
            Ok(())
        };

        self.repository
            .delete_member(id)
            .await
            .map_err(SyncError::persistence)?;

        remote_result.map_err(|e| {
            warn!(member_id = %id, error = %e, "Remote delete failed, local member removed anyway");
            SyncError::remote(e)
        })
    }

    /// Pushes the stored state of a member again
    ///
    /// Creates the member remotely when it has no remote id yet, otherwise
    /// sends a full update.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no member has this id
    /// - `Validation` if the member's list is not synced, so there is
    ///   nowhere to push it
    /// - `RemoteSync` if Mailchimp rejects the call
    pub async fn resync(&self, id: &MemberId) -> SyncResult<ListMember> {
        let mut member = self.read(id).await?;

        let Some(list_remote) = self.list_remote_id(member.list_id()).await? else {
            return Err(ValidationErrors::single(
                "list_id",
                "The member must belong to a synced list.",
            )
            .into());
        };

        if member.is_synced() {
            let path = RemotePath::Member {
                list: list_remote,
                member: member.remote_key(),
            };
            self.remote
                .update(&path, &member.remote_attributes())
                .await
                .map_err(SyncError::remote)?;
            member.refresh_subscriber_hash();
        } else {
            let resource = self
                .remote
                .create(&RemotePath::Members(list_remote), &member.remote_attributes())
                .await
                .map_err(SyncError::remote)?;
            member.set_remote_id(resource.id);
            member.refresh_subscriber_hash();
        }

        member.mark_synced();
        self.persist(&member).await?;
        Ok(member)
    }

    /// Load the list a member points at, failing if it is not stored
    async fn resolve_list(&self, list_id: Option<ListId>) -> SyncResult<Option<MailingList>> {
        let Some(list_id) = list_id else {
            return Ok(None);
        };

        self.repository
            .get_list(&list_id)
            .await
            .map_err(SyncError::persistence)?
            .map(Some)
            .ok_or_else(|| SyncError::not_found::<MailingList>(list_id))
    }

    async fn list_remote_id(&self, list_id: Option<ListId>) -> SyncResult<Option<RemoteId>> {
        let Some(list_id) = list_id else {
            return Ok(None);
        };

        Ok(self
            .repository
            .get_list(&list_id)
            .await
            .map_err(SyncError::persistence)?
            .and_then(|list| list.remote_id().cloned()))
    }

    async fn persist(&self, member: &ListMember) -> SyncResult<()> {
        self.repository
            .save_member(member)
            .await
            .map_err(SyncError::persistence)
    }
}
