//! Mailing list synchronization use case
//!
//! Every write is applied locally first and then pushed to Mailchimp, except
//! deletion, which removes the remote list before the local one. A failed
//! remote call never rolls back the local write; the caller receives
//! [`SyncError::RemoteSync`] and the record stays as it was stored.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::{SyncError, SyncResult};
use crate::domain::{Attributes, ListId, MailingList, SyncEntity};
use crate::ports::{IEntityRepository, IRemoteApi, ListFilter, RemotePath};

/// Use case for creating, updating and deleting mailing lists
pub struct ListSyncUseCase {
    repository: Arc<dyn IEntityRepository + Send + Sync>,
    remote: Arc<dyn IRemoteApi + Send + Sync>,
}

impl ListSyncUseCase {
    /// Creates a new ListSyncUseCase with the required dependencies
    ///
    /// # Arguments
    ///
    /// * `repository` - Local store for lists and members
    /// * `remote` - Mailchimp API client
    pub fn new(
        repository: Arc<dyn IEntityRepository + Send + Sync>,
        remote: Arc<dyn IRemoteApi + Send + Sync>,
    ) -> Self {
        Self { repository, remote }
    }

    /// Validates, stores and pushes a new list
    ///
    /// # Errors
    ///
    /// - `Validation` if `attributes` break the rule table; nothing is stored
    /// - `RemoteSync` if Mailchimp rejects the list; the local record is kept
    ///   without a remote id
    pub async fn create(&self, attributes: &Attributes) -> SyncResult<MailingList> {
        let mut list = MailingList::from_attributes(attributes)?;
        self.persist(&list).await?;
        debug!(list_id = %list.id(), "Stored mailing list, pushing to Mailchimp");

        let resource = self
            .remote
            .create(&RemotePath::Lists, &list.remote_attributes())
            .await
            .map_err(|e| {
                warn!(
                    list_id = %list.id(),
                    error = %e,
                    "Remote create failed, list kept locally without remote id"
                );
                SyncError::remote(e)
            })?;

        list.set_remote_id(resource.id);
        list.mark_synced();
        self.persist(&list).await?;
        info!(
            list_id = %list.id(),
            remote_id = ?list.remote_id().map(|r| r.as_str()),
            "Mailing list created on Mailchimp"
        );

        Ok(list)
    }

    /// Loads a list from the local store
    ///
    /// # Errors
    ///
    /// `NotFound` if no list has this id
    pub async fn read(&self, id: &ListId) -> SyncResult<MailingList> {
        self.repository
            .get_list(id)
            .await
            .map_err(SyncError::persistence)?
            .ok_or_else(|| SyncError::not_found::<MailingList>(id))
    }

    /// Lists stored mailing lists matching `filter`
    pub async fn list(&self, filter: &ListFilter) -> SyncResult<Vec<MailingList>> {
        self.repository
            .query_lists(filter)
            .await
            .map_err(SyncError::persistence)
    }

    /// Merges `changes` into a stored list, stores it and pushes it
    ///
    /// Lists that never reached Mailchimp are only updated locally.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no list has this id
    /// - `Validation` if the merged attributes break the rule table
    /// - `RemoteSync` if Mailchimp rejects the update; the local change is kept
    pub async fn update(&self, id: &ListId, changes: &Attributes) -> SyncResult<MailingList> {
        let mut list = self.read(id).await?;
        list.apply_changes(changes)?;
        self.persist(&list).await?;

        let Some(remote_id) = list.remote_id().cloned() else {
            info!(list_id = %id, "List has no remote id, skipping remote update");
            return Ok(list);
        };

        self.remote
            .update(&RemotePath::List(remote_id), &list.remote_attributes())
            .await
            .map_err(|e| {
                warn!(list_id = %id, error = %e, "Remote update failed, local change kept");
                SyncError::remote(e)
            })?;

        list.mark_synced();
        self.persist(&list).await?;
        Ok(list)
    }

    /// Deletes a list remotely (when synced) and then locally
    ///
    /// The local record and its members are removed even when the remote
    /// delete fails.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no list has this id
    /// - `RemoteSync` if the remote delete failed, after local deletion
    pub async fn delete(&self, id: &ListId) -> SyncResult<()> {
        let list = self.read(id).await?;

        let remote_result = match list.remote_id() {
            Some(remote_id) => self.remote.delete(&RemotePath::List(remote_id.clone())).await,
            None => Ok(()),
        };

        self.repository
            .delete_list(id)
            .await
            .map_err(SyncError::persistence)?;

        remote_result.map_err(|e| {
            warn!(list_id = %id, error = %e, "Remote delete failed, local list removed anyway");
            SyncError::remote(e)
        })
    }

    /// Pushes the stored state of a list again
    ///
    /// Creates the list remotely when it has no remote id yet (e.g. after an
    /// earlier remote failure), otherwise sends a full update.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no list has this id
    /// - `RemoteSync` if Mailchimp rejects the call
    pub async fn resync(&self, id: &ListId) -> SyncResult<MailingList> {
        let mut list = self.read(id).await?;

        let resource = match list.remote_id().cloned() {
            Some(remote_id) => {
                self.remote
                    .update(&RemotePath::List(remote_id), &list.remote_attributes())
                    .await
            }
            None => {
                self.remote
                    .create(&RemotePath::Lists, &list.remote_attributes())
                    .await
            }
        }
        .map_err(SyncError::remote)?;

        if list.remote_id().is_none() {
            info!(list_id = %id, remote_id = %resource.id, "Mailing list created on Mailchimp");
            list.set_remote_id(resource.id);
        }
        list.mark_synced();
        self.persist(&list).await?;
        Ok(list)
    }

    async fn persist(&self, list: &MailingList) -> SyncResult<()> {
        self.repository
            .save_list(list)
            .await
            .map_err(SyncError::persistence)
    }
}
