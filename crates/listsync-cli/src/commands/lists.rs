//! Lists command - Manage mailing lists
//!
//! Provides the `listsync lists` CLI command which creates, reads, updates
//! and deletes mailing lists in the local store and pushes every write to
//! Mailchimp.

use anyhow::Result;
use clap::Subcommand;
use listsync_core::domain::{Attributes, ListId, MailingList, SyncEntity};
use listsync_core::ports::ListFilter;
use listsync_core::usecases::{ApiResponse, ListSyncUseCase, SyncError, SyncResult};
use tracing::info;

use super::{into_response, AttributeInput};
use crate::context::AppContext;

/// Mailing list subcommands
#[derive(Debug, Subcommand)]
pub enum ListsCommand {
    /// Create a list and push it to Mailchimp
    Create {
        #[command(flatten)]
        input: AttributeInput,
    },
    /// Show one list
    Get {
        /// Local list id
        id: String,
    },
    /// Change a list and push the change to Mailchimp
    Update {
        /// Local list id
        id: String,
        #[command(flatten)]
        input: AttributeInput,
    },
    /// Delete a list in Mailchimp and locally, with its members
    Delete {
        /// Local list id
        id: String,
    },
    /// List stored lists
    List {
        /// Only lists already in Mailchimp
        #[arg(long, conflicts_with = "unsynced")]
        synced: bool,
        /// Only lists not yet in Mailchimp
        #[arg(long)]
        unsynced: bool,
        /// Exact list name
        #[arg(long)]
        name: Option<String>,
    },
    /// Retry pushing a list to Mailchimp
    Sync {
        /// Local list id
        id: String,
    },
}

impl ListsCommand {
    /// Execute the lists command
    pub async fn execute(&self, ctx: &AppContext) -> Result<ApiResponse> {
        let attributes = match self {
            ListsCommand::Create { input } | ListsCommand::Update { input, .. } => {
                Some(input.read()?)
            }
            _ => None,
        };

        let lists = ctx.list_use_case().await?;
        Ok(into_response(self.run(&lists, attributes).await))
    }

    async fn run(
        &self,
        lists: &ListSyncUseCase,
        attributes: Option<Attributes>,
    ) -> SyncResult<ApiResponse> {
        let attributes = attributes.unwrap_or_default();

        match self {
            ListsCommand::Create { .. } => {
                let list = lists.create(&attributes).await?;
                info!(list_id = %list.id(), "List created");
                Ok(ApiResponse::created(list.snapshot()))
            }
            ListsCommand::Get { id } => {
                let list = lists.read(&parse_list_id(id)?).await?;
                Ok(ApiResponse::ok(list.snapshot()))
            }
            ListsCommand::Update { id, .. } => {
                let list = lists.update(&parse_list_id(id)?, &attributes).await?;
                Ok(ApiResponse::ok(list.snapshot()))
            }
            ListsCommand::Delete { id } => {
                lists.delete(&parse_list_id(id)?).await?;
                Ok(ApiResponse::no_content())
            }
            ListsCommand::List {
                synced,
                unsynced,
                name,
            } => {
                let mut filter = ListFilter::new();
                if *synced {
                    filter = filter.with_synced(true);
                } else if *unsynced {
                    filter = filter.with_synced(false);
                }
                if let Some(name) = name {
                    filter = filter.with_name(name.clone());
                }

                let found = lists.list(&filter).await?;
                Ok(ApiResponse::ok_many(found.iter().map(SyncEntity::snapshot)))
            }
            ListsCommand::Sync { id } => {
                let list = lists.resync(&parse_list_id(id)?).await?;
                Ok(ApiResponse::ok(list.snapshot()))
            }
        }
    }
}

/// Parses a list id; an unparsable id cannot name a stored list
pub fn parse_list_id(raw: &str) -> SyncResult<ListId> {
    raw.parse()
        .map_err(|_| SyncError::not_found::<MailingList>(raw))
}
