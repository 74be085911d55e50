//! Members command - Manage list members
//!
//! Provides the `listsync members` CLI command. Members of a list that is
//! already in Mailchimp are pushed on every write; others stay local until
//! their list is synced.

use anyhow::Result;
use clap::Subcommand;
use listsync_core::domain::{
    Attributes, ListMember, MemberId, MemberStatus, SyncEntity, ValidationErrors,
};
use listsync_core::ports::MemberFilter;
use listsync_core::usecases::{ApiResponse, MemberSyncUseCase, SyncError, SyncResult};
use tracing::info;

use super::lists::parse_list_id;
use super::{into_response, AttributeInput};
use crate::context::AppContext;

/// List member subcommands
#[derive(Debug, Subcommand)]
pub enum MembersCommand {
    /// Create a member and push it to Mailchimp when its list is synced
    Create {
        #[command(flatten)]
        input: AttributeInput,
    },
    /// Show one member
    Get {
        /// Local member id
        id: String,
    },
    /// Change a member and push the change to Mailchimp
    Update {
        /// Local member id
        id: String,
        #[command(flatten)]
        input: AttributeInput,
    },
    /// Delete a member in Mailchimp and locally
    Delete {
        /// Local member id
        id: String,
    },
    /// List stored members
    List {
        /// Members of this local list id
        #[arg(long)]
        list_id: Option<String>,
        /// subscribed, unsubscribed, cleaned, pending or transactional
        #[arg(long)]
        status: Option<String>,
        /// Email address, compared case-insensitively
        #[arg(long)]
        email: Option<String>,
    },
    /// Retry pushing a member to Mailchimp
    Sync {
        /// Local member id
        id: String,
    },
}

impl MembersCommand {
    /// Execute the members command
    pub async fn execute(&self, ctx: &AppContext) -> Result<ApiResponse> {
        let attributes = match self {
            MembersCommand::Create { input } | MembersCommand::Update { input, .. } => {
                Some(input.read()?)
            }
            _ => None,
        };

        let members = ctx.member_use_case().await?;
        Ok(into_response(self.run(&members, attributes).await))
    }

    async fn run(
        &self,
        members: &MemberSyncUseCase,
        attributes: Option<Attributes>,
    ) -> SyncResult<ApiResponse> {
        let attributes = attributes.unwrap_or_default();

        match self {
            MembersCommand::Create { .. } => {
                let member = members.create(&attributes).await?;
                info!(member_id = %member.id(), "Member created");
                Ok(ApiResponse::created(member.snapshot()))
            }
            MembersCommand::Get { id } => {
                let member = members.read(&parse_member_id(id)?).await?;
                Ok(ApiResponse::ok(member.snapshot()))
            }
            MembersCommand::Update { id, .. } => {
                let member = members.update(&parse_member_id(id)?, &attributes).await?;
                Ok(ApiResponse::ok(member.snapshot()))
            }
            MembersCommand::Delete { id } => {
                members.delete(&parse_member_id(id)?).await?;
                Ok(ApiResponse::no_content())
            }
            MembersCommand::List {
                list_id,
                status,
                email,
            } => {
                let mut filter = MemberFilter::new();
                if let Some(list_id) = list_id {
                    filter = filter.with_list_id(parse_list_id(list_id)?);
                }
                if let Some(status) = status {
                    filter = filter.with_status(parse_status(status)?);
                }
                if let Some(email) = email {
                    filter = filter.with_email_address(email.clone());
                }

                let found = members.list(&filter).await?;
                Ok(ApiResponse::ok_many(found.iter().map(SyncEntity::snapshot)))
            }
            MembersCommand::Sync { id } => {
                let member = members.resync(&parse_member_id(id)?).await?;
                Ok(ApiResponse::ok(member.snapshot()))
            }
        }
    }
}

fn parse_member_id(raw: &str) -> SyncResult<MemberId> {
    raw.parse()
        .map_err(|_| SyncError::not_found::<ListMember>(raw))
}

fn parse_status(raw: &str) -> SyncResult<MemberStatus> {
    raw.parse().map_err(|_| {
        SyncError::Validation(ValidationErrors::single(
            "status",
            "The selected status is invalid.",
        ))
    })
}
