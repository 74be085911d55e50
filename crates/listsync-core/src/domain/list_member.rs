//! ListMember entity
//!
//! A subscriber of a mailing list. Members reference their list by local
//! [`ListId`] only; the list itself is looked up through the repository when
//! the member is pushed to Mailchimp.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::entity::{merge, SyncEntity};
use super::errors::DomainError;
use super::newtypes::{Email, ListId, MemberId, RemoteId, SubscriberHash};
use super::validation::{
    string_at, Attributes, FieldKind, FieldRule, ValidationErrors,
};

/// Subscription status of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Subscribed,
    Unsubscribed,
    Cleaned,
    Pending,
    Transactional,
}

impl MemberStatus {
    /// Accepted wire values
    pub const NAMES: &'static [&'static str] = &[
        "subscribed",
        "unsubscribed",
        "cleaned",
        "pending",
        "transactional",
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscribed => "subscribed",
            Self::Unsubscribed => "unsubscribed",
            Self::Cleaned => "cleaned",
            Self::Pending => "pending",
            Self::Transactional => "transactional",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subscribed" => Ok(Self::Subscribed),
            "unsubscribed" => Ok(Self::Unsubscribed),
            "cleaned" => Ok(Self::Cleaned),
            "pending" => Ok(Self::Pending),
            "transactional" => Ok(Self::Transactional),
            other => Err(DomainError::InvalidVariant {
                field: "status".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

const RULES: &[FieldRule] = &[
    FieldRule::nullable("list_id", FieldKind::Uuid),
    FieldRule::nullable("mail_chimp_id", FieldKind::String),
    FieldRule::required("email_address", FieldKind::Email),
    FieldRule::required("status", FieldKind::OneOf(MemberStatus::NAMES)),
    FieldRule::nullable("subscriber_hash", FieldKind::String),
];

/// A member of a mailing list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListMember {
    id: MemberId,
    list_id: Option<ListId>,
    remote_id: Option<RemoteId>,
    email_address: Email,
    status: MemberStatus,
    /// Hash Mailchimp last confirmed; lags behind an unpushed email change
    subscriber_hash: Option<SubscriberHash>,
    synced_at: Option<DateTime<Utc>>,
}

impl ListMember {
    /// Create a member without a list
    #[must_use]
    pub fn new(email_address: Email, status: MemberStatus) -> Self {
        Self {
            id: MemberId::new(),
            list_id: None,
            remote_id: None,
            email_address,
            status,
            subscriber_hash: None,
            synced_at: None,
        }
    }

    /// Attach the member to a list
    #[must_use]
    pub fn with_list(mut self, list_id: ListId) -> Self {
        self.list_id = Some(list_id);
        self
    }

    #[must_use]
    pub fn id(&self) -> MemberId {
        self.id
    }

    #[must_use]
    pub fn list_id(&self) -> Option<ListId> {
        self.list_id
    }

    #[must_use]
    pub fn email_address(&self) -> &Email {
        &self.email_address
    }

    #[must_use]
    pub fn status(&self) -> MemberStatus {
        self.status
    }

    #[must_use]
    pub fn subscriber_hash(&self) -> Option<&SubscriberHash> {
        self.subscriber_hash.as_ref()
    }

    /// Time of the last successful remote write
    #[must_use]
    pub fn synced_at(&self) -> Option<DateTime<Utc>> {
        self.synced_at
    }

    #[must_use]
    pub fn is_synced(&self) -> bool {
        self.remote_id.is_some()
    }

    /// Key addressing this member under its Mailchimp list
    ///
    /// Mailchimp routes member requests by subscriber hash; when none has
    /// been recorded yet it is derived from the current address.
    #[must_use]
    pub fn remote_key(&self) -> SubscriberHash {
        self.subscriber_hash
            .clone()
            .unwrap_or_else(|| SubscriberHash::of(&self.email_address))
    }

    /// Record the id returned by a remote create
    pub fn set_remote_id(&mut self, remote_id: RemoteId) {
        self.remote_id = Some(remote_id);
    }

    /// Record a subscriber hash reported for this member
    ///
    /// # Errors
    /// Returns `DomainError::InvalidSubscriberHash` if the hash does not
    /// belong to the member's email address
    pub fn set_subscriber_hash(&mut self, hash: SubscriberHash) -> Result<(), DomainError> {
        if !hash.matches(&self.email_address) {
            return Err(DomainError::InvalidSubscriberHash(format!(
                "{hash} is not the hash of {}",
                self.email_address
            )));
        }
        self.subscriber_hash = Some(hash);
        Ok(())
    }

    /// Set the subscriber hash to the canonical hash of the current address
    pub fn refresh_subscriber_hash(&mut self) {
        self.subscriber_hash = Some(SubscriberHash::of(&self.email_address));
    }

    /// Record a successful remote write
    pub fn mark_synced(&mut self) {
        self.synced_at = Some(Utc::now());
    }
}

impl SyncEntity for ListMember {
    const ENTITY_TYPE: &'static str = "ListMember";

    fn rules() -> &'static [FieldRule] {
        RULES
    }

    fn from_attributes(attributes: &Attributes) -> Result<Self, ValidationErrors> {
        Self::validate(attributes)?;

        let list_id = string_at(attributes, "list_id")
            .map(|s| {
                s.parse::<ListId>()
                    .map_err(|e| ValidationErrors::single("list_id", e.to_string()))
            })
            .transpose()?;

        let email_address = Email::new(string_at(attributes, "email_address").unwrap_or_default())
            .map_err(|e| ValidationErrors::single("email_address", e.to_string()))?;

        let status = string_at(attributes, "status")
            .unwrap_or_default()
            .parse::<MemberStatus>()
            .map_err(|e| ValidationErrors::single("status", e.to_string()))?;

        Ok(Self {
            id: MemberId::new(),
            list_id,
            remote_id: None,
            email_address,
            status,
            subscriber_hash: None,
            synced_at: None,
        })
    }

    fn apply_changes(&mut self, changes: &Attributes) -> Result<(), ValidationErrors> {
        let merged = merge(self.snapshot(), changes);
        let mut rebuilt = Self::from_attributes(&merged)?;

        rebuilt.id = self.id;
        rebuilt.remote_id = self.remote_id.take();
        rebuilt.synced_at = self.synced_at;
        rebuilt.subscriber_hash = self.subscriber_hash.take();
        *self = rebuilt;
        Ok(())
    }

    fn local_id(&self) -> String {
        self.id.to_string()
    }

    fn remote_id(&self) -> Option<&RemoteId> {
        self.remote_id.as_ref()
    }

    fn snapshot(&self) -> Attributes {
        let value = json!({
            "member_id": self.id.to_string(),
            "list_id": self.list_id.map(|id| id.to_string()),
            "mail_chimp_id": self.remote_id.as_ref().map(RemoteId::as_str),
            "email_address": self.email_address.as_str(),
            "status": self.status.as_str(),
            "subscriber_hash": self.subscriber_hash.as_ref().map(SubscriberHash::as_str),
            "synced_at": self.synced_at.map(|t| t.to_rfc3339()),
        });

        match value {
            Value::Object(map) => map,
            _ => Attributes::new(),
        }
    }

    fn remote_attributes(&self) -> Attributes {
        let mut payload = Attributes::new();
        payload.insert(
            "email_address".to_string(),
            Value::String(self.email_address.to_string()),
        );
        payload.insert(
            "status".to_string(),
            Value::String(self.status.as_str().to_string()),
        );
        payload
    }
}
