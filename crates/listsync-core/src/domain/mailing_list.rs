//! MailingList entity
//!
//! A Mailchimp audience as stored locally. The list carries its own local
//! [`ListId`] and, once the remote create has succeeded, the id Mailchimp
//! assigned to it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::entity::{merge, SyncEntity};
use super::errors::DomainError;
use super::newtypes::{Email, ListId, RemoteId};
use super::validation::{
    bool_at, object_at, strip_nulls, string_at, Attributes, FieldKind, FieldRule,
    ValidationErrors,
};

// ============================================================================
// Value objects
// ============================================================================

/// Whether the list is publicly visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Public
    Pub,
    /// Private
    Prv,
}

impl Visibility {
    /// Accepted wire values
    pub const NAMES: &'static [&'static str] = &["pub", "prv"];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pub => "pub",
            Self::Prv => "prv",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pub" => Ok(Self::Pub),
            "prv" => Ok(Self::Prv),
            other => Err(DomainError::InvalidVariant {
                field: "visibility".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Postal contact printed in the footer of campaigns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub company: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub phone: Option<String>,
}

impl Contact {
    fn from_object(object: &Attributes) -> Self {
        Self {
            company: string_at(object, "company").unwrap_or_default(),
            address1: string_at(object, "address1").unwrap_or_default(),
            address2: string_at(object, "address2"),
            city: string_at(object, "city").unwrap_or_default(),
            state: string_at(object, "state").unwrap_or_default(),
            zip: string_at(object, "zip").unwrap_or_default(),
            country: string_at(object, "country").unwrap_or_default(),
            phone: string_at(object, "phone"),
        }
    }

    fn to_value(&self) -> Value {
        json!({
            "company": self.company,
            "address1": self.address1,
            "address2": self.address2,
            "city": self.city,
            "state": self.state,
            "zip": self.zip,
            "country": self.country,
            "phone": self.phone,
        })
    }
}

/// Defaults applied to new campaigns sent to the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignDefaults {
    pub from_name: String,
    pub from_email: Email,
    pub subject: String,
    pub language: String,
}

impl CampaignDefaults {
    fn from_object(object: &Attributes) -> Result<Self, ValidationErrors> {
        Ok(Self {
            from_name: string_at(object, "from_name").unwrap_or_default(),
            from_email: required_email(object, "from_email", "campaign_defaults.from_email")?,
            subject: string_at(object, "subject").unwrap_or_default(),
            language: string_at(object, "language").unwrap_or_default(),
        })
    }

    fn to_value(&self) -> Value {
        json!({
            "from_name": self.from_name,
            "from_email": self.from_email.as_str(),
            "subject": self.subject,
            "language": self.language,
        })
    }
}

// ============================================================================
// MailingList
// ============================================================================

const RULES: &[FieldRule] = &[
    FieldRule::required("name", FieldKind::String),
    FieldRule::nullable("permission_reminder", FieldKind::String),
    FieldRule::nullable("email_type_option", FieldKind::Boolean),
    FieldRule::nullable("contact", FieldKind::Object),
    FieldRule::required("contact.company", FieldKind::String),
    FieldRule::required("contact.address1", FieldKind::String),
    FieldRule::nullable("contact.address2", FieldKind::String),
    FieldRule::required("contact.city", FieldKind::String),
    FieldRule::required("contact.state", FieldKind::String),
    FieldRule::required("contact.zip", FieldKind::String),
    FieldRule::required("contact.country", FieldKind::String),
    FieldRule::nullable("contact.phone", FieldKind::String),
    FieldRule::nullable("campaign_defaults", FieldKind::Object),
    FieldRule::required("campaign_defaults.from_name", FieldKind::String),
    FieldRule::required("campaign_defaults.from_email", FieldKind::Email),
    FieldRule::required("campaign_defaults.subject", FieldKind::String),
    FieldRule::required("campaign_defaults.language", FieldKind::String),
    FieldRule::nullable("visibility", FieldKind::OneOf(Visibility::NAMES)),
    FieldRule::nullable("use_archive_bar", FieldKind::Boolean),
    FieldRule::nullable("notify_on_subscribe", FieldKind::Email),
    FieldRule::nullable("notify_on_unsubscribe", FieldKind::Email),
    FieldRule::nullable("mail_chimp_id", FieldKind::String),
];

/// Snapshot keys that never travel to the remote API
const LOCAL_ONLY_KEYS: &[&str] = &["id", "mail_chimp_id", "synced_at"];

/// A mailing list (Mailchimp audience)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailingList {
    id: ListId,
    remote_id: Option<RemoteId>,
    name: String,
    permission_reminder: Option<String>,
    email_type_option: Option<bool>,
    contact: Option<Contact>,
    campaign_defaults: Option<CampaignDefaults>,
    visibility: Option<Visibility>,
    use_archive_bar: Option<bool>,
    notify_on_subscribe: Option<Email>,
    notify_on_unsubscribe: Option<Email>,
    synced_at: Option<DateTime<Utc>>,
}

impl MailingList {
    /// Create a list with only a name
    ///
    /// # Errors
    /// Returns a validation error if the name is blank
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationErrors> {
        let mut attributes = Attributes::new();
        attributes.insert("name".to_string(), Value::String(name.into()));
        Self::from_attributes(&attributes)
    }

    #[must_use]
    pub fn id(&self) -> ListId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn permission_reminder(&self) -> Option<&str> {
        self.permission_reminder.as_deref()
    }

    #[must_use]
    pub fn email_type_option(&self) -> Option<bool> {
        self.email_type_option
    }

    #[must_use]
    pub fn contact(&self) -> Option<&Contact> {
        self.contact.as_ref()
    }

    #[must_use]
    pub fn campaign_defaults(&self) -> Option<&CampaignDefaults> {
        self.campaign_defaults.as_ref()
    }

    #[must_use]
    pub fn visibility(&self) -> Option<Visibility> {
        self.visibility
    }

    #[must_use]
    pub fn use_archive_bar(&self) -> Option<bool> {
        self.use_archive_bar
    }

    #[must_use]
    pub fn notify_on_subscribe(&self) -> Option<&Email> {
        self.notify_on_subscribe.as_ref()
    }

    #[must_use]
    pub fn notify_on_unsubscribe(&self) -> Option<&Email> {
        self.notify_on_unsubscribe.as_ref()
    }

    /// Time of the last successful remote write
    #[must_use]
    pub fn synced_at(&self) -> Option<DateTime<Utc>> {
        self.synced_at
    }

    /// Whether a remote create has succeeded for this list
    #[must_use]
    pub fn is_synced(&self) -> bool {
        self.remote_id.is_some()
    }

    /// Record the id returned by a remote create
    pub fn set_remote_id(&mut self, remote_id: RemoteId) {
        self.remote_id = Some(remote_id);
    }

    /// Record a successful remote write
    pub fn mark_synced(&mut self) {
        self.synced_at = Some(Utc::now());
    }
}

impl SyncEntity for MailingList {
    const ENTITY_TYPE: &'static str = "MailingList";

    fn rules() -> &'static [FieldRule] {
        RULES
    }

    fn from_attributes(attributes: &Attributes) -> Result<Self, ValidationErrors> {
        Self::validate(attributes)?;

        let visibility = match string_at(attributes, "visibility") {
            Some(v) => Some(
                v.parse::<Visibility>()
                    .map_err(|e| ValidationErrors::single("visibility", e.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            id: ListId::new(),
            remote_id: None,
            name: string_at(attributes, "name").unwrap_or_default(),
            permission_reminder: string_at(attributes, "permission_reminder"),
            email_type_option: bool_at(attributes, "email_type_option"),
            contact: object_at(attributes, "contact").map(Contact::from_object),
            campaign_defaults: object_at(attributes, "campaign_defaults")
                .map(CampaignDefaults::from_object)
                .transpose()?,
            visibility,
            use_archive_bar: bool_at(attributes, "use_archive_bar"),
            notify_on_subscribe: optional_email(attributes, "notify_on_subscribe")?,
            notify_on_unsubscribe: optional_email(attributes, "notify_on_unsubscribe")?,
            synced_at: None,
        })
    }

    fn apply_changes(&mut self, changes: &Attributes) -> Result<(), ValidationErrors> {
        let merged = merge(self.snapshot(), changes);
        let mut rebuilt = Self::from_attributes(&merged)?;

        rebuilt.id = self.id;
        rebuilt.remote_id = self.remote_id.take();
        rebuilt.synced_at = self.synced_at;
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
            "id": self.id.to_string(),
            "mail_chimp_id": self.remote_id.as_ref().map(RemoteId::as_str),
            "name": self.name,
            "permission_reminder": self.permission_reminder,
            "email_type_option": self.email_type_option,
            "contact": self.contact.as_ref().map(Contact::to_value),
            "campaign_defaults": self.campaign_defaults.as_ref().map(CampaignDefaults::to_value),
            "visibility": self.visibility.map(|v| v.as_str()),
            "use_archive_bar": self.use_archive_bar,
            "notify_on_subscribe": self.notify_on_subscribe.as_ref().map(Email::as_str),
            "notify_on_unsubscribe": self.notify_on_unsubscribe.as_ref().map(Email::as_str),
            "synced_at": self.synced_at.map(|t| t.to_rfc3339()),
        });

        match value {
            Value::Object(map) => map,
            _ => Attributes::new(),
        }
    }

    fn remote_attributes(&self) -> Attributes {
        let mut snapshot = self.snapshot();
        for key in LOCAL_ONLY_KEYS {
            snapshot.remove(*key);
        }

        match strip_nulls(Value::Object(snapshot)) {
            Value::Object(map) => map,
            _ => Attributes::new(),
        }
    }
}

fn optional_email(attributes: &Attributes, key: &str) -> Result<Option<Email>, ValidationErrors> {
    string_at(attributes, key)
        .map(|s| Email::new(s).map_err(|e| ValidationErrors::single(key, e.to_string())))
        .transpose()
}

fn required_email(
    attributes: &Attributes,
    key: &str,
    field: &str,
) -> Result<Email, ValidationErrors> {
    let raw = string_at(attributes, key).unwrap_or_default();
    Email::new(raw).map_err(|e| ValidationErrors::single(field, e.to_string()))
}
