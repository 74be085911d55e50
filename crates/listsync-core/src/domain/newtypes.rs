//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain identifiers and values.
//! Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

// ============================================================================
// UUID-based ID types
// ============================================================================

/// Local identifier for MailingList entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(Uuid);

impl ListId {
    /// Create a new random ListId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a ListId from an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ListId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ListId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ListId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("Invalid ListId: {e}")))
    }
}

impl From<Uuid> for ListId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Local identifier for ListMember entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(Uuid);

impl MemberId {
    /// Create a new random MemberId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a MemberId from an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for MemberId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MemberId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("Invalid MemberId: {e}")))
    }
}

impl From<Uuid> for MemberId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

// ============================================================================
// Mailchimp-specific types
// ============================================================================

/// Identifier assigned by Mailchimp on creation
///
/// Format: short alphanumeric string, e.g. "272ed4eff3" for a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteId(String);

impl RemoteId {
    /// Create a new RemoteId
    ///
    /// # Errors
    /// Returns error if the ID format is invalid
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.is_empty() {
            return Err(DomainError::InvalidRemoteId(
                "Remote ID cannot be empty".to_string(),
            ));
        }

        // Remote IDs end up as URL path segments
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::InvalidRemoteId(format!(
                "Remote ID contains invalid characters: {id}"
            )));
        }

        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RemoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemoteId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for RemoteId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RemoteId> for String {
    fn from(id: RemoteId) -> Self {
        id.0
    }
}

/// Mailchimp subscriber hash
///
/// Lowercase hex MD5 digest of the lower-cased member email address.
/// Mailchimp routes every member-level request through this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubscriberHash(String);

impl SubscriberHash {
    /// Length of a hex-encoded MD5 digest
    const HEX_LEN: usize = 32;

    /// Wrap an existing hash string
    ///
    /// # Errors
    /// Returns error if the value is not 32 lowercase hex characters
    pub fn new(hash: String) -> Result<Self, DomainError> {
        if hash.len() != Self::HEX_LEN {
            return Err(DomainError::InvalidSubscriberHash(format!(
                "expected {} hex characters, got {}",
                Self::HEX_LEN,
                hash.len()
            )));
        }

        if !hash
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(DomainError::InvalidSubscriberHash(format!(
                "not lowercase hex: {hash}"
            )));
        }

        Ok(Self(hash))
    }

    /// Compute the canonical hash for an email address
    #[must_use]
    pub fn of(email: &Email) -> Self {
        let mut hasher = Md5::new();
        hasher.update(email.as_str().to_lowercase().as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Whether this hash is the canonical hash of `email`
    #[must_use]
    pub fn matches(&self, email: &Email) -> bool {
        *self == Self::of(email)
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SubscriberHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubscriberHash {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for SubscriberHash {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<SubscriberHash> for String {
    fn from(hash: SubscriberHash) -> Self {
        hash.0
    }
}

// ============================================================================
// Email type
// ============================================================================

/// Validated email address (RFC 5322 basic validation)
///
/// Performs basic structural validation:
/// - Contains exactly one @
/// - Has non-empty local part
/// - Has non-empty domain with at least one dot
///
/// The address is stored as given; Mailchimp keeps the original casing
/// and only the subscriber hash is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Create a new validated Email
    ///
    /// # Errors
    /// Returns error if the email format is invalid
    pub fn new(email: String) -> Result<Self, DomainError> {
        Self::validate(&email)?;
        Ok(Self(email))
    }

    /// Whether `email` would be accepted by [`Email::new`]
    #[must_use]
    pub fn is_valid(email: &str) -> bool {
        Self::validate(email).is_ok()
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(email: &str) -> Result<(), DomainError> {
        if email.is_empty() {
            return Err(DomainError::InvalidEmail(
                "Email cannot be empty".to_string(),
            ));
        }

        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() != 2 {
            return Err(DomainError::InvalidEmail(format!(
                "Email must contain exactly one '@': {email}"
            )));
        }

        let local = parts[0];
        let domain = parts[1];

        if local.is_empty() {
            return Err(DomainError::InvalidEmail(format!(
                "Email local part cannot be empty: {email}"
            )));
        }

        if local.len() > 64 {
            return Err(DomainError::InvalidEmail(format!(
                "Email local part too long (max 64 chars): {email}"
            )));
        }

        // Local part can contain alphanumeric, dots, hyphens, underscores, plus
        if !local
            .chars()
            .all(|c| c.is_alphanumeric() || ".+-_'".contains(c))
        {
            return Err(DomainError::InvalidEmail(format!(
                "Email local part contains invalid characters: {email}"
            )));
        }

        if domain.is_empty() {
            return Err(DomainError::InvalidEmail(format!(
                "Email domain cannot be empty: {email}"
            )));
        }

        if domain.len() > 255 {
            return Err(DomainError::InvalidEmail(format!(
                "Email domain too long (max 255 chars): {email}"
            )));
        }

        if !domain.contains('.') {
            return Err(DomainError::InvalidEmail(format!(
                "Email domain must contain at least one dot: {email}"
            )));
        }

        if !domain
            .chars()
            .all(|c| c.is_alphanumeric() || ".-".contains(c))
        {
            return Err(DomainError::InvalidEmail(format!(
                "Email domain contains invalid characters: {email}"
            )));
        }

        for label in domain.split('.') {
            if label.is_empty() {
                return Err(DomainError::InvalidEmail(format!(
                    "Email domain contains empty label: {email}"
                )));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(DomainError::InvalidEmail(format!(
                    "Email domain label cannot start or end with hyphen: {email}"
                )));
            }
        }

        Ok(())
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Email {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod id_tests {
        use super::*;

        #[test]
        fn test_new_creates_unique_ids() {
            assert_ne!(ListId::new(), ListId::new());
            assert_ne!(MemberId::new(), MemberId::new());
        }

        #[test]
        fn test_from_str() {
            let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
            let id: ListId = uuid_str.parse().unwrap();
            assert_eq!(id.to_string(), uuid_str);

            let id: MemberId = uuid_str.parse().unwrap();
            assert_eq!(id.to_string(), uuid_str);
        }

        #[test]
        fn test_from_str_invalid() {
            let result: Result<ListId, _> = "not-a-uuid".parse();
            assert!(matches!(result, Err(DomainError::InvalidId(_))));
        }

        #[test]
        fn test_serializes_as_plain_string() {
            let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
            let json = serde_json::to_string(&MemberId::from_uuid(uuid)).unwrap();
            assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");
        }
    }

    mod remote_id_tests {
        use super::*;

        #[test]
        fn test_valid_id() {
            let id = RemoteId::new("272ed4eff3".to_string()).unwrap();
            assert_eq!(id.as_str(), "272ed4eff3");
        }

        #[test]
        fn test_empty_fails() {
            assert!(RemoteId::new(String::new()).is_err());
        }

        #[test]
        fn test_path_characters_fail() {
            assert!(RemoteId::new("abc/def".to_string()).is_err());
            assert!(RemoteId::new("abc def".to_string()).is_err());
            assert!(RemoteId::new("invalid@id".to_string()).is_err());
        }

        #[test]
        fn test_deserialize_rejects_invalid() {
            let result: Result<RemoteId, _> = serde_json::from_str("\"\"");
            assert!(result.is_err());
        }
    }

    mod subscriber_hash_tests {
        use super::*;

        #[test]
        fn test_of_is_md5_of_lowercased_email() {
            // md5("urist.mcvankab@freddiesjokes.com")
            let email = Email::new("Urist.McVankab@freddiesjokes.com".to_string()).unwrap();
            let hash = SubscriberHash::of(&email);
            assert_eq!(hash.as_str(), "62eeb292278cc15f5817cb78f7790b08");
        }

        #[test]
        fn test_case_insensitive() {
            let lower = Email::new("x@y.com".to_string()).unwrap();
            let upper = Email::new("X@Y.COM".to_string()).unwrap();
            assert_eq!(SubscriberHash::of(&lower), SubscriberHash::of(&upper));
            assert!(SubscriberHash::of(&lower).matches(&upper));
        }

        #[test]
        fn test_new_validates_format() {
            assert!(SubscriberHash::new("62eeb292278cc15f5817cb78f7790b08".to_string()).is_ok());
            assert!(SubscriberHash::new("62EEB292278CC15F5817CB78F7790B08".to_string()).is_err());
            assert!(SubscriberHash::new("abc".to_string()).is_err());
            assert!(SubscriberHash::new("z".repeat(32)).is_err());
        }
    }

    mod email_tests {
        use super::*;

        #[test]
        fn test_valid_email() {
            let email = Email::new("user@example.com".to_string()).unwrap();
            assert_eq!(email.as_str(), "user@example.com");
        }

        #[test]
        fn test_casing_preserved() {
            let email = Email::new("User@EXAMPLE.COM".to_string()).unwrap();
            assert_eq!(email.as_str(), "User@EXAMPLE.COM");
            let lower = Email::new("user@example.com".to_string()).unwrap();
            assert_ne!(email, lower);
            assert_eq!(SubscriberHash::of(&email), SubscriberHash::of(&lower));
        }

        #[test]
        fn test_invalid_emails() {
            for bad in [
                "",
                "userexample.com",
                "user@name@example.com",
                "user@localhost",
                "@example.com",
                "user@",
                "user@-example.com",
                "user@example-.com",
                "user@example..com",
            ] {
                assert!(!Email::is_valid(bad), "{bad} should be rejected");
            }
        }

        #[test]
        fn test_serde_roundtrip() {
            let email = Email::new("test@example.com".to_string()).unwrap();
            let json = serde_json::to_string(&email).unwrap();
            let parsed: Email = serde_json::from_str(&json).unwrap();
            assert_eq!(email, parsed);
        }
    }
}
