//! Shared contract of synchronized entities

use super::newtypes::RemoteId;
use super::validation::{self, Attributes, FieldRule, ValidationErrors};

/// A locally persisted record with a remote Mailchimp counterpart
///
/// Implementors expose a static rule table, construction from an attribute
/// map, and two views of their state: the full local [`snapshot`] and the
/// payload sent to the remote API ([`remote_attributes`]).
///
/// [`snapshot`]: SyncEntity::snapshot
/// [`remote_attributes`]: SyncEntity::remote_attributes
pub trait SyncEntity: Sized {
    /// Name used in not-found messages, e.g. `MailingList[<id>] not found`
    const ENTITY_TYPE: &'static str;

    /// Static validation rule table
    fn rules() -> &'static [FieldRule];

    /// Check an attribute map against [`SyncEntity::rules`]
    ///
    /// # Errors
    /// Returns every violated field
    fn validate(attributes: &Attributes) -> Result<(), ValidationErrors> {
        validation::validate(Self::rules(), attributes)
    }

    /// Build a new entity with a fresh local id
    ///
    /// Identifier and remote-derived keys in `attributes` are ignored.
    ///
    /// # Errors
    /// Returns the validation errors of `attributes`
    fn from_attributes(attributes: &Attributes) -> Result<Self, ValidationErrors>;

    /// Merge `changes` over the current snapshot and re-validate the result
    ///
    /// The local id and remote-derived fields are kept. On error the entity
    /// is left untouched.
    ///
    /// # Errors
    /// Returns the validation errors of the merged map
    fn apply_changes(&mut self, changes: &Attributes) -> Result<(), ValidationErrors>;

    /// Local identifier, rendered as a string
    fn local_id(&self) -> String;

    /// Identifier assigned by the remote system, if synced
    fn remote_id(&self) -> Option<&RemoteId>;

    /// Flat key → value view of every field, with lower-snake names
    fn snapshot(&self) -> Attributes;

    /// Payload for remote create/update: domain attributes only, no nulls
    fn remote_attributes(&self) -> Attributes;
}

/// Overlay `changes` onto `base`
pub(crate) fn merge(mut base: Attributes, changes: &Attributes) -> Attributes {
    for (key, value) in changes {
        base.insert(key.clone(), value.clone());
    }
    base
}
