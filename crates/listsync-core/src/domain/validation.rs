//! Declarative attribute validation
//!
//! Every entity type declares a static table of [`FieldRule`]s. Rules are
//! evaluated against a flat JSON attribute map; nested object members are
//! addressed with dotted paths (`contact.company`) and are only checked when
//! the parent object is present. Evaluation collects every violation instead
//! of stopping at the first one.
//!
//! A `null` value, and a string that is empty or whitespace only, count as
//! absent. Keys without a rule are ignored.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::newtypes::Email;

/// Flat attribute map, keyed by lower-snake field names
pub type Attributes = Map<String, Value>;

/// Whether a field must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absent values are a violation
    Required,
    /// Absent values are accepted; present values must match the kind
    Nullable,
}

/// Expected shape of a present value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any JSON string
    String,
    /// A JSON boolean (no `"true"`/`1` coercion)
    Boolean,
    /// A string accepted by [`Email`]
    Email,
    /// A string that parses as a UUID
    Uuid,
    /// A JSON object
    Object,
    /// A string from a closed set
    OneOf(&'static [&'static str]),
}

/// One row of a rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Field name, dotted for nested members
    pub field: &'static str,
    /// Presence requirement
    pub presence: Presence,
    /// Value shape
    pub kind: FieldKind,
}

impl FieldRule {
    /// A rule for a field that must be present
    #[must_use]
    pub const fn required(field: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            presence: Presence::Required,
            kind,
        }
    }

    /// A rule for a field that may be absent
    #[must_use]
    pub const fn nullable(field: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            presence: Presence::Nullable,
            kind,
        }
    }

    /// Check a single (possibly absent) value against this rule
    fn check(&self, value: Option<&Value>) -> Option<String> {
        let label = self.field.replace('_', " ");

        let Some(value) = value.filter(|v| !is_blank(v)) else {
            return match self.presence {
                Presence::Required => Some(format!("The {label} field is required.")),
                Presence::Nullable => None,
            };
        };

        let ok = match self.kind {
            FieldKind::String => value.is_string(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Object => value.is_object(),
            FieldKind::Email => value.as_str().is_some_and(Email::is_valid),
            FieldKind::Uuid => value.as_str().is_some_and(|s| Uuid::parse_str(s).is_ok()),
            FieldKind::OneOf(allowed) => value.as_str().is_some_and(|s| allowed.contains(&s)),
        };

        if ok {
            return None;
        }

        Some(match self.kind {
            FieldKind::String => format!("The {label} must be a string."),
            FieldKind::Boolean => format!("The {label} field must be true or false."),
            FieldKind::Object => format!("The {label} must be an object."),
            FieldKind::Email => format!("The {label} must be a valid email address."),
            FieldKind::Uuid => format!("The {label} must be a valid UUID."),
            FieldKind::OneOf(_) => format!("The selected {label} is invalid."),
        })
    }
}

/// Field name → messages for every violated rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Create an empty error set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for `field`
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Error set holding a single violation
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one violation
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether `field` has a violation
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for `field`
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Violated field names, sorted
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when empty, otherwise `Err(self)`
    ///
    /// # Errors
    /// Returns `self` if any violation was recorded
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().flatten().map(String::as_str).collect();
        write!(f, "{}", messages.join(" "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Evaluate `rules` against `attributes`, collecting every violation
///
/// # Errors
/// Returns the full set of violations if any rule fails
pub fn validate(rules: &[FieldRule], attributes: &Attributes) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for rule in rules {
        let value = match rule.field.split_once('.') {
            None => attributes.get(rule.field),
            Some((parent, child)) => match attributes.get(parent) {
                Some(Value::Object(object)) => object.get(child),
                // Parent absent or not an object: its own rule reports it
                _ => continue,
            },
        };

        if let Some(message) = rule.check(value) {
            errors.add(rule.field, message);
        }
    }

    errors.into_result()
}

/// A value that counts as absent: `null` or a blank string
#[must_use]
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Non-blank string at `key`
pub(crate) fn string_at(attributes: &Attributes, key: &str) -> Option<String> {
    attributes
        .get(key)
        .filter(|v| !is_blank(v))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Boolean at `key`
pub(crate) fn bool_at(attributes: &Attributes, key: &str) -> Option<bool> {
    attributes.get(key).and_then(Value::as_bool)
}

/// Object at `key`
pub(crate) fn object_at<'a>(attributes: &'a Attributes, key: &str) -> Option<&'a Attributes> {
    attributes.get(key).and_then(Value::as_object)
}

/// Copy of `value` with `null` members removed, recursively through objects
#[must_use]
pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RULES: &[FieldRule] = &[
        FieldRule::required("name", FieldKind::String),
        FieldRule::nullable("flag", FieldKind::Boolean),
        FieldRule::required("email_address", FieldKind::Email),
        FieldRule::nullable("kind", FieldKind::OneOf(&["pub", "prv"])),
        FieldRule::nullable("owner", FieldKind::Uuid),
        FieldRule::nullable("contact", FieldKind::Object),
        FieldRule::required("contact.company", FieldKind::String),
        FieldRule::nullable("contact.phone", FieldKind::String),
    ];

    fn attrs(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => panic!("test attributes must be an object"),
        }
    }

    #[test]
    fn test_valid_minimal() {
        let result = validate(RULES, &attrs(json!({"name": "n", "email_address": "a@b.com"})));
        assert!(result.is_ok());
    }

    #[test]
    fn test_collects_all_violations() {
        let errors = validate(RULES, &attrs(json!({"flag": "yes", "kind": "public"}))).unwrap_err();

        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["email_address", "flag", "kind", "name"]);
        assert_eq!(
            errors.get("email_address").unwrap(),
            ["The email address field is required."]
        );
        assert_eq!(
            errors.get("flag").unwrap(),
            ["The flag field must be true or false."]
        );
        assert_eq!(errors.get("kind").unwrap(), ["The selected kind is invalid."]);
    }

    #[test]
    fn test_null_and_blank_count_as_absent() {
        let errors = validate(
            RULES,
            &attrs(json!({"name": "   ", "email_address": null, "flag": null})),
        )
        .unwrap_err();

        assert_eq!(errors.len(), 2);
        assert!(errors.contains("name"));
        assert!(errors.contains("email_address"));
    }

    #[test]
    fn test_invalid_email_and_uuid() {
        let errors = validate(
            RULES,
            &attrs(json!({"name": "n", "email_address": "nope", "owner": "123"})),
        )
        .unwrap_err();

        assert_eq!(
            errors.get("email_address").unwrap(),
            ["The email address must be a valid email address."]
        );
        assert_eq!(errors.get("owner").unwrap(), ["The owner must be a valid UUID."]);
    }

    #[test]
    fn test_nested_rules_only_apply_with_parent() {
        let base = json!({"name": "n", "email_address": "a@b.com"});
        assert!(validate(RULES, &attrs(base.clone())).is_ok());

        let mut with_contact = attrs(base);
        with_contact.insert("contact".into(), json!({"phone": 5}));
        let errors = validate(RULES, &with_contact).unwrap_err();

        assert_eq!(
            errors.get("contact.company").unwrap(),
            ["The contact.company field is required."]
        );
        assert_eq!(
            errors.get("contact.phone").unwrap(),
            ["The contact.phone must be a string."]
        );
    }

    #[test]
    fn test_non_object_parent_reports_only_parent() {
        let errors = validate(
            RULES,
            &attrs(json!({"name": "n", "email_address": "a@b.com", "contact": "acme"})),
        )
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(errors.contains("contact"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let result = validate(
            RULES,
            &attrs(json!({"name": "n", "email_address": "a@b.com", "extra": [1, 2]})),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_errors_serialize_as_field_map() {
        let errors = ValidationErrors::single("name", "The name field is required.");
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"name": ["The name field is required."]})
        );
        assert_eq!(errors.to_string(), "The name field is required.");
    }

    #[test]
    fn test_strip_nulls() {
        let stripped = strip_nulls(json!({"a": null, "b": {"c": null, "d": 1}, "e": "x"}));
        assert_eq!(stripped, json!({"b": {"d": 1}, "e": "x"}));
    }
}
