//! Request-boundary responses
//!
//! Maps use-case outcomes onto an HTTP-style status code and JSON body, so
//! every front end (CLI, a future HTTP server) reports results the same way.

use serde::Serialize;
use serde_json::{json, Value};

use super::error::SyncError;
use crate::domain::Attributes;

/// Status code and JSON body of a handled request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub const CREATED: u16 = 201;
    pub const OK: u16 = 200;
    pub const NO_CONTENT: u16 = 204;
    pub const BAD_REQUEST: u16 = 400;
    pub const NOT_FOUND: u16 = 404;
    pub const SERVER_ERROR: u16 = 500;

    /// 201 with the new entity's snapshot
    #[must_use]
    pub fn created(snapshot: Attributes) -> Self {
        Self {
            status: Self::CREATED,
            body: Value::Object(snapshot),
        }
    }

    /// 200 with a snapshot or a list of snapshots
    #[must_use]
    pub fn ok(body: impl Into<Value>) -> Self {
        Self {
            status: Self::OK,
            body: body.into(),
        }
    }

    /// 200 with the snapshots of several entities
    #[must_use]
    pub fn ok_many(snapshots: impl IntoIterator<Item = Attributes>) -> Self {
        Self::ok(Value::Array(
            snapshots.into_iter().map(Value::Object).collect(),
        ))
    }

    /// 204 with no body
    #[must_use]
    pub fn no_content() -> Self {
        Self {
            status: Self::NO_CONTENT,
            body: Value::Null,
        }
    }

    /// Error response for a failed operation
    #[must_use]
    pub fn from_error(err: &SyncError) -> Self {
        match err {
            SyncError::Validation(errors) => Self {
                status: Self::BAD_REQUEST,
                body: json!({
                    "message": "Invalid data given",
                    "errors": errors,
                }),
            },
            SyncError::NotFound { .. } => Self {
                status: Self::NOT_FOUND,
                body: json!({ "message": err.to_string() }),
            },
            SyncError::RemoteSync(message) => Self {
                status: Self::BAD_REQUEST,
                body: json!({ "message": message }),
            },
            SyncError::Persistence(_) => Self {
                status: Self::SERVER_ERROR,
                body: json!({ "message": err.to_string() }),
            },
        }
    }

    /// Whether the status is 2xx
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `message` member of an error body
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}
