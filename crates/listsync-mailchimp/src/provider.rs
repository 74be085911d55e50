//! MailchimpRemoteApi - IRemoteApi implementation for the Mailchimp Marketing API
//!
//! Wraps the [`MailchimpClient`] to fulfil the [`IRemoteApi`] port contract.
//!
//! ## Design Notes
//!
//! - Member resources are identified by `unique_email_id`; older payloads
//!   without it fall back to `id` (the subscriber hash).
//! - Errors are returned as [`MailchimpError`] inside `anyhow::Error`, so
//!   their `Display` is the upstream problem detail.

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use listsync_core::domain::{Attributes, RemoteId};
use listsync_core::ports::{IRemoteApi, RemotePath, RemoteResource};

use crate::client::MailchimpClient;
use crate::MailchimpError;

/// Remote API implementation that delegates to the Mailchimp Marketing API
pub struct MailchimpRemoteApi {
    client: MailchimpClient,
}

impl MailchimpRemoteApi {
    /// Creates a new remote API adapter around a client
    pub fn new(client: MailchimpClient) -> Self {
        Self { client }
    }
}

/// Converts a response body into a [`RemoteResource`]
fn to_resource(path: &RemotePath, body: Value) -> Result<RemoteResource, MailchimpError> {
    let Value::Object(attributes) = body else {
        return Err(MailchimpError::InvalidResponse(format!(
            "expected a JSON object from {}",
            path
        )));
    };

    let id = resource_id(path, &attributes).ok_or_else(|| {
        MailchimpError::InvalidResponse(format!("no resource id in response from {}", path))
    })?;
    let id = RemoteId::new(id.to_string())
        .map_err(|e| MailchimpError::InvalidResponse(format!("{} (from {})", e, path)))?;

    Ok(RemoteResource { id, attributes })
}

fn resource_id<'a>(path: &RemotePath, attributes: &'a Attributes) -> Option<&'a str> {
    let id = || attributes.get("id").and_then(Value::as_str);
    match path {
        RemotePath::Members(_) | RemotePath::Member { .. } => attributes
            .get("unique_email_id")
            .and_then(Value::as_str)
            .or_else(id),
        RemotePath::Lists | RemotePath::List(_) => id(),
    }
}

#[async_trait::async_trait]
impl IRemoteApi for MailchimpRemoteApi {
    async fn create(&self, path: &RemotePath, attributes: &Attributes) -> Result<RemoteResource> {
        debug!(%path, "MailchimpRemoteApi::create");
        let body = self
            .client
            .create(&path.to_string(), &Value::Object(attributes.clone()))
            .await?;
        let resource = to_resource(path, body)?;
        debug!(%path, id = %resource.id, "Remote resource created");
        Ok(resource)
    }

    async fn update(&self, path: &RemotePath, attributes: &Attributes) -> Result<RemoteResource> {
        debug!(%path, "MailchimpRemoteApi::update");
        let body = self
            .client
            .update(&path.to_string(), &Value::Object(attributes.clone()))
            .await?;
        Ok(to_resource(path, body)?)
    }

    async fn delete(&self, path: &RemotePath) -> Result<()> {
        debug!(%path, "MailchimpRemoteApi::delete");
        self.client.delete(&path.to_string()).await?;
        Ok(())
    }

    async fn read(&self, path: &RemotePath) -> Result<RemoteResource> {
        debug!(%path, "MailchimpRemoteApi::read");
        let body = self.client.read(&path.to_string()).await?;
        Ok(to_resource(path, body)?)
    }
}
