//! Mailchimp Marketing API client
//!
//! Provides a typed HTTP client for the Mailchimp Marketing API v3.0.
//! Handles basic-auth headers, base URL construction from the API key's
//! data center, and problem-detail error bodies.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use listsync_mailchimp::client::MailchimpClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = MailchimpClient::new("0123456789abcdef-us6")?;
//! let health = client.ping().await?;
//! println!("{}", health);
//! # Ok(())
//! # }
//! ```

use listsync_core::config::MailchimpConfig;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::MailchimpError;

/// Username sent with the API key; Mailchimp ignores it
const BASIC_AUTH_USER: &str = "anystring";

// ============================================================================
// Mailchimp API response types
// ============================================================================

/// Problem document returned with every error status
///
/// See <https://mailchimp.com/developer/marketing/docs/errors/>.
#[derive(Debug, Deserialize)]
struct ProblemDetail {
    title: Option<String>,
    detail: Option<String>,
}

/// Response from the /ping endpoint
#[derive(Debug, Deserialize)]
struct PingResponse {
    health_status: String,
}

// ============================================================================
// MailchimpClient
// ============================================================================

/// HTTP client for Mailchimp Marketing API calls
///
/// Wraps `reqwest::Client` with authentication and base URL construction.
/// Paths are relative to the API root, e.g. `lists/abc123/members`.
#[derive(Clone)]
pub struct MailchimpClient {
    /// The underlying HTTP client
    client: Client,
    /// API root without trailing slash
    base_url: String,
    /// API key sent as the basic-auth password
    api_key: String,
}

impl MailchimpClient {
    /// Creates a client for the data center named in the key
    ///
    /// # Errors
    /// `MissingDataCenter` if the key has no `-<dc>` suffix.
    pub fn new(api_key: impl Into<String>) -> Result<Self, MailchimpError> {
        Self::from_config(&MailchimpConfig {
            api_key: Some(api_key.into()),
            base_url: None,
        })
    }

    /// Creates a client with a custom base URL (useful for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Creates a client from the `mailchimp` configuration section
    ///
    /// An explicit `base_url` wins over the key's data center.
    pub fn from_config(config: &MailchimpConfig) -> Result<Self, MailchimpError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(MailchimpError::MissingApiKey)?;
        let base_url = config
            .resolved_base_url()
            .ok_or(MailchimpError::MissingDataCenter)?;

        Ok(Self::with_base_url(api_key, base_url))
    }

    /// Returns the API root this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates an authenticated request builder for the given method and path
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - API path relative to the API root (e.g., "lists" or "/ping")
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        self.client
            .request(method, &url)
            .basic_auth(BASIC_AUTH_USER, Some(&self.api_key))
    }

    /// `POST {path}` with a JSON body, returning the created resource
    pub async fn create(&self, path: &str, body: &Value) -> Result<Value, MailchimpError> {
        debug!(path, "POST");
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        Self::json_body(response).await
    }

    /// `PATCH {path}` with a JSON body, returning the updated resource
    pub async fn update(&self, path: &str, body: &Value) -> Result<Value, MailchimpError> {
        debug!(path, "PATCH");
        let response = self
            .send(self.request(Method::PATCH, path).json(body))
            .await?;
        Self::json_body(response).await
    }

    /// `DELETE {path}`
    pub async fn delete(&self, path: &str) -> Result<(), MailchimpError> {
        debug!(path, "DELETE");
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// `GET {path}`
    pub async fn read(&self, path: &str) -> Result<Value, MailchimpError> {
        debug!(path, "GET");
        let response = self.send(self.request(Method::GET, path)).await?;
        Self::json_body(response).await
    }

    /// Checks credentials and reachability, returning the health status
    pub async fn ping(&self) -> Result<String, MailchimpError> {
        debug!("Pinging Mailchimp API");
        let response = self.send(self.request(Method::GET, "ping")).await?;
        let ping: PingResponse = response
            .json()
            .await
            .map_err(|e| MailchimpError::InvalidResponse(format!("ping: {}", e)))?;
        Ok(ping.health_status)
    }

    /// Sends a request, turning error statuses into [`MailchimpError::Api`]
    async fn send(&self, builder: RequestBuilder) -> Result<Response, MailchimpError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ProblemDetail>(&text)
            .ok()
            .and_then(|p| {
                p.detail
                    .filter(|d| !d.is_empty())
                    .or(p.title.filter(|t| !t.is_empty()))
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        debug!(status = status.as_u16(), %message, "Mailchimp API error");
        Err(MailchimpError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn json_body(response: Response) -> Result<Value, MailchimpError> {
        response
            .json()
            .await
            .map_err(|e| MailchimpError::InvalidResponse(e.to_string()))
    }
}
