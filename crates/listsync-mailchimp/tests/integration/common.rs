//! Shared test helpers for Mailchimp API integration tests
//!
//! Provides wiremock-based mock server setup for Mailchimp endpoints.
//! Each helper mounts the necessary mock endpoints and returns a configured
//! MailchimpClient pointing at the mock server.

use serde_json::{json, Value};
use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use listsync_core::domain::Attributes;
use listsync_mailchimp::client::MailchimpClient;

pub const API_KEY: &str = "0123456789abcdef0123456789abcdef-us6";
pub const LIST_REMOTE_ID: &str = "272ed4eff3";

/// Sets up a mock server answering `GET /ping` for the test key and
/// returns a (MockServer, MailchimpClient) tuple.
pub async fn setup_mailchimp_mock() -> (MockServer, MailchimpClient) {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .and(basic_auth("anystring", API_KEY))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"health_status": "Everything's Chimpy!"})),
        )
        .mount(&server)
        .await;

    let client = MailchimpClient::with_base_url(API_KEY, server.uri());

    (server, client)
}

/// A Mailchimp problem-detail error response
pub fn problem(status: u16, title: &str, detail: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "type": "https://mailchimp.com/developer/marketing/docs/errors/",
        "title": title,
        "status": status,
        "detail": detail,
        "instance": "995c5cb0-3280-4a6e-808b-3b096d0bb219"
    }))
}

/// Mounts `POST /lists` answering with a created list
pub async fn mount_create_list(server: &MockServer, remote_id: &str) {
    Mock::given(method("POST"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": remote_id,
            "web_id": 12345,
            "name": "Test",
            "stats": {"member_count": 0}
        })))
        .mount(server)
        .await;
}

/// Mounts `POST /lists/{list}/members` answering with a created member
pub async fn mount_create_member(server: &MockServer, list: &str, unique_email_id: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/lists/{}/members", list)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "767934a648524da57388558217ad9c2d",
            "email_address": "x@y.com",
            "unique_email_id": unique_email_id,
            "status": "subscribed",
            "list_id": list
        })))
        .mount(server)
        .await;
}

pub fn attrs(value: Value) -> Attributes {
    value.as_object().cloned().expect("object literal")
}
