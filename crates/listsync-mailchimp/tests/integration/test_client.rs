//! Integration tests for MailchimpClient request handling
//!
//! Verifies authentication, path construction and the mapping of
//! problem-detail responses onto MailchimpError.

use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use listsync_mailchimp::client::MailchimpClient;
use listsync_mailchimp::MailchimpError;

use crate::common;

#[tokio::test]
async fn test_ping_returns_health_status() {
    let (_server, client) = common::setup_mailchimp_mock().await;

    let health = client.ping().await.expect("ping failed");

    assert_eq!(health, "Everything's Chimpy!");
}

#[tokio::test]
async fn test_ping_with_wrong_key_is_api_error() {
    let (server, _client) = common::setup_mailchimp_mock().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(common::problem(
            401,
            "API Key Invalid",
            "Your API key may be invalid, or you've attempted to access the wrong datacenter.",
        ))
        .mount(&server)
        .await;
    let client = MailchimpClient::with_base_url("wrong-us6", server.uri());

    let err = client.ping().await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(
        err.to_string(),
        "Your API key may be invalid, or you've attempted to access the wrong datacenter."
    );
}

#[tokio::test]
async fn test_create_posts_json_body() {
    let (server, client) = common::setup_mailchimp_mock().await;
    Mock::given(method("POST"))
        .and(path("/lists"))
        .and(basic_auth("anystring", common::API_KEY))
        .and(body_json(json!({"name": "Test"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "abc123"})))
        .expect(1)
        .mount(&server)
        .await;

    let body = client
        .create("lists", &json!({"name": "Test"}))
        .await
        .unwrap();

    assert_eq!(body["id"], json!("abc123"));
}

#[tokio::test]
async fn test_error_detail_is_passed_through() {
    let (server, client) = common::setup_mailchimp_mock().await;
    Mock::given(method("POST"))
        .and(path("/lists/abc123/members"))
        .respond_with(common::problem(
            400,
            "Member Exists",
            "x@y.com is already a list member. Use PUT to insert or update list members.",
        ))
        .mount(&server)
        .await;

    let err = client
        .create("lists/abc123/members", &json!({"email_address": "x@y.com"}))
        .await
        .unwrap_err();

    assert!(matches!(err, MailchimpError::Api { status: 400, .. }));
    assert_eq!(
        err.to_string(),
        "x@y.com is already a list member. Use PUT to insert or update list members."
    );
}

#[tokio::test]
async fn test_error_without_detail_falls_back_to_title() {
    let (server, client) = common::setup_mailchimp_mock().await;
    Mock::given(method("GET"))
        .and(path("/lists/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "title": "Resource Not Found",
            "status": 404
        })))
        .mount(&server)
        .await;

    let err = client.read("lists/missing").await.unwrap_err();

    assert_eq!(err.to_string(), "Resource Not Found");
}

#[tokio::test]
async fn test_error_without_body_uses_reason_phrase() {
    let (server, client) = common::setup_mailchimp_mock().await;
    Mock::given(method("DELETE"))
        .and(path("/lists/abc123"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.delete("lists/abc123").await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "Service Unavailable");
}

#[tokio::test]
async fn test_delete_accepts_no_content() {
    let (server, client) = common::setup_mailchimp_mock().await;
    Mock::given(method("DELETE"))
        .and(path("/lists/abc123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete("lists/abc123").await.unwrap();
}
