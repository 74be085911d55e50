//! Integration tests for MailchimpRemoteApi
//!
//! Verifies that RemotePath values reach the right endpoints and that
//! response bodies become RemoteResource values.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use listsync_core::domain::{Email, RemoteId, SubscriberHash};
use listsync_core::ports::{IRemoteApi, RemotePath};
use listsync_mailchimp::MailchimpRemoteApi;

use crate::common::{self, attrs, LIST_REMOTE_ID};

fn list_remote() -> RemoteId {
    RemoteId::new(LIST_REMOTE_ID.to_string()).unwrap()
}

#[tokio::test]
async fn test_create_list() {
    let (server, client) = common::setup_mailchimp_mock().await;
    common::mount_create_list(&server, "abc123").await;
    let api = MailchimpRemoteApi::new(client);

    let resource = api
        .create(&RemotePath::Lists, &attrs(json!({"name": "Test"})))
        .await
        .unwrap();

    assert_eq!(resource.id.as_str(), "abc123");
    assert_eq!(resource.attributes["web_id"], json!(12345));
}

#[tokio::test]
async fn test_create_member_uses_unique_email_id() {
    let (server, client) = common::setup_mailchimp_mock().await;
    common::mount_create_member(&server, LIST_REMOTE_ID, "882e9bec19").await;
    let api = MailchimpRemoteApi::new(client);

    let resource = api
        .create(
            &RemotePath::Members(list_remote()),
            &attrs(json!({"email_address": "x@y.com", "status": "subscribed"})),
        )
        .await
        .unwrap();

    assert_eq!(resource.id.as_str(), "882e9bec19");
}

#[tokio::test]
async fn test_update_member_patches_hash_path() {
    let (server, client) = common::setup_mailchimp_mock().await;
    let hash = SubscriberHash::of(&Email::new("x@y.com".to_string()).unwrap());
    Mock::given(method("PATCH"))
        .and(path(format!(
            "/lists/{}/members/767934a648524da57388558217ad9c2d",
            LIST_REMOTE_ID
        )))
        .and(body_json(json!({"status": "unsubscribed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "767934a648524da57388558217ad9c2d",
            "unique_email_id": "882e9bec19",
            "status": "unsubscribed"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let api = MailchimpRemoteApi::new(client);

    let resource = api
        .update(
            &RemotePath::Member {
                list: list_remote(),
                member: hash,
            },
            &attrs(json!({"status": "unsubscribed"})),
        )
        .await
        .unwrap();

    assert_eq!(resource.attributes["status"], json!("unsubscribed"));
}

#[tokio::test]
async fn test_read_list() {
    let (server, client) = common::setup_mailchimp_mock().await;
    Mock::given(method("GET"))
        .and(path(format!("/lists/{}", LIST_REMOTE_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": LIST_REMOTE_ID,
            "name": "Freddie's Favorite Hats"
        })))
        .mount(&server)
        .await;
    let api = MailchimpRemoteApi::new(client);

    let resource = api.read(&RemotePath::List(list_remote())).await.unwrap();

    assert_eq!(resource.id, list_remote());
    assert_eq!(resource.attributes["name"], json!("Freddie's Favorite Hats"));
}

#[tokio::test]
async fn test_delete_list() {
    let (server, client) = common::setup_mailchimp_mock().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/lists/{}", LIST_REMOTE_ID)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let api = MailchimpRemoteApi::new(client);

    api.delete(&RemotePath::List(list_remote())).await.unwrap();
}

#[tokio::test]
async fn test_error_message_survives_anyhow() {
    let (server, client) = common::setup_mailchimp_mock().await;
    Mock::given(method("POST"))
        .and(path("/lists"))
        .respond_with(common::problem(
            400,
            "Invalid Resource",
            "The resource submitted could not be validated.",
        ))
        .mount(&server)
        .await;
    let api = MailchimpRemoteApi::new(client);

    let err = api
        .create(&RemotePath::Lists, &attrs(json!({"name": "Test"})))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "The resource submitted could not be validated."
    );
}
