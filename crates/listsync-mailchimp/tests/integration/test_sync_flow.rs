//! End-to-end sync flows: use cases over the SQLite store and a mocked
//! Mailchimp API.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use listsync_cache::{DatabasePool, SqliteEntityRepository};
use listsync_core::domain::{MemberStatus, RemoteId, SubscriberHash, SyncEntity};
use listsync_core::ports::{IEntityRepository, IRemoteApi, MemberFilter};
use listsync_core::usecases::{ListSyncUseCase, MemberSyncUseCase, SyncError};
use listsync_mailchimp::MailchimpRemoteApi;

use crate::common::{self, attrs};

struct Harness {
    server: MockServer,
    repository: Arc<SqliteEntityRepository>,
    lists: ListSyncUseCase,
    members: MemberSyncUseCase,
}

async fn harness() -> Harness {
    let (server, client) = common::setup_mailchimp_mock().await;
    let pool = DatabasePool::in_memory().await.unwrap();
    let repository = Arc::new(SqliteEntityRepository::new(pool.pool().clone()));
    let remote: Arc<dyn IRemoteApi + Send + Sync> = Arc::new(MailchimpRemoteApi::new(client));

    Harness {
        lists: ListSyncUseCase::new(repository.clone(), remote.clone()),
        members: MemberSyncUseCase::new(repository.clone(), remote),
        repository,
        server,
    }
}

#[tokio::test]
async fn test_list_and_member_lifecycle() {
    let h = harness().await;
    common::mount_create_list(&h.server, "abc123").await;
    common::mount_create_member(&h.server, "abc123", "882e9bec19").await;

    let list = h.lists.create(&attrs(json!({"name": "Test"}))).await.unwrap();
    assert_eq!(list.remote_id().map(RemoteId::as_str), Some("abc123"));

    let member = h
        .members
        .create(&attrs(json!({
            "list_id": list.id().to_string(),
            "email_address": "x@y.com",
            "status": "subscribed"
        })))
        .await
        .unwrap();
    assert_eq!(member.remote_id().map(RemoteId::as_str), Some("882e9bec19"));
    assert_eq!(
        member.subscriber_hash().map(SubscriberHash::as_str),
        Some("767934a648524da57388558217ad9c2d")
    );

    Mock::given(method("PATCH"))
        .and(path("/lists/abc123/members/767934a648524da57388558217ad9c2d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "767934a648524da57388558217ad9c2d",
            "unique_email_id": "882e9bec19",
            "status": "unsubscribed"
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let updated = h
        .members
        .update(&member.id(), &attrs(json!({"status": "unsubscribed"})))
        .await
        .unwrap();
    assert_eq!(updated.status(), MemberStatus::Unsubscribed);

    Mock::given(method("DELETE"))
        .and(path("/lists/abc123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;

    h.lists.delete(&list.id()).await.unwrap();

    let remaining = h
        .repository
        .query_members(&MemberFilter::new())
        .await
        .unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn test_failed_create_is_kept_locally_and_resyncs() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/lists"))
        .respond_with(common::problem(
            400,
            "Invalid Resource",
            "The resource submitted could not be validated.",
        ))
        .up_to_n_times(1)
        .mount(&h.server)
        .await;
    common::mount_create_list(&h.server, "abc123").await;

    let err = h
        .lists
        .create(&attrs(json!({"name": "Test"})))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SyncError::RemoteSync(ref msg) if msg == "The resource submitted could not be validated."
    ));

    let stored = h
        .lists
        .list(&Default::default())
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].remote_id().is_none());

    let resynced = h.lists.resync(&stored[0].id()).await.unwrap();
    assert_eq!(resynced.remote_id().map(RemoteId::as_str), Some("abc123"));
    assert!(h.lists.read(&stored[0].id()).await.unwrap().is_synced());
}

#[tokio::test]
async fn test_member_without_list_never_calls_remote() {
    let h = harness().await;

    let member = h
        .members
        .create(&attrs(json!({"email_address": "x@y.com", "status": "subscribed"})))
        .await
        .unwrap();

    assert!(member.remote_id().is_none());
    assert!(member.subscriber_hash().is_none());

    let requests = h.server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}
