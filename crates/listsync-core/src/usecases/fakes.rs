//! In-memory port implementations for use-case tests

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{Attributes, ListId, ListMember, MailingList, MemberId, RemoteId, SyncEntity};
use crate::ports::{
    IEntityRepository, IRemoteApi, ListFilter, MemberFilter, RemotePath, RemoteResource,
};

/// Repository backed by two vectors
#[derive(Default)]
pub struct InMemoryRepository {
    lists: Mutex<Vec<MailingList>>,
    members: Mutex<Vec<ListMember>>,
    fail_writes: Mutex<bool>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    pub fn list_count(&self) -> usize {
        self.lists.lock().unwrap().len()
    }

    pub fn member_count(&self) -> usize {
        self.members.lock().unwrap().len()
    }

    fn check_writable(&self) -> anyhow::Result<()> {
        if *self.fail_writes.lock().unwrap() {
            anyhow::bail!("database is locked");
        }
        Ok(())
    }
}

#[async_trait]
impl IEntityRepository for InMemoryRepository {
    async fn save_list(&self, list: &MailingList) -> anyhow::Result<()> {
        self.check_writable()?;
        let mut lists = self.lists.lock().unwrap();
        match lists.iter_mut().find(|l| l.id() == list.id()) {
            Some(existing) => *existing = list.clone(),
            None => lists.push(list.clone()),
        }
        Ok(())
    }

    async fn get_list(&self, id: &ListId) -> anyhow::Result<Option<MailingList>> {
        let lists = self.lists.lock().unwrap();
        Ok(lists.iter().find(|l| l.id() == *id).cloned())
    }

    async fn delete_list(&self, id: &ListId) -> anyhow::Result<()> {
        self.check_writable()?;
        self.lists.lock().unwrap().retain(|l| l.id() != *id);
        self.members
            .lock()
            .unwrap()
            .retain(|m| m.list_id() != Some(*id));
        Ok(())
    }

    async fn query_lists(&self, filter: &ListFilter) -> anyhow::Result<Vec<MailingList>> {
        let lists = self.lists.lock().unwrap();
        Ok(lists.iter().filter(|l| filter.matches(l)).cloned().collect())
    }

    async fn save_member(&self, member: &ListMember) -> anyhow::Result<()> {
        self.check_writable()?;
        let mut members = self.members.lock().unwrap();
        match members.iter_mut().find(|m| m.id() == member.id()) {
            Some(existing) => *existing = member.clone(),
            None => members.push(member.clone()),
        }
        Ok(())
    }

    async fn get_member(&self, id: &MemberId) -> anyhow::Result<Option<ListMember>> {
        let members = self.members.lock().unwrap();
        Ok(members.iter().find(|m| m.id() == *id).cloned())
    }

    async fn delete_member(&self, id: &MemberId) -> anyhow::Result<()> {
        self.check_writable()?;
        self.members.lock().unwrap().retain(|m| m.id() != *id);
        Ok(())
    }

    async fn query_members(&self, filter: &MemberFilter) -> anyhow::Result<Vec<ListMember>> {
        let members = self.members.lock().unwrap();
        Ok(members.iter().filter(|m| filter.matches(m)).cloned().collect())
    }
}

/// One recorded remote call
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCall {
    pub method: &'static str,
    pub path: String,
    pub attributes: Option<Attributes>,
}

/// Remote API that records calls and answers with a fixed id or a fixed failure
pub struct ScriptedRemote {
    id: String,
    failure: Option<String>,
    calls: Mutex<Vec<RemoteCall>>,
}

impl ScriptedRemote {
    pub fn returning(id: &str) -> Self {
        Self {
            id: id.to_string(),
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            id: String::new(),
            failure: Some(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(
        &self,
        method: &'static str,
        path: &RemotePath,
        attributes: Option<&Attributes>,
    ) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(RemoteCall {
            method,
            path: path.to_string(),
            attributes: attributes.cloned(),
        });
        match &self.failure {
            Some(message) => Err(anyhow::anyhow!("{message}")),
            None => Ok(()),
        }
    }

    fn resource(&self, attributes: &Attributes) -> anyhow::Result<RemoteResource> {
        Ok(RemoteResource {
            id: RemoteId::new(self.id.clone())?,
            attributes: attributes.clone(),
        })
    }
}

#[async_trait]
impl IRemoteApi for ScriptedRemote {
    async fn create(
        &self,
        path: &RemotePath,
        attributes: &Attributes,
    ) -> anyhow::Result<RemoteResource> {
        self.record("POST", path, Some(attributes))?;
        self.resource(attributes)
    }

    async fn update(
        &self,
        path: &RemotePath,
        attributes: &Attributes,
    ) -> anyhow::Result<RemoteResource> {
        self.record("PATCH", path, Some(attributes))?;
        self.resource(attributes)
    }

    async fn delete(&self, path: &RemotePath) -> anyhow::Result<()> {
        self.record("DELETE", path, None)
    }

    async fn read(&self, path: &RemotePath) -> anyhow::Result<RemoteResource> {
        self.record("GET", path, None)?;
        self.resource(&Attributes::new())
    }
}

/// Attribute map from a JSON object literal
pub fn attrs(value: serde_json::Value) -> Attributes {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("test attributes must be an object"),
    }
}

/// Store a list that already has a remote id
pub async fn synced_list(repository: &InMemoryRepository, remote_id: &str) -> MailingList {
    let mut list = MailingList::new("Synced").unwrap();
    list.set_remote_id(RemoteId::new(remote_id.to_string()).unwrap());
    list.mark_synced();
    repository.save_list(&list).await.unwrap();
    assert!(list.remote_id().is_some());
    list
}
