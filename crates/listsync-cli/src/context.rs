//! Wiring of configuration, local store and remote client for commands

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use listsync_cache::{DatabasePool, SqliteEntityRepository};
use listsync_core::config::Config;
use listsync_core::domain::Attributes;
use listsync_core::ports::{IEntityRepository, IRemoteApi, RemotePath, RemoteResource};
use listsync_core::usecases::{ListSyncUseCase, MemberSyncUseCase};
use listsync_mailchimp::{MailchimpClient, MailchimpRemoteApi};
use tracing::warn;

/// Loaded configuration plus the path it came from
pub struct AppContext {
    pub config: Config,
    pub config_path: PathBuf,
}

impl AppContext {
    /// Loads the configuration at `path`, or the default location
    pub fn load(path: Option<PathBuf>) -> Self {
        let config_path = path.unwrap_or_else(Config::default_path);
        let config = Config::load_or_default(&config_path);
        Self {
            config,
            config_path,
        }
    }

    /// Opens the local store, creating it on first use
    pub async fn repository(&self) -> Result<Arc<dyn IEntityRepository + Send + Sync>> {
        let db_path = &self.config.database.path;
        let pool = DatabasePool::from_config(&self.config.database)
            .await
            .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
        Ok(Arc::new(SqliteEntityRepository::new(pool.pool().clone())))
    }

    /// Builds a Mailchimp client from the `mailchimp` section
    pub fn mailchimp_client(&self) -> Result<MailchimpClient> {
        MailchimpClient::from_config(&self.config.mailchimp)
            .context("Mailchimp is not configured; set mailchimp.api_key")
    }

    /// The remote API, or a stand-in that fails every call when Mailchimp
    /// is not configured so local reads keep working
    pub fn remote(&self) -> Arc<dyn IRemoteApi + Send + Sync> {
        match MailchimpClient::from_config(&self.config.mailchimp) {
            Ok(client) => Arc::new(MailchimpRemoteApi::new(client)),
            Err(e) => {
                warn!(error = %e, "Mailchimp client unavailable");
                Arc::new(UnconfiguredRemote(e.to_string()))
            }
        }
    }

    pub async fn list_use_case(&self) -> Result<ListSyncUseCase> {
        Ok(ListSyncUseCase::new(self.repository().await?, self.remote()))
    }

    pub async fn member_use_case(&self) -> Result<MemberSyncUseCase> {
        Ok(MemberSyncUseCase::new(self.repository().await?, self.remote()))
    }
}

/// Remote API used when no client can be built
struct UnconfiguredRemote(String);

#[async_trait::async_trait]
impl IRemoteApi for UnconfiguredRemote {
    async fn create(&self, _path: &RemotePath, _attributes: &Attributes) -> Result<RemoteResource> {
        anyhow::bail!("{}", self.0)
    }

    async fn update(&self, _path: &RemotePath, _attributes: &Attributes) -> Result<RemoteResource> {
        anyhow::bail!("{}", self.0)
    }

    async fn delete(&self, _path: &RemotePath) -> Result<()> {
        anyhow::bail!("{}", self.0)
    }

    async fn read(&self, _path: &RemotePath) -> Result<RemoteResource> {
        anyhow::bail!("{}", self.0)
    }
}
