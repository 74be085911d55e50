//! SQLite implementation of IEntityRepository
//!
//! This module provides the concrete SQLite-based implementation of the
//! entity repository port defined in listsync-core. It handles domain type
//! serialization/deserialization and SQL query construction.
//!
//! ## Type Mapping
//!
//! | Domain Type                 | SQL Type | Strategy                    |
//! |-----------------------------|----------|-----------------------------|
//! | ListId, MemberId            | TEXT     | UUID string via `.to_string()` |
//! | RemoteId, SubscriberHash    | TEXT     | String via `.as_str()`      |
//! | Email                       | TEXT     | String via `.as_str()`, casing preserved |
//! | Visibility, MemberStatus    | TEXT     | `as_str()` wire name        |
//! | bool                        | INTEGER  | 0 / 1                       |
//! | DateTime<Utc>               | TEXT     | ISO 8601 via `to_rfc3339()` |
//! | Contact, CampaignDefaults   | TEXT     | serde_json serialization    |
//!
//! Saves are upserts that keep the row in place. Replacing a list row would
//! fire the `ON DELETE CASCADE` on its members.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use listsync_core::domain::{ListId, ListMember, MailingList, MemberId, SyncEntity};
use listsync_core::ports::{IEntityRepository, ListFilter, MemberFilter};

use crate::CacheError;

/// SQLite-based implementation of the entity repository port
///
/// Stores mailing lists and list members. Deleting a list removes its
/// members through the foreign key cascade.
pub struct SqliteEntityRepository {
    pool: SqlitePool,
}

impl SqliteEntityRepository {
    /// Creates a new repository instance with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Helper functions for type conversion
// ============================================================================

/// Parse a DateTime<Utc> from an ISO 8601 string
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, CacheError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // SQLite's own datetime() format
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .map_err(|e| {
            CacheError::SerializationError(format!("Failed to parse datetime '{}': {}", s, e))
        })
}

/// Convert an optional timestamp column into its serde representation
fn datetime_value(s: Option<String>) -> Result<Value, CacheError> {
    match s {
        Some(ref val) if !val.is_empty() => Ok(Value::String(parse_datetime(val)?.to_rfc3339())),
        _ => Ok(Value::Null),
    }
}

/// Convert an optional JSON text column into a serde value
fn json_value(column: &str, s: Option<String>) -> Result<Value, CacheError> {
    match s {
        Some(ref text) if !text.is_empty() => serde_json::from_str(text).map_err(|e| {
            CacheError::SerializationError(format!("Invalid {} JSON: {}", column, e))
        }),
        _ => Ok(Value::Null),
    }
}

/// Serialize an optional value into a JSON text column
fn json_text<T: serde::Serialize>(value: Option<&T>) -> anyhow::Result<Option<String>> {
    value
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| anyhow::anyhow!("Failed to serialize column: {}", e))
}

// ============================================================================
// Row mapping functions
// ============================================================================

/// Reconstruct a MailingList from a database row
///
/// Uses serde JSON deserialization since the struct has private fields
/// that can only be set through constructors or deserialization.
fn list_from_row(row: &SqliteRow) -> Result<MailingList, CacheError> {
    let id: String = row.get("id");
    let mail_chimp_id: Option<String> = row.get("mail_chimp_id");
    let name: String = row.get("name");
    let permission_reminder: Option<String> = row.get("permission_reminder");
    let email_type_option: Option<bool> = row.get("email_type_option");
    let contact: Option<String> = row.get("contact");
    let campaign_defaults: Option<String> = row.get("campaign_defaults");
    let visibility: Option<String> = row.get("visibility");
    let use_archive_bar: Option<bool> = row.get("use_archive_bar");
    let notify_on_subscribe: Option<String> = row.get("notify_on_subscribe");
    let notify_on_unsubscribe: Option<String> = row.get("notify_on_unsubscribe");
    let synced_at: Option<String> = row.get("synced_at");

    let list_json = serde_json::json!({
        "id": id,
        "remote_id": mail_chimp_id,
        "name": name,
        "permission_reminder": permission_reminder,
        "email_type_option": email_type_option,
        "contact": json_value("contact", contact)?,
        "campaign_defaults": json_value("campaign_defaults", campaign_defaults)?,
        "visibility": visibility,
        "use_archive_bar": use_archive_bar,
        "notify_on_subscribe": notify_on_subscribe,
        "notify_on_unsubscribe": notify_on_unsubscribe,
        "synced_at": datetime_value(synced_at)?,
    });

    serde_json::from_value(list_json).map_err(|e| {
        CacheError::SerializationError(format!(
            "Failed to reconstruct MailingList {} from row: {}",
            id, e
        ))
    })
}

/// Reconstruct a ListMember from a database row
fn member_from_row(row: &SqliteRow) -> Result<ListMember, CacheError> {
    let id: String = row.get("id");
    let list_id: Option<String> = row.get("list_id");
    let mail_chimp_id: Option<String> = row.get("mail_chimp_id");
    let email_address: String = row.get("email_address");
    let status: String = row.get("status");
    let subscriber_hash: Option<String> = row.get("subscriber_hash");
    let synced_at: Option<String> = row.get("synced_at");

    let member_json = serde_json::json!({
        "id": id,
        "list_id": list_id,
        "remote_id": mail_chimp_id,
        "email_address": email_address,
        "status": status,
        "subscriber_hash": subscriber_hash,
        "synced_at": datetime_value(synced_at)?,
    });

    serde_json::from_value(member_json).map_err(|e| {
        CacheError::SerializationError(format!(
            "Failed to reconstruct ListMember {} from row: {}",
            id, e
        ))
    })
}

// ============================================================================
// IEntityRepository implementation
// ============================================================================

#[async_trait::async_trait]
impl IEntityRepository for SqliteEntityRepository {
    // --- MailingList operations ---

    async fn save_list(&self, list: &MailingList) -> anyhow::Result<()> {
        let id = list.id().to_string();
        let mail_chimp_id = list.remote_id().map(|r| r.as_str().to_string());
        let contact = json_text(list.contact())?;
        let campaign_defaults = json_text(list.campaign_defaults())?;
        let visibility = list.visibility().map(|v| v.as_str());
        let notify_on_subscribe = list.notify_on_subscribe().map(|e| e.as_str().to_string());
        let notify_on_unsubscribe = list.notify_on_unsubscribe().map(|e| e.as_str().to_string());
        let synced_at = list.synced_at().map(|dt| dt.to_rfc3339());
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO mailing_lists \
             (id, mail_chimp_id, name, permission_reminder, email_type_option, \
              contact, campaign_defaults, visibility, use_archive_bar, \
              notify_on_subscribe, notify_on_unsubscribe, synced_at, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET \
              mail_chimp_id = excluded.mail_chimp_id, \
              name = excluded.name, \
              permission_reminder = excluded.permission_reminder, \
              email_type_option = excluded.email_type_option, \
              contact = excluded.contact, \
              campaign_defaults = excluded.campaign_defaults, \
              visibility = excluded.visibility, \
              use_archive_bar = excluded.use_archive_bar, \
              notify_on_subscribe = excluded.notify_on_subscribe, \
              notify_on_unsubscribe = excluded.notify_on_unsubscribe, \
              synced_at = excluded.synced_at, \
              updated_at = excluded.updated_at",
        )
        .bind(&id)
        .bind(&mail_chimp_id)
        .bind(list.name())
        .bind(list.permission_reminder())
        .bind(list.email_type_option())
        .bind(&contact)
        .bind(&campaign_defaults)
        .bind(visibility)
        .bind(list.use_archive_bar())
        .bind(&notify_on_subscribe)
        .bind(&notify_on_unsubscribe)
        .bind(&synced_at)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::trace!(list_id = %id, "Saved mailing list");
        Ok(())
    }

    async fn get_list(&self, id: &ListId) -> anyhow::Result<Option<MailingList>> {
        let id_str = id.to_string();

        let row = sqlx::query("SELECT * FROM mailing_lists WHERE id = ?")
            .bind(&id_str)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(list_from_row(r)?)),
            None => Ok(None),
        }
    }

    async fn delete_list(&self, id: &ListId) -> anyhow::Result<()> {
        let id_str = id.to_string();

        let result = sqlx::query("DELETE FROM mailing_lists WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await?;

        tracing::trace!(
            list_id = %id_str,
            rows = result.rows_affected(),
            "Deleted mailing list"
        );
        Ok(())
    }

    async fn query_lists(&self, filter: &ListFilter) -> anyhow::Result<Vec<MailingList>> {
        let mut sql = String::from("SELECT * FROM mailing_lists WHERE 1=1");
        let mut binds: Vec<String> = Vec::new();

        match filter.synced {
            Some(true) => sql.push_str(" AND mail_chimp_id IS NOT NULL"),
            Some(false) => sql.push_str(" AND mail_chimp_id IS NULL"),
            None => {}
        }

        if let Some(ref name) = filter.name {
            sql.push_str(" AND name = ?");
            binds.push(name.clone());
        }

        sql.push_str(" ORDER BY created_at ASC, rowid ASC");

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }

        let rows = query.fetch_all(&self.pool).await?;
        let mut lists = Vec::with_capacity(rows.len());
        for row in &rows {
            lists.push(list_from_row(row)?);
        }

        Ok(lists)
    }

    // --- ListMember operations ---

    async fn save_member(&self, member: &ListMember) -> anyhow::Result<()> {
        let id = member.id().to_string();
        let list_id = member.list_id().map(|l| l.to_string());
        let mail_chimp_id = member.remote_id().map(|r| r.as_str().to_string());
        let subscriber_hash = member.subscriber_hash().map(|h| h.as_str().to_string());
        let synced_at = member.synced_at().map(|dt| dt.to_rfc3339());
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO list_members \
             (id, list_id, mail_chimp_id, email_address, status, subscriber_hash, \
              synced_at, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET \
              list_id = excluded.list_id, \
              mail_chimp_id = excluded.mail_chimp_id, \
              email_address = excluded.email_address, \
              status = excluded.status, \
              subscriber_hash = excluded.subscriber_hash, \
              synced_at = excluded.synced_at, \
              updated_at = excluded.updated_at",
        )
        .bind(&id)
        .bind(&list_id)
        .bind(&mail_chimp_id)
        .bind(member.email_address().as_str())
        .bind(member.status().as_str())
        .bind(&subscriber_hash)
        .bind(&synced_at)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::trace!(member_id = %id, "Saved list member");
        Ok(())
    }

    async fn get_member(&self, id: &MemberId) -> anyhow::Result<Option<ListMember>> {
        let id_str = id.to_string();

        let row = sqlx::query("SELECT * FROM list_members WHERE id = ?")
            .bind(&id_str)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(member_from_row(r)?)),
            None => Ok(None),
        }
    }

    async fn delete_member(&self, id: &MemberId) -> anyhow::Result<()> {
        let id_str = id.to_string();

        sqlx::query("DELETE FROM list_members WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await?;

        tracing::trace!(member_id = %id_str, "Deleted list member");
        Ok(())
    }

    async fn query_members(&self, filter: &MemberFilter) -> anyhow::Result<Vec<ListMember>> {
        let mut sql = String::from("SELECT * FROM list_members WHERE 1=1");
        let mut binds: Vec<String> = Vec::new();

        if let Some(ref list_id) = filter.list_id {
            sql.push_str(" AND list_id = ?");
            binds.push(list_id.to_string());
        }

        if let Some(ref status) = filter.status {
            sql.push_str(" AND status = ?");
            binds.push(status.as_str().to_string());
        }

        if let Some(ref email) = filter.email_address {
            sql.push_str(" AND email_address = ? COLLATE NOCASE");
            binds.push(email.clone());
        }

        match filter.synced {
            Some(true) => sql.push_str(" AND mail_chimp_id IS NOT NULL"),
            Some(false) => sql.push_str(" AND mail_chimp_id IS NULL"),
            None => {}
        }

        sql.push_str(" ORDER BY created_at ASC, rowid ASC");

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }

        let rows = query.fetch_all(&self.pool).await?;
        let mut members = Vec::with_capacity(rows.len());
        for row in &rows {
            members.push(member_from_row(row)?);
        }

        Ok(members)
    }
}
