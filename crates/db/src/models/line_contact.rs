use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Source kind of a contact observed on the messaging platform. Rooms are
/// folded into `Group` since the platform treats both as multi-member chats.
#[derive(Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display)]
#[sqlx(type_name = "contact_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContactKind {
    User,
    Group,
}

/// A user or group chat seen through the messaging-platform webhook.
///
/// Persisted instead of held in process memory: webhook deliveries may land
/// on any instance, so dedup has to happen in the store.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct LineContact {
    pub id: Uuid,
    pub kind: ContactKind,
    pub platform_id: String,
    pub display_name: Option<String>,
    pub last_message: Option<String>,
    pub last_event_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const COLUMNS: &str = "id, kind, platform_id, display_name, last_message, last_event_at, \
                       created_at, updated_at";

impl LineContact {
    /// Record a contact sighting. Inserts on first sight, otherwise updates
    /// last_message / last_event_at on the existing row. Returns the row and
    /// whether it was newly created.
    pub async fn upsert_seen(
        pool: &SqlitePool,
        kind: ContactKind,
        platform_id: &str,
        display_name: Option<&str>,
        last_message: Option<&str>,
        last_event_at: DateTime<Utc>,
    ) -> Result<(Self, bool), sqlx::Error> {
        let id = Uuid::new_v4();
        let inserted = sqlx::query(
            r#"INSERT INTO line_contacts
                 (id, kind, platform_id, display_name, last_message, last_event_at)
               VALUES ($1, $2, $3, $4, $5, $6)
               ON CONFLICT(kind, platform_id) DO NOTHING"#,
        )
        .bind(id)
        .bind(kind)
        .bind(platform_id)
        .bind(display_name)
        .bind(last_message)
        .bind(last_event_at)
        .execute(pool)
        .await?
        .rows_affected();

        let was_new = inserted > 0;
        if !was_new {
            sqlx::query(
                r#"UPDATE line_contacts SET
                     display_name = COALESCE($3, display_name),
                     last_message = COALESCE($4, last_message),
                     last_event_at = $5,
                     updated_at = CURRENT_TIMESTAMP
                   WHERE kind = $1 AND platform_id = $2"#,
            )
            .bind(kind)
            .bind(platform_id)
            .bind(display_name)
            .bind(last_message)
            .bind(last_event_at)
            .execute(pool)
            .await?;
        }

        let contact = Self::find_by_platform_id(pool, kind, platform_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok((contact, was_new))
    }

    pub async fn find_by_platform_id(
        pool: &SqlitePool,
        kind: ContactKind,
        platform_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, LineContact>(&format!(
            "SELECT {COLUMNS} FROM line_contacts WHERE kind = $1 AND platform_id = $2"
        ))
        .bind(kind)
        .bind(platform_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_kind(pool: &SqlitePool, kind: ContactKind) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, LineContact>(&format!(
            "SELECT {COLUMNS} FROM line_contacts WHERE kind = $1 ORDER BY last_event_at DESC"
        ))
        .bind(kind)
        .fetch_all(pool)
        .await
    }

    pub async fn count_by_kind(pool: &SqlitePool, kind: ContactKind) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM line_contacts WHERE kind = $1")
                .bind(kind)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    pub async fn delete_by_kind(pool: &SqlitePool, kind: ContactKind) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM line_contacts WHERE kind = $1")
            .bind(kind)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
