use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ChatMessage {
    pub id: Uuid,
    pub project_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateChatMessage {
    pub sender_id: Option<Uuid>,
    pub body: String,
}

impl ChatMessage {
    pub async fn create(
        pool: &SqlitePool,
        project_id: Uuid,
        data: &CreateChatMessage,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, ChatMessage>(
            r#"INSERT INTO chat_messages (id, project_id, sender_id, body)
               VALUES ($1, $2, $3, $4)
               RETURNING id, project_id, sender_id, body, created_at"#,
        )
        .bind(id)
        .bind(project_id)
        .bind(data.sender_id)
        .bind(&data.body)
        .fetch_one(pool)
        .await
    }

    /// Newest first, capped by `limit`.
    pub async fn find_by_project(
        pool: &SqlitePool,
        project_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ChatMessage>(
            r#"SELECT id, project_id, sender_id, body, created_at
               FROM chat_messages
               WHERE project_id = $1
               ORDER BY created_at DESC
               LIMIT $2"#,
        )
        .bind(project_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn delete_by_project(pool: &SqlitePool, project_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE project_id = $1")
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
