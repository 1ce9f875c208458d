use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Metadata record for a file stored in a storage bucket. The bytes
/// themselves live under the bucket's backing directory.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Attachment {
    pub id: Uuid,
    pub project_id: Uuid,
    pub bucket: String,
    pub object_path: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateAttachment {
    pub bucket: String,
    pub object_path: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub uploaded_by: Option<Uuid>,
}

const COLUMNS: &str = "id, project_id, bucket, object_path, file_name, content_type, \
                       size_bytes, uploaded_by, created_at";

impl Attachment {
    pub async fn create(
        pool: &SqlitePool,
        project_id: Uuid,
        data: &CreateAttachment,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Attachment>(&format!(
            r#"INSERT INTO attachments
                 (id, project_id, bucket, object_path, file_name, content_type,
                  size_bytes, uploaded_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {COLUMNS}"#
        ))
        .bind(id)
        .bind(project_id)
        .bind(&data.bucket)
        .bind(&data.object_path)
        .bind(&data.file_name)
        .bind(&data.content_type)
        .bind(data.size_bytes)
        .bind(data.uploaded_by)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_project(
        pool: &SqlitePool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Attachment>(&format!(
            "SELECT {COLUMNS} FROM attachments WHERE project_id = $1 ORDER BY created_at DESC"
        ))
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM attachments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
