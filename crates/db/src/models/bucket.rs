use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Registry row for a provisioned storage bucket.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Bucket {
    pub id: Uuid,
    pub name: String,
    pub public: bool,
    pub file_size_limit: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Bucket {
    /// Idempotent create: returns the existing row when the name is taken.
    pub async fn create_if_missing(
        pool: &SqlitePool,
        name: &str,
        public: bool,
        file_size_limit: Option<i64>,
    ) -> Result<(Self, bool), sqlx::Error> {
        if let Some(existing) = Self::find_by_name(pool, name).await? {
            return Ok((existing, false));
        }

        let id = Uuid::new_v4();
        let bucket = sqlx::query_as::<_, Bucket>(
            r#"INSERT INTO buckets (id, name, public, file_size_limit)
               VALUES ($1, $2, $3, $4)
               RETURNING id, name, public, file_size_limit, created_at"#,
        )
        .bind(id)
        .bind(name)
        .bind(public)
        .bind(file_size_limit)
        .fetch_one(pool)
        .await?;

        Ok((bucket, true))
    }

    pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Bucket>(
            "SELECT id, name, public, file_size_limit, created_at FROM buckets WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Bucket>(
            "SELECT id, name, public, file_size_limit, created_at FROM buckets ORDER BY name ASC",
        )
        .fetch_all(pool)
        .await
    }
}
