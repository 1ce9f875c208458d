//! Storage-bucket provisioning, run by the `provision_buckets` operator
//! binary. A bucket is a registry row plus a backing directory under the
//! configured storage root.

use std::path::Path;

use db::models::bucket::Bucket;
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct BucketSpec {
    pub name: &'static str,
    pub public: bool,
    pub file_size_limit: Option<i64>,
}

/// The fixed bucket set the application expects to exist.
pub const DEFAULT_BUCKETS: &[BucketSpec] = &[
    BucketSpec {
        name: "project-files",
        public: false,
        file_size_limit: Some(50 * 1024 * 1024),
    },
    BucketSpec {
        name: "avatars",
        public: true,
        file_size_limit: Some(5 * 1024 * 1024),
    },
    BucketSpec {
        name: "chat-uploads",
        public: false,
        file_size_limit: Some(20 * 1024 * 1024),
    },
];

#[derive(Debug, Default, Serialize)]
pub struct ProvisionReport {
    pub created: Vec<String>,
    pub existing: Vec<String>,
}

pub struct StorageService;

impl StorageService {
    /// Idempotent: re-running against an already provisioned store reports
    /// every bucket as existing and changes nothing.
    pub async fn provision(
        pool: &SqlitePool,
        root: &Path,
        specs: &[BucketSpec],
    ) -> Result<ProvisionReport, StorageError> {
        let mut report = ProvisionReport::default();

        for spec in specs {
            tokio::fs::create_dir_all(root.join(spec.name)).await?;

            let (_, was_new) =
                Bucket::create_if_missing(pool, spec.name, spec.public, spec.file_size_limit)
                    .await?;

            if was_new {
                info!(bucket = spec.name, public = spec.public, "bucket created");
                report.created.push(spec.name.to_string());
            } else {
                info!(bucket = spec.name, "bucket already exists");
                report.existing.push(spec.name.to_string());
            }
        }

        Ok(report)
    }
}
