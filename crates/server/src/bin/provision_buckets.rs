//! Operator script: create the storage buckets the application expects.
//! Safe to re-run; existing buckets are left untouched.

use std::path::PathBuf;

use db::DBService;
use services::services::storage::{DEFAULT_BUCKETS, StorageService};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    utils::logging::init("provision_buckets=info,services=info");

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:opsboard.db".to_string());
    let storage_root = PathBuf::from(
        std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "./storage".to_string()),
    );

    let db = DBService::new(&database_url).await?;
    let report = StorageService::provision(&db.pool, &storage_root, DEFAULT_BUCKETS).await?;

    info!(
        created = report.created.len(),
        existing = report.existing.len(),
        root = %storage_root.display(),
        "bucket provisioning complete"
    );
    Ok(())
}
