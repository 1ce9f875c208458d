//! Ad-hoc SQL runner for operators: reads a `.sql` file, splits it on `;`
//! and executes each statement, logging per-statement outcome. Keeps going
//! after a failed statement and exits non-zero if anything failed.

use anyhow::Context;
use db::DBService;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    utils::logging::init("run_migration=info");

    let path = std::env::args()
        .nth(1)
        .context("usage: run_migration <file.sql>")?;
    let sql = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {path}"))?;

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:opsboard.db".to_string());
    let db = DBService::new(&database_url).await?;

    let statements: Vec<&str> = sql
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with("--"))
        .collect();

    info!("executing {} statements from {}", statements.len(), path);

    let mut failed = 0usize;
    for (i, statement) in statements.iter().enumerate() {
        match sqlx::query(statement).execute(&db.pool).await {
            Ok(result) => {
                info!(
                    statement = i + 1,
                    rows_affected = result.rows_affected(),
                    "ok"
                );
            }
            Err(e) => {
                failed += 1;
                error!(statement = i + 1, error = %e, "failed");
            }
        }
    }

    if failed > 0 {
        error!("{failed} of {} statements failed", statements.len());
        std::process::exit(1);
    }

    info!("all statements executed");
    Ok(())
}
