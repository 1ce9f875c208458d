use anyhow::Context;
use db::DBService;
use server::{AppState, app};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    utils::logging::init("server=info,services=info,db=info,tower_http=debug");

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:opsboard.db".to_string());
    let db = DBService::new(&database_url)
        .await
        .with_context(|| format!("failed to open database {database_url}"))?;

    let state = AppState::new(db)?;

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8082);
    let addr = format!("0.0.0.0:{port}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {}", addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
