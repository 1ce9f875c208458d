use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct HealthStatus {
    pub status: String,
    pub database: bool,
}

pub async fn health(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<HealthStatus>>, ApiError> {
    let database = sqlx::query("SELECT 1")
        .execute(&state.db.pool)
        .await
        .is_ok();

    Ok(ResponseJson(ApiResponse::success(HealthStatus {
        status: "ok".to_string(),
        database,
    })))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
