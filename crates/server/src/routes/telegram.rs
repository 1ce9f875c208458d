use axum::{Router, extract::State, response::Json as ResponseJson, routing::post};
use serde_json::Value;
use services::services::telegram_api::TelegramSendRequest;

use crate::{AppState, error::ApiError};

pub async fn send(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<TelegramSendRequest>,
) -> Result<ResponseJson<Value>, ApiError> {
    let response = state.telegram.send_message(&payload).await?;
    Ok(ResponseJson(response))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/telegram/send", post(send))
}
