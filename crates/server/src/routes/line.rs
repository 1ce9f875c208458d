//! LINE webhook ingestion, collected-contact endpoints and the push relay.

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use chrono::Utc;
use db::models::line_contact::{ContactKind, LineContact};
use serde::Deserialize;
use serde_json::Value;
use services::services::{
    line_api::LinePushRequest,
    webhook::{WebhookPayload, WebhookService, WebhookSummary},
};
use tower_http::cors::CorsLayer;
use tracing::warn;
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

/// The platform requires a 200 acknowledgement no matter what happened
/// internally, so this handler never returns an error. It reads the raw
/// body rather than going through the JSON extractor, whose rejections
/// (bad syntax, missing content-type) would answer before the handler runs.
/// A body that does not parse as a webhook payload is acknowledged with an
/// empty summary.
pub async fn webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> ResponseJson<WebhookSummary> {
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "webhook: unparseable delivery, acknowledging anyway");
            return ResponseJson(WebhookSummary::default());
        }
    };

    ResponseJson(WebhookService::process(&state.db.pool, &payload).await)
}

/// Manual collect payload, same dedup/update semantics as the webhook path.
#[derive(Debug, Clone, Deserialize, TS)]
pub struct CollectContact {
    #[serde(alias = "userId", alias = "groupId")]
    pub platform_id: String,
    #[serde(alias = "displayName")]
    pub display_name: Option<String>,
    #[serde(alias = "lastMessage")]
    pub last_message: Option<String>,
}

async fn list_contacts(
    state: &AppState,
    kind: ContactKind,
) -> Result<ResponseJson<ApiResponse<Vec<LineContact>>>, ApiError> {
    let contacts = LineContact::find_by_kind(&state.db.pool, kind).await?;
    Ok(ResponseJson(ApiResponse::success(contacts)))
}

async fn collect_contact(
    state: &AppState,
    kind: ContactKind,
    payload: CollectContact,
) -> Result<ResponseJson<ApiResponse<LineContact>>, ApiError> {
    if payload.platform_id.trim().is_empty() {
        return Err(ApiError::BadRequest("platform id must not be empty".to_string()));
    }
    let (contact, _) = LineContact::upsert_seen(
        &state.db.pool,
        kind,
        &payload.platform_id,
        payload.display_name.as_deref(),
        payload.last_message.as_deref(),
        Utc::now(),
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(contact)))
}

async fn clear_contacts(
    state: &AppState,
    kind: ContactKind,
) -> Result<ResponseJson<ApiResponse<u64>>, ApiError> {
    let deleted = LineContact::delete_by_kind(&state.db.pool, kind).await?;
    Ok(ResponseJson(ApiResponse::success(deleted)))
}

pub async fn list_collected_users(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<LineContact>>>, ApiError> {
    list_contacts(&state, ContactKind::User).await
}

pub async fn collect_user(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CollectContact>,
) -> Result<ResponseJson<ApiResponse<LineContact>>, ApiError> {
    collect_contact(&state, ContactKind::User, payload).await
}

pub async fn clear_collected_users(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<u64>>, ApiError> {
    clear_contacts(&state, ContactKind::User).await
}

pub async fn list_collected_groups(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<LineContact>>>, ApiError> {
    list_contacts(&state, ContactKind::Group).await
}

pub async fn collect_group(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CollectContact>,
) -> Result<ResponseJson<ApiResponse<LineContact>>, ApiError> {
    collect_contact(&state, ContactKind::Group, payload).await
}

pub async fn clear_collected_groups(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<u64>>, ApiError> {
    clear_contacts(&state, ContactKind::Group).await
}

/// Relay: forwards the push request to the platform and returns the
/// provider's response body as-is.
pub async fn send(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<LinePushRequest>,
) -> Result<ResponseJson<Value>, ApiError> {
    let response = state.line.push_message(&payload).await?;
    Ok(ResponseJson(response))
}

pub async fn profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ResponseJson<Value>, ApiError> {
    let response = state.line.get_profile(&user_id).await?;
    Ok(ResponseJson(response))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/line",
        Router::new()
            .route("/webhook", post(webhook))
            .route(
                "/collected-users",
                get(list_collected_users)
                    .post(collect_user)
                    .delete(clear_collected_users),
            )
            .route(
                "/collected-groups",
                get(list_collected_groups)
                    .post(collect_group)
                    .delete(clear_collected_groups),
            )
            .route("/send", post(send))
            .route("/profile/{user_id}", get(profile))
            // The original handlers answered with `Access-Control-Allow-Origin: *`.
            .layer(CorsLayer::permissive()),
    )
}
