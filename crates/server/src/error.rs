use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::relay::RelayError;
use thiserror::Error;
use tracing::error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Relay(#[from] RelayError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound | ApiError::Database(sqlx::Error::RowNotFound) => (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("not found")),
            )
                .into_response(),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<()>::error(message)),
            )
                .into_response(),
            ApiError::Database(e) => {
                error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<()>::error("internal server error")),
                )
                    .into_response()
            }
            ApiError::Relay(RelayError::MissingToken(var)) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<()>::error(format!(
                    "missing credential: {var} environment variable not set"
                ))),
            )
                .into_response(),
            // The relay contract: the provider's status code and body are
            // echoed verbatim, not wrapped in the API envelope.
            ApiError::Relay(RelayError::Upstream { status, body }) => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                body,
            )
                .into_response(),
            ApiError::Relay(e) => {
                error!(error = %e, "relay transport error");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ApiResponse::<()>::error(e.to_string())),
                )
                    .into_response()
            }
        }
    }
}
