use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::department::{CreateDepartment, Department};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Department>>>, ApiError> {
    let departments = Department::find_all(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(departments)))
}

pub async fn create_department(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateDepartment>,
) -> Result<ResponseJson<ApiResponse<Department>>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("department name must not be empty".to_string()));
    }
    let department = Department::create(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(department)))
}

pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Department>>, ApiError> {
    let department = Department::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(department)))
}

pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Department::delete(&state.db.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list_departments).post(create_department))
        .route(
            "/departments/{id}",
            get(get_department).delete(delete_department),
        )
}
