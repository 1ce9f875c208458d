use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    manager::{CreateManager, Manager, UpdateManager},
    task::Task,
};
use serde::Deserialize;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ManagerFilter {
    pub department_id: Option<Uuid>,
}

pub async fn list_managers(
    State(state): State<AppState>,
    Query(filter): Query<ManagerFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<Manager>>>, ApiError> {
    let managers = match filter.department_id {
        Some(department_id) => Manager::find_by_department(&state.db.pool, department_id).await?,
        None => Manager::find_all(&state.db.pool).await?,
    };
    Ok(ResponseJson(ApiResponse::success(managers)))
}

pub async fn create_manager(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateManager>,
) -> Result<ResponseJson<ApiResponse<Manager>>, ApiError> {
    if payload.email.trim().is_empty() {
        return Err(ApiError::BadRequest("manager email must not be empty".to_string()));
    }
    let manager = Manager::create(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(manager)))
}

pub async fn get_manager(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Manager>>, ApiError> {
    let manager = Manager::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(manager)))
}

pub async fn update_manager(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateManager>,
) -> Result<ResponseJson<ApiResponse<Manager>>, ApiError> {
    let manager = Manager::update(&state.db.pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(manager)))
}

pub async fn delete_manager(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Manager::delete(&state.db.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn list_manager_tasks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    let tasks = Task::find_by_assignee(&state.db.pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/managers", get(list_managers).post(create_manager))
        .route(
            "/managers/{id}",
            get(get_manager).put(update_manager).delete(delete_manager),
        )
        .route("/managers/{id}/tasks", get(list_manager_tasks))
}
