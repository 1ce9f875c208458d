use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    attachment::{Attachment, CreateAttachment},
    chat_message::{ChatMessage, CreateChatMessage},
    project::{CreateProject, Project, UpdateProject},
    task::{CreateTask, Task},
};
use serde::Deserialize;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ProjectFilter {
    pub client_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
}

pub async fn list_projects(
    State(state): State<AppState>,
    Query(filter): Query<ProjectFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<Project>>>, ApiError> {
    let projects = match (filter.client_id, filter.manager_id) {
        (Some(client_id), _) => Project::find_by_client(&state.db.pool, client_id).await?,
        (None, Some(manager_id)) => Project::find_by_manager(&state.db.pool, manager_id).await?,
        (None, None) => Project::find_all(&state.db.pool).await?,
    };
    Ok(ResponseJson(ApiResponse::success(projects)))
}

pub async fn create_project(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateProject>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("project name must not be empty".to_string()));
    }
    let project = Project::create(&state.db.pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let project = Project::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateProject>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let project = Project::update(&state.db.pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Project::delete(&state.db.pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn list_project_tasks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    let tasks = Task::find_by_project(&state.db.pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

pub async fn create_project_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    // Creating into a missing project should 404, not bubble an FK error.
    Project::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let task = Task::create(&state.db.pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    pub limit: Option<i64>,
}

pub async fn list_project_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ChatQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<ChatMessage>>>, ApiError> {
    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let messages = ChatMessage::find_by_project(&state.db.pool, id, limit).await?;
    Ok(ResponseJson(ApiResponse::success(messages)))
}

pub async fn post_project_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateChatMessage>,
) -> Result<ResponseJson<ApiResponse<ChatMessage>>, ApiError> {
    Project::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let message = ChatMessage::create(&state.db.pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(message)))
}

pub async fn list_project_attachments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<Attachment>>>, ApiError> {
    let attachments = Attachment::find_by_project(&state.db.pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(attachments)))
}

pub async fn create_project_attachment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateAttachment>,
) -> Result<ResponseJson<ApiResponse<Attachment>>, ApiError> {
    Project::find_by_id(&state.db.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let attachment = Attachment::create(&state.db.pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(attachment)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route(
            "/projects/{id}/tasks",
            get(list_project_tasks).post(create_project_task),
        )
        .route(
            "/projects/{id}/chat",
            get(list_project_chat).post(post_project_chat),
        )
        .route(
            "/projects/{id}/attachments",
            get(list_project_attachments).post(create_project_attachment),
        )
}
