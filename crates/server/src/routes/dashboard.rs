use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use db::models::task::Task;
use services::services::reporting::{
    DashboardSummary, DepartmentLoad, ManagerWorkload, ReportingService,
};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

pub async fn summary(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<DashboardSummary>>, ApiError> {
    let summary = ReportingService::dashboard_summary(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(summary)))
}

pub async fn departments(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<DepartmentLoad>>>, ApiError> {
    let loads = ReportingService::projects_by_department(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(loads)))
}

pub async fn workload(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<ManagerWorkload>>>, ApiError> {
    let workload = ReportingService::workload_by_manager(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(workload)))
}

pub async fn overdue(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    let tasks = Task::find_overdue(&state.db.pool).await?;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/dashboard",
        Router::new()
            .route("/summary", get(summary))
            .route("/departments", get(departments))
            .route("/workload", get(workload))
            .route("/overdue", get(overdue)),
    )
}
