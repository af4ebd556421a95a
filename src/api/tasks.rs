use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_limit, validate_task_title};
use super::{ApiError, ApiResponse, AppState, Pagination};
use crate::entities::tasks;
use crate::services::{CreateTask, UpdateTask};

// Task routes need authentication only; ownership filtering in the service
// layer is the access control.

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub category_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<String>,
    pub category_id: Option<i32>,
}

/// POST /tasks
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<ApiResponse<tasks::Model>>), ApiError> {
    validate_task_title(&payload.title)?;

    let task = state
        .task_service
        .create_task(
            current.id,
            CreateTask {
                title: payload.title,
                description: payload.description,
                due_date: payload.due_date,
                category_id: payload.category_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(task))))
}

/// GET /tasks
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<Vec<tasks::Model>>>, ApiError> {
    let limit = validate_limit(pagination.limit)?;

    let tasks = state
        .task_service
        .list_tasks(current.id, pagination.skip, limit)
        .await?;

    Ok(Json(ApiResponse::success(tasks)))
}

/// GET /tasks/{id}
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<tasks::Model>>, ApiError> {
    let task = state.task_service.get_task(current.id, id).await?;

    Ok(Json(ApiResponse::success(task)))
}

/// PUT /tasks/{id}
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<ApiResponse<tasks::Model>>, ApiError> {
    if let Some(title) = &payload.title {
        validate_task_title(title)?;
    }

    let task = state
        .task_service
        .update_task(
            current.id,
            id,
            UpdateTask {
                title: payload.title,
                description: payload.description,
                completed: payload.completed,
                due_date: payload.due_date,
                category_id: payload.category_id,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(task)))
}

/// DELETE /tasks/{id}
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.task_service.delete_task(current.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
