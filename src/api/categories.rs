use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_category_name, validate_limit};
use super::{ApiError, ApiResponse, AppState, Pagination};
use crate::entities::categories;
use crate::services::{CreateCategory, UpdateCategory};

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// POST /categories
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<categories::Model>>), ApiError> {
    validate_category_name(&payload.name)?;

    let category = state
        .category_service
        .create_category(
            current.id,
            CreateCategory {
                name: payload.name,
                description: payload.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(category))))
}

/// GET /categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<Vec<categories::Model>>>, ApiError> {
    let limit = validate_limit(pagination.limit)?;

    let categories = state
        .category_service
        .list_categories(current.id, pagination.skip, limit)
        .await?;

    Ok(Json(ApiResponse::success(categories)))
}

/// GET /categories/{id}
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<categories::Model>>, ApiError> {
    let category = state.category_service.get_category(current.id, id).await?;

    Ok(Json(ApiResponse::success(category)))
}

/// PUT /categories/{id}
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<categories::Model>>, ApiError> {
    if let Some(name) = &payload.name {
        validate_category_name(name)?;
    }

    let category = state
        .category_service
        .update_category(
            current.id,
            id,
            UpdateCategory {
                name: payload.name,
                description: payload.description,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(category)))
}

/// DELETE /categories/{id}
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state
        .category_service
        .delete_category(current.id, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
