use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::{CurrentUser, require_scope};
use super::validation::{
    validate_email, validate_full_name, validate_limit, validate_password, validate_username,
};
use super::{ApiError, ApiResponse, AppState, Pagination, UserDto};
use crate::auth::scopes::Scope;
use crate::services::{CreateUser, UpdateUser};

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
}

/// POST /users
/// Register a new account (requires `users:write`)
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    require_scope(&current, Scope::UsersWrite)?;

    validate_username(&payload.username)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;
    if let Some(full_name) = &payload.full_name {
        validate_full_name(full_name)?;
    }

    let user = state
        .user_service
        .create_user(CreateUser {
            email: payload.email,
            username: payload.username,
            password: payload.password,
            full_name: payload.full_name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

/// GET /users/me
/// The caller's own account; any authenticated user
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.user_service.get_user(current.id).await?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// GET /users
/// List accounts (requires `users:read`)
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    require_scope(&current, Scope::UsersRead)?;
    let limit = validate_limit(pagination.limit)?;

    let users = state.user_service.list_users(pagination.skip, limit).await?;

    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

/// GET /users/{id}
/// Fetch one account (requires `users:read`)
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    require_scope(&current, Scope::UsersRead)?;

    let user = state.user_service.get_user(id).await?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// PUT /users/{id}
/// Partial account update (requires `users:write`)
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    require_scope(&current, Scope::UsersWrite)?;

    if let Some(username) = &payload.username {
        validate_username(username)?;
    }
    if let Some(email) = &payload.email {
        validate_email(email)?;
    }
    if let Some(full_name) = &payload.full_name {
        validate_full_name(full_name)?;
    }

    let user = state
        .user_service
        .update_user(
            id,
            UpdateUser {
                email: payload.email,
                username: payload.username,
                full_name: payload.full_name,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// DELETE /users/{id}
/// Remove an account and everything it owns (requires `users:write`)
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    require_scope(&current, Scope::UsersWrite)?;

    state.user_service.delete_user(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
