use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use metrics_exporter_prometheus::PrometheusHandle;

pub mod auth;
mod categories;
mod error;
mod observability;
mod system;
mod tasks;
mod types;
mod users;
mod validation;

pub use error::ApiError;
pub use types::*;

use crate::auth::token::TokenIssuer;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CategoryService, SeaOrmAuthService, SeaOrmCategoryService, SeaOrmTaskService,
    SeaOrmUserService, TaskService, UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Store,

    pub tokens: Arc<TokenIssuer>,

    pub auth_service: Arc<dyn AuthService>,

    pub user_service: Arc<dyn UserService>,

    pub task_service: Arc<dyn TaskService>,

    pub category_service: Arc<dyn CategoryService>,

    pub config: Arc<Config>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

pub async fn create_app_state(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let tokens = Arc::new(TokenIssuer::new(
        &config.security.jwt_secret,
        config.security.access_token_ttl_minutes,
    ));

    let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), tokens.clone()));
    let user_service = Arc::new(SeaOrmUserService::new(
        store.clone(),
        config.security.clone(),
    ));
    let task_service = Arc::new(SeaOrmTaskService::new(store.clone()));
    let category_service = Arc::new(SeaOrmCategoryService::new(store.clone()));

    Ok(Arc::new(AppState {
        store,
        tokens,
        auth_service,
        user_service,
        task_service,
        category_service,
        config: Arc::new(config),
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/token", post(auth::issue_token))
        .route("/health", get(system::health))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api/v1", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(users::create_user))
        .route("/users", get(users::list_users))
        .route("/users/me", get(users::get_me))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}", put(users::update_user))
        .route("/users/{id}", delete(users::delete_user))
        .route("/tasks", post(tasks::create_task))
        .route("/tasks", get(tasks::list_tasks))
        .route("/tasks/{id}", get(tasks::get_task))
        .route("/tasks/{id}", put(tasks::update_task))
        .route("/tasks/{id}", delete(tasks::delete_task))
        .route("/categories", post(categories::create_category))
        .route("/categories", get(categories::list_categories))
        .route("/categories/{id}", get(categories::get_category))
        .route("/categories/{id}", put(categories::update_category))
        .route("/categories/{id}", delete(categories::delete_category))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
