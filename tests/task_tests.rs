//! Task and category flows: owner scoping, category references, cascade
//! delete.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use taskman::api::AppState;
use taskman::config::Config;
use tower::ServiceExt;

async fn spawn_app() -> (Router, Arc<AppState>) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.security.jwt_secret = "test-secret".to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = taskman::api::create_app_state(config, None)
        .await
        .expect("Failed to create app state");
    (taskman::api::router(state.clone()), state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"));

    let request = if let Some(body) = body {
        builder = builder.header("Content-Type", "application/json");
        builder.body(Body::from(body.to_string())).unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/token")
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(Body::from(format!(
                    "username={username}&password={password}"
                )))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    json["access_token"].as_str().unwrap().to_string()
}

/// Register a user through the seeded superuser and log them in.
async fn create_user_and_login(app: &Router, username: &str) -> String {
    let root_token = login(app, "root", "changeme").await;

    let (status, _) = send(
        app,
        "POST",
        "/api/v1/users",
        &root_token,
        Some(serde_json::json!({
            "email": format!("{username}@example.com"),
            "username": username,
            "password": "password1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    login(app, username, "password1").await
}

#[tokio::test]
async fn test_task_crud_round_trip() {
    let (app, _) = spawn_app().await;
    let token = create_user_and_login(&app, "alice").await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/tasks",
        &token,
        Some(serde_json::json!({"title": "Buy milk", "description": "2 liters"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["completed"], false);

    let (status, json) = send(&app, "GET", "/api/v1/tasks", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/api/v1/tasks/{task_id}"),
        &token,
        Some(serde_json::json!({"completed": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["completed"], true);
    assert_eq!(json["data"]["title"], "Buy milk");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/tasks/{task_id}"),
        &token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/tasks/{task_id}"),
        &token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_task_title_is_rejected() {
    let (app, _) = spawn_app().await;
    let token = create_user_and_login(&app, "alice").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/tasks",
        &token,
        Some(serde_json::json!({"title": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_cross_owner_task_access_is_not_found() {
    let (app, _) = spawn_app().await;
    let alice = create_user_and_login(&app, "alice").await;
    let mallory = create_user_and_login(&app, "mallory").await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/tasks",
        &alice,
        Some(serde_json::json!({"title": "Private"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = json["data"]["id"].as_i64().unwrap();

    // Every verb reports 404, never 403
    let uri = format!("/api/v1/tasks/{task_id}");
    let (status, _) = send(&app, "GET", &uri, &mallory, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        &mallory,
        Some(serde_json::json!({"title": "Hijacked"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, &mallory, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Still intact for the owner
    let (status, json) = send(&app, "GET", &uri, &alice, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["title"], "Private");

    // And absent from the other account's listing
    let (_, json) = send(&app, "GET", "/api/v1/tasks", &mallory, None).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_category_crud_and_per_owner_uniqueness() {
    let (app, _) = spawn_app().await;
    let alice = create_user_and_login(&app, "alice").await;
    let bob = create_user_and_login(&app, "bob").await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/categories",
        &alice,
        Some(serde_json::json!({"name": "Work"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = json["data"]["id"].as_i64().unwrap();

    // Duplicate name for the same owner
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/categories",
        &alice,
        Some(serde_json::json!({"name": "Work"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Same name is fine for a different owner
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/categories",
        &bob,
        Some(serde_json::json!({"name": "Work"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = send(
        &app,
        "PUT",
        &format!("/api/v1/categories/{category_id}"),
        &alice,
        Some(serde_json::json!({"name": "Office", "description": "Day job"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Office");

    // Cross-owner reads are 404
    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/categories/{category_id}"),
        &bob,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_with_foreign_category_is_not_found() {
    let (app, _) = spawn_app().await;
    let alice = create_user_and_login(&app, "alice").await;
    let bob = create_user_and_login(&app, "bob").await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/categories",
        &alice,
        Some(serde_json::json!({"name": "Work"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let alice_category = json["data"]["id"].as_i64().unwrap();

    // Bob cannot attach his task to Alice's category
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/tasks",
        &bob,
        Some(serde_json::json!({"title": "Sneaky", "category_id": alice_category})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Alice can
    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/tasks",
        &alice,
        Some(serde_json::json!({"title": "Report", "category_id": alice_category})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["category_id"].as_i64().unwrap(), alice_category);
}

#[tokio::test]
async fn test_deleting_category_detaches_tasks() {
    let (app, _) = spawn_app().await;
    let alice = create_user_and_login(&app, "alice").await;

    let (_, json) = send(
        &app,
        "POST",
        "/api/v1/categories",
        &alice,
        Some(serde_json::json!({"name": "Chores"})),
    )
    .await;
    let category_id = json["data"]["id"].as_i64().unwrap();

    let (_, json) = send(
        &app,
        "POST",
        "/api/v1/tasks",
        &alice,
        Some(serde_json::json!({"title": "Dishes", "category_id": category_id})),
    )
    .await;
    let task_id = json["data"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/categories/{category_id}"),
        &alice,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, json) = send(
        &app,
        "GET",
        &format!("/api/v1/tasks/{task_id}"),
        &alice,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["category_id"].is_null());
}

#[tokio::test]
async fn test_user_delete_cascades_to_owned_records() {
    let (app, state) = spawn_app().await;
    let root_token = login(&app, "root", "changeme").await;
    let alice = create_user_and_login(&app, "alice").await;

    let (_, json) = send(&app, "GET", "/api/v1/users/me", &alice, None).await;
    let alice_id = i32::try_from(json["data"]["id"].as_i64().unwrap()).unwrap();

    let (_, json) = send(
        &app,
        "POST",
        "/api/v1/categories",
        &alice,
        Some(serde_json::json!({"name": "Work"})),
    )
    .await;
    let category_id = json["data"]["id"].as_i64().unwrap();

    for title in ["One", "Two"] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/tasks",
            &alice,
            Some(serde_json::json!({"title": title, "category_id": category_id})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    assert_eq!(state.store.count_tasks_for_owner(alice_id).await.unwrap(), 2);
    assert_eq!(
        state
            .store
            .count_categories_for_owner(alice_id)
            .await
            .unwrap(),
        1
    );

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/users/{alice_id}"),
        &root_token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Nothing owned survives
    assert_eq!(state.store.count_tasks_for_owner(alice_id).await.unwrap(), 0);
    assert_eq!(
        state
            .store
            .count_categories_for_owner(alice_id)
            .await
            .unwrap(),
        0
    );

    // The orphaned token no longer resolves to a live user
    let (status, _) = send(&app, "GET", "/api/v1/users/me", &alice, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
