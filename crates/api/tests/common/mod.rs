//! Shared helpers for the HTTP integration tests.

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use taskflow_api::auth::jwt::JwtConfig;
use taskflow_api::config::ServerConfig;
use taskflow_api::router::build_app_router;
use taskflow_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-0123456789abcdef".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the application router exactly as `main.rs` does, over the given
/// test database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    build_app_router(AppState::new(pool, config.clone()), &config)
}

async fn send(
    app: Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, path: &str) -> Response<Body> {
    send(app, Method::GET, path, None, None).await
}

pub async fn get_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, path, Some(token), None).await
}

pub async fn post_json(app: Router, path: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, path, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, path: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, path, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, path: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, path, Some(token), Some(body)).await
}

pub async fn put_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    send(app, Method::PUT, path, Some(token), None).await
}

pub async fn delete_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, path, Some(token), None).await
}

pub async fn delete_json_auth(app: Router, path: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::DELETE, path, Some(token), Some(body)).await
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// Register a user through the API and log in, returning `(user_id, token)`.
pub async fn register_and_login(app: &Router, username: &str) -> (i64, String) {
    let body = serde_json::json!({
        "username": username,
        "password": "test_password_123!",
        "display_name": username,
        "email": format!("{username}@test.com"),
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let user = body_json(response).await;

    let body = serde_json::json!({
        "username": username,
        "password": "test_password_123!",
    });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    (
        user["id"].as_i64().unwrap(),
        json["access_token"].as_str().unwrap().to_string(),
    )
}

/// Create a project through the API, returning its ID.
pub async fn create_project(app: &Router, token: &str, title: &str) -> i64 {
    let body = serde_json::json!({ "title": title, "description": "test project" });
    let response = post_json_auth(app.clone(), "/api/v1/projects", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a task in a project through the API, returning its ID.
pub async fn create_task(app: &Router, token: &str, project_id: i64, title: &str) -> i64 {
    let body = serde_json::json!({ "project_id": project_id, "title": title });
    let response = post_json_auth(app.clone(), "/api/v1/tasks", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
