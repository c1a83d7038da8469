//! Integration tests for time logging and log visibility.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_project, create_task, get_auth, post_json_auth, put_json_auth,
    register_and_login,
};
use sqlx::PgPool;

async fn assign(app: &axum::Router, token: &str, task_id: i64, user_id: i64) {
    let body = serde_json::json!({ "user_id": user_id });
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/tasks/{task_id}/assign"),
        token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

fn log_body(start: &str, end: &str) -> serde_json::Value {
    serde_json::json!({ "start_time": start, "end_time": end })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn assignee_can_log_time(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_id, owner) = register_and_login(&app, "owner").await;
    let (worker_id, worker) = register_and_login(&app, "worker").await;
    let project_id = create_project(&app, &owner, "Launch").await;
    let task_id = create_task(&app, &owner, project_id, "Write spec").await;
    assign(&app, &owner, task_id, worker_id).await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/tasks/{task_id}/log-time"),
        &worker,
        log_body("2026-08-26T09:00:00Z", "2026-08-26T11:30:00Z"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["user_id"], worker_id);
    assert_eq!(json["username"], "worker");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_cannot_log_time_unless_assigned(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_id, owner) = register_and_login(&app, "owner").await;
    let project_id = create_project(&app, &owner, "Launch").await;
    let task_id = create_task(&app, &owner, project_id, "Write spec").await;

    // The owner administers the project but is not the assignee.
    let response = post_json_auth(
        app,
        &format!("/api/v1/tasks/{task_id}/log-time"),
        &owner,
        log_body("2026-08-26T09:00:00Z", "2026-08-26T10:00:00Z"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn inverted_time_range_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_id, owner) = register_and_login(&app, "owner").await;
    let project_id = create_project(&app, &owner, "Launch").await;
    let task_id = create_task(&app, &owner, project_id, "Write spec").await;
    assign(&app, &owner, task_id, owner_id).await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/tasks/{task_id}/log-time"),
        &owner,
        log_body("2026-08-26T11:00:00Z", "2026-08-26T09:00:00Z"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logging_against_missing_task_is_forbidden(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_id, owner) = register_and_login(&app, "owner").await;

    // Same denial as an existing task the caller is not assigned to.
    let response = post_json_auth(
        app,
        "/api/v1/tasks/9999/log-time",
        &owner,
        log_body("2026-08-26T09:00:00Z", "2026-08-26T10:00:00Z"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_sees_all_logs_and_only_mine_filters(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_id, owner) = register_and_login(&app, "owner").await;
    let (worker_id, worker) = register_and_login(&app, "worker").await;
    let project_id = create_project(&app, &owner, "Launch").await;
    let task_id = create_task(&app, &owner, project_id, "Write spec").await;

    assign(&app, &owner, task_id, owner_id).await;
    post_json_auth(
        app.clone(),
        &format!("/api/v1/tasks/{task_id}/log-time"),
        &owner,
        log_body("2026-08-25T09:00:00Z", "2026-08-25T10:00:00Z"),
    )
    .await;

    assign(&app, &owner, task_id, worker_id).await;
    post_json_auth(
        app.clone(),
        &format!("/api/v1/tasks/{task_id}/log-time"),
        &worker,
        log_body("2026-08-26T09:00:00Z", "2026-08-26T10:00:00Z"),
    )
    .await;

    let response = get_auth(app.clone(), &format!("/api/v1/tasks/{task_id}/logs"), &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    let response = get_auth(
        app,
        &format!("/api/v1/tasks/{task_id}/logs?only_mine=true"),
        &owner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let logs = json.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["user_id"], owner_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn outsider_cannot_read_logs(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_id, owner) = register_and_login(&app, "owner").await;
    let (_oid, outsider) = register_and_login(&app, "outsider").await;
    let project_id = create_project(&app, &owner, "Launch").await;
    let task_id = create_task(&app, &owner, project_id, "Write spec").await;

    let response = get_auth(app, &format!("/api/v1/tasks/{task_id}/logs"), &outsider).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn full_workflow_from_project_to_logged_time(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_u_id, u) = register_and_login(&app, "ulla").await;
    let (v_id, v) = register_and_login(&app, "viktor").await;
    let (_w_id, w) = register_and_login(&app, "wanda").await;

    let project_id = create_project(&app, &u, "Launch").await;
    let task_id = create_task(&app, &u, project_id, "Write spec").await;
    assign(&app, &u, task_id, v_id).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/tasks/{task_id}/log-time"),
        &v,
        log_body("2026-08-26T09:00:00Z", "2026-08-26T10:30:00Z"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // The admin sees the assignee's entry without any filter.
    let response = get_auth(app.clone(), &format!("/api/v1/tasks/{task_id}/logs"), &u).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["user_id"], v_id);

    // The assignee asking for their own rows gets the same single entry.
    let response = get_auth(
        app.clone(),
        &format!("/api/v1/tasks/{task_id}/logs?only_mine=true"),
        &v,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    // A user with no membership cannot read the task at all.
    let response = get_auth(app, &format!("/api/v1/tasks/{task_id}"), &w).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logs_survive_reassignment(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_id, owner) = register_and_login(&app, "owner").await;
    let (worker_id, worker) = register_and_login(&app, "worker").await;
    let project_id = create_project(&app, &owner, "Launch").await;
    let task_id = create_task(&app, &owner, project_id, "Write spec").await;

    assign(&app, &owner, task_id, worker_id).await;
    post_json_auth(
        app.clone(),
        &format!("/api/v1/tasks/{task_id}/log-time"),
        &worker,
        log_body("2026-08-26T09:00:00Z", "2026-08-26T10:00:00Z"),
    )
    .await;

    // Reassignment does not rewrite or hide the worker's earlier log.
    assign(&app, &owner, task_id, owner_id).await;
    let response = get_auth(app, &format!("/api/v1/tasks/{task_id}/logs"), &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap()[0]["user_id"], worker_id);
}
