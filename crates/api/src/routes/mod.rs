//! Route table, nested under `/api/v1`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{auth, projects, tasks, time_logs, users};
use crate::state::AppState;

pub mod health;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/projects", project_routes())
        .nest("/tasks", task_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/", get(users::search))
}

fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_mine).post(projects::create))
        .route(
            "/{id}",
            get(projects::get_by_id)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route(
            "/{id}/admins",
            post(projects::add_admin).delete(projects::remove_admin),
        )
        .route("/{id}/tasks", get(tasks::list_for_project))
}

fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(tasks::create))
        .route("/my", get(tasks::list_my))
        .route("/statuses", get(tasks::statuses))
        .route(
            "/{id}",
            get(tasks::get_by_id).put(tasks::update).delete(tasks::delete),
        )
        .route("/{id}/status", put(tasks::update_status))
        .route("/{id}/assign", put(tasks::assign))
        .route("/{id}/unassign", put(tasks::unassign))
        .route("/{id}/log-time", post(time_logs::log_time))
        .route("/{id}/logs", get(time_logs::list_logs))
}
