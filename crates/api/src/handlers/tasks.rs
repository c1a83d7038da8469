//! Task CRUD, status transitions and assignment.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sqlx::PgConnection;
use taskflow_core::error::CoreError;
use taskflow_core::policy::{self, decide_task, TaskAction, TaskRelations};
use taskflow_core::status::TaskStatus;
use taskflow_core::types::DbId;
use taskflow_db::models::task::{CreateTask, Task, TaskDetail};
use taskflow_db::repositories::{ProjectRepo, TaskRepo, UserRepo};
use taskflow_db::uow::UnitOfWork;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    pub project_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub new_status: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub user_id: DbId,
}

/// Load the relationship snapshot for an existing task.
async fn task_relations(
    conn: &mut PgConnection,
    task: &Task,
    missing: taskflow_core::policy::Denial,
) -> AppResult<TaskRelations> {
    let project = ProjectRepo::relations(conn, task.project_id)
        .await?
        .ok_or(missing)?;
    Ok(TaskRelations {
        project,
        assignee_id: task.assigned_to,
    })
}

/// GET /projects/{project_id}/tasks
pub async fn list_for_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<TaskDetail>>> {
    let mut conn = state.pool.acquire().await?;
    let project = ProjectRepo::relations(&mut conn, project_id)
        .await?
        .ok_or(policy::TASK_LIST_DENIED)?;
    let relations = TaskRelations {
        project,
        assignee_id: None,
    };
    decide_task(user.user_id, &relations, TaskAction::ListForProject).check()?;

    let tasks = TaskRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(tasks))
}

/// GET /tasks/my
pub async fn list_my(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<TaskDetail>>> {
    let tasks = TaskRepo::list_assigned_to(&state.pool, user.user_id).await?;
    Ok(Json(tasks))
}

/// GET /tasks/statuses
pub async fn statuses(_user: AuthUser) -> Json<Vec<&'static str>> {
    Json(TaskStatus::ALL.iter().map(TaskStatus::as_str).collect())
}

/// GET /tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<TaskDetail>> {
    let mut conn = state.pool.acquire().await?;
    let task = TaskRepo::find_by_id(&mut *conn, id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    let relations = task_relations(&mut conn, &task, policy::TASK_NOT_FOUND).await?;
    decide_task(user.user_id, &relations, TaskAction::Read).check()?;

    let detail = TaskRepo::find_detail_by_id(&state.pool, id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    Ok(Json(detail))
}

/// POST /tasks
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<TaskDetail>)> {
    input.validate()?;

    let mut uow = UnitOfWork::begin(&state.pool, user.user_id).await?;
    let project = ProjectRepo::relations(uow.conn(), input.project_id)
        .await?
        .ok_or(policy::TASK_CREATE_DENIED)?;
    let relations = TaskRelations {
        project,
        assignee_id: None,
    };
    decide_task(user.user_id, &relations, TaskAction::Create).check()?;

    let create = CreateTask {
        project_id: input.project_id,
        title: input.title,
        description: input.description,
    };
    let task = TaskRepo::create(uow.conn(), user.user_id, &create).await?;
    uow.changes().record_create(&task);
    uow.commit().await?;

    tracing::info!(task_id = task.id, project_id = task.project_id, "task created");
    let detail = TaskRepo::find_detail_by_id(&state.pool, task.id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// PUT /tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTaskRequest>,
) -> AppResult<Json<TaskDetail>> {
    input.validate()?;

    let mut uow = UnitOfWork::begin(&state.pool, user.user_id).await?;
    let before = TaskRepo::find_by_id(&mut *uow.conn(), id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    let relations = task_relations(uow.conn(), &before, policy::TASK_NOT_FOUND).await?;
    decide_task(user.user_id, &relations, TaskAction::Update).check()?;

    let after = TaskRepo::update_fields(
        uow.conn(),
        id,
        &input.title,
        input.description.as_deref(),
        user.user_id,
    )
    .await?
    .ok_or(policy::TASK_NOT_FOUND)?;
    uow.changes().record_update(&before, &after);
    uow.commit().await?;

    let detail = TaskRepo::find_detail_by_id(&state.pool, id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    Ok(Json(detail))
}

/// DELETE /tasks/{id}
///
/// Time logs hold a plain foreign key to tasks, so deleting a task that has
/// logs surfaces as a 409 instead of silently dropping history.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut uow = UnitOfWork::begin(&state.pool, user.user_id).await?;
    let task = TaskRepo::find_by_id(&mut *uow.conn(), id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    let relations = task_relations(uow.conn(), &task, policy::TASK_NOT_FOUND).await?;
    decide_task(user.user_id, &relations, TaskAction::Delete).check()?;

    uow.changes().record_delete(&task);
    TaskRepo::delete(uow.conn(), id).await?;
    uow.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /tasks/{id}/status
///
/// The status string is validated before anything is loaded; an unknown
/// status never reaches the policy check or the database.
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<TaskDetail>> {
    let status = TaskStatus::parse(&input.new_status)?;

    let mut uow = UnitOfWork::begin(&state.pool, user.user_id).await?;
    let before = TaskRepo::find_by_id(&mut *uow.conn(), id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    let relations = task_relations(uow.conn(), &before, policy::TASK_NOT_FOUND).await?;
    decide_task(user.user_id, &relations, TaskAction::UpdateStatus).check()?;

    let after = TaskRepo::update_status(uow.conn(), id, status.as_str(), user.user_id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    uow.changes().record_update(&before, &after);
    uow.commit().await?;

    let detail = TaskRepo::find_detail_by_id(&state.pool, id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    Ok(Json(detail))
}

/// PUT /tasks/{id}/assign
pub async fn assign(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AssignRequest>,
) -> AppResult<Json<TaskDetail>> {
    let mut uow = UnitOfWork::begin(&state.pool, user.user_id).await?;
    let before = TaskRepo::find_by_id(&mut *uow.conn(), id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    let relations = task_relations(uow.conn(), &before, policy::TASK_NOT_FOUND).await?;
    decide_task(user.user_id, &relations, TaskAction::Assign).check()?;

    if UserRepo::find_by_id(&mut *uow.conn(), input.user_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::Validation(
            "User not found.".to_string(),
        )));
    }

    let after = TaskRepo::set_assignee(uow.conn(), id, Some(input.user_id), user.user_id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    uow.changes().record_update(&before, &after);
    uow.commit().await?;

    let detail = TaskRepo::find_detail_by_id(&state.pool, id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    Ok(Json(detail))
}

/// PUT /tasks/{id}/unassign
pub async fn unassign(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<TaskDetail>> {
    let mut uow = UnitOfWork::begin(&state.pool, user.user_id).await?;
    let before = TaskRepo::find_by_id(&mut *uow.conn(), id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    let relations = task_relations(uow.conn(), &before, policy::TASK_NOT_FOUND).await?;
    decide_task(user.user_id, &relations, TaskAction::Unassign).check()?;

    let after = TaskRepo::set_assignee(uow.conn(), id, None, user.user_id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    uow.changes().record_update(&before, &after);
    uow.commit().await?;

    let detail = TaskRepo::find_detail_by_id(&state.pool, id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    Ok(Json(detail))
}
