//! Time logging against tasks.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskflow_core::error::CoreError;
use taskflow_core::policy::{self, decide_time_log, TaskRelations, TimeLogAction};
use taskflow_core::types::{DbId, Timestamp};
use taskflow_db::models::time_log::{CreateTimeLog, TimeLogDetail};
use taskflow_db::repositories::{ProjectRepo, TaskRepo, TimeLogRepo};
use taskflow_db::uow::UnitOfWork;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LogTimeRequest {
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct ListLogsQuery {
    #[serde(default)]
    pub only_mine: bool,
}

/// POST /tasks/{id}/log-time
///
/// Only the current assignee may log time. A task that does not exist gets
/// the same denial as one the caller is not assigned to.
pub async fn log_time(
    State(state): State<AppState>,
    user: AuthUser,
    Path(task_id): Path<DbId>,
    Json(input): Json<LogTimeRequest>,
) -> AppResult<(StatusCode, Json<TimeLogDetail>)> {
    if input.end_time < input.start_time {
        return Err(AppError::Core(CoreError::Validation(
            "End time must not be before start time.".to_string(),
        )));
    }

    let mut uow = UnitOfWork::begin(&state.pool, user.user_id).await?;
    let task = TaskRepo::find_by_id(&mut *uow.conn(), task_id)
        .await?
        .ok_or(policy::TIME_LOG_CREATE_DENIED)?;
    let project = ProjectRepo::relations(uow.conn(), task.project_id)
        .await?
        .ok_or(policy::TIME_LOG_CREATE_DENIED)?;
    let relations = TaskRelations {
        project,
        assignee_id: task.assigned_to,
    };
    decide_time_log(user.user_id, &relations, TimeLogAction::Create).check()?;

    let create = CreateTimeLog {
        start_time: input.start_time,
        end_time: input.end_time,
    };
    let log = TimeLogRepo::create(uow.conn(), task_id, user.user_id, &create).await?;
    uow.changes().record_create(&log);
    uow.commit().await?;

    tracing::info!(time_log_id = log.id, task_id, user_id = user.user_id, "time logged");
    Ok((
        StatusCode::CREATED,
        Json(TimeLogDetail {
            id: log.id,
            start_time: log.start_time,
            end_time: log.end_time,
            user_id: log.user_id,
            username: user.username,
        }),
    ))
}

/// GET /tasks/{id}/logs?only_mine=true
pub async fn list_logs(
    State(state): State<AppState>,
    user: AuthUser,
    Path(task_id): Path<DbId>,
    Query(query): Query<ListLogsQuery>,
) -> AppResult<Json<Vec<TimeLogDetail>>> {
    let mut conn = state.pool.acquire().await?;
    let task = TaskRepo::find_by_id(&mut *conn, task_id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    let project = ProjectRepo::relations(&mut conn, task.project_id)
        .await?
        .ok_or(policy::TASK_NOT_FOUND)?;
    let relations = TaskRelations {
        project,
        assignee_id: task.assigned_to,
    };
    decide_time_log(user.user_id, &relations, TimeLogAction::Read).check()?;

    let only_user = query.only_mine.then_some(user.user_id);
    let logs = TimeLogRepo::list_for_task(&state.pool, task_id, only_user).await?;
    Ok(Json(logs))
}
