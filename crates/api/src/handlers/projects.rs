//! Project CRUD and admin membership management.
//!
//! Every mutation follows the same sequence: open a unit of work, load the
//! relationship snapshot, ask the policy engine, mutate, record the touched
//! entities, commit. The policy check happens inside the transaction so the
//! snapshot it judged cannot drift from the rows being mutated.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskflow_core::error::CoreError;
use taskflow_core::policy::{self, decide_project, ProjectAction};
use taskflow_core::types::{DbId, Timestamp};
use taskflow_db::models::project::{CreateProject, Project, ProjectAdmin, ProjectMember};
use taskflow_db::repositories::{ProjectRepo, TaskRepo, UserRepo};
use taskflow_db::uow::UnitOfWork;
use taskflow_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminGrantRequest {
    pub user_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: Timestamp,
    pub admins: Vec<ProjectAdmin>,
}

/// Join a project row with its creator's username and admin list.
async fn project_response(pool: &DbPool, project: Project) -> AppResult<ProjectResponse> {
    let creator = UserRepo::find_by_id(pool, project.created_by).await?;
    let admins = ProjectRepo::list_admins(pool, project.id).await?;
    Ok(ProjectResponse {
        id: project.id,
        title: project.title,
        description: project.description,
        created_by: creator.map(|u| u.username).unwrap_or_default(),
        created_at: project.created_at,
        admins,
    })
}

/// GET /projects
///
/// Lists the projects the caller created or administers; no other projects
/// are visible in any form.
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<ProjectResponse>>> {
    let projects = ProjectRepo::list_visible(&state.pool, user.user_id).await?;
    let mut responses = Vec::with_capacity(projects.len());
    for project in projects {
        responses.push(project_response(&state.pool, project).await?);
    }
    Ok(Json(responses))
}

/// POST /projects
///
/// The creator is granted an Admin membership in the same transaction; both
/// the project and the membership are audited.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ProjectRequest>,
) -> AppResult<(StatusCode, Json<ProjectResponse>)> {
    input.validate()?;
    let create = CreateProject {
        title: input.title,
        description: input.description,
    };

    let mut uow = UnitOfWork::begin(&state.pool, user.user_id).await?;
    let project = ProjectRepo::create(uow.conn(), user.user_id, &create).await?;
    let member = ProjectRepo::add_member(uow.conn(), project.id, user.user_id, user.user_id).await?;
    uow.changes().record_create(&project);
    uow.changes().record_create(&member);
    uow.commit().await?;

    tracing::info!(project_id = project.id, user_id = user.user_id, "project created");
    let response = project_response(&state.pool, project).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /projects/{id}
///
/// Outsiders get the same 404 whether the project is hidden or absent.
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectResponse>> {
    let mut conn = state.pool.acquire().await?;
    let relations = ProjectRepo::relations(&mut conn, id)
        .await?
        .ok_or(policy::PROJECT_NOT_VISIBLE)?;
    decide_project(user.user_id, &relations, ProjectAction::Read).check()?;

    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(policy::PROJECT_NOT_VISIBLE)?;
    Ok(Json(project_response(&state.pool, project).await?))
}

/// PUT /projects/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ProjectRequest>,
) -> AppResult<Json<ProjectResponse>> {
    input.validate()?;

    let mut uow = UnitOfWork::begin(&state.pool, user.user_id).await?;
    let relations = ProjectRepo::relations(uow.conn(), id)
        .await?
        .ok_or(policy::PROJECT_UPDATE_DENIED)?;
    decide_project(user.user_id, &relations, ProjectAction::Update).check()?;

    let before = ProjectRepo::find_by_id(&mut *uow.conn(), id)
        .await?
        .ok_or(policy::PROJECT_UPDATE_DENIED)?;
    let after = ProjectRepo::update(
        uow.conn(),
        id,
        &input.title,
        input.description.as_deref(),
        user.user_id,
    )
    .await?
    .ok_or(policy::PROJECT_UPDATE_DENIED)?;
    uow.changes().record_update(&before, &after);
    uow.commit().await?;

    Ok(Json(project_response(&state.pool, after).await?))
}

/// DELETE /projects/{id}
///
/// Tasks and memberships are deleted explicitly in the same transaction so
/// each removed row shows up in the audit trail; nothing relies on database
/// cascades.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut uow = UnitOfWork::begin(&state.pool, user.user_id).await?;
    let relations = ProjectRepo::relations(uow.conn(), id)
        .await?
        .ok_or(policy::PROJECT_DELETE_DENIED)?;
    decide_project(user.user_id, &relations, ProjectAction::Delete).check()?;

    let project = ProjectRepo::find_by_id(&mut *uow.conn(), id)
        .await?
        .ok_or(policy::PROJECT_DELETE_DENIED)?;
    let tasks = TaskRepo::list_rows_for_project(&mut *uow.conn(), id).await?;
    let members = ProjectRepo::list_members(&mut *uow.conn(), id).await?;

    for task in &tasks {
        uow.changes().record_delete(task);
    }
    for member in &members {
        uow.changes().record_delete(member);
    }
    uow.changes().record_delete(&project);

    TaskRepo::delete_for_project(uow.conn(), id).await?;
    ProjectRepo::remove_members_for_project(uow.conn(), id).await?;
    ProjectRepo::delete(uow.conn(), id).await?;
    uow.commit().await?;

    tracing::info!(
        project_id = id,
        tasks = tasks.len(),
        members = members.len(),
        "project deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// POST /projects/{id}/admins
pub async fn add_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AdminGrantRequest>,
) -> AppResult<(StatusCode, Json<ProjectMember>)> {
    let mut uow = UnitOfWork::begin(&state.pool, user.user_id).await?;
    let relations = ProjectRepo::relations(uow.conn(), id)
        .await?
        .ok_or(policy::PROJECT_MANAGE_ADMINS_DENIED)?;
    decide_project(user.user_id, &relations, ProjectAction::ManageAdmins).check()?;

    if UserRepo::find_by_id(&mut *uow.conn(), input.user_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::Validation(
            "User not found.".to_string(),
        )));
    }
    if ProjectRepo::find_member(&mut *uow.conn(), id, input.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::AlreadyGranted(
            "User is already an admin of this project.".to_string(),
        )));
    }

    let member = ProjectRepo::add_member(uow.conn(), id, input.user_id, user.user_id).await?;
    uow.changes().record_create(&member);
    uow.commit().await?;

    Ok((StatusCode::CREATED, Json(member)))
}

/// DELETE /projects/{id}/admins
///
/// The creator's own membership cannot be revoked through this path.
pub async fn remove_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AdminGrantRequest>,
) -> AppResult<StatusCode> {
    let mut uow = UnitOfWork::begin(&state.pool, user.user_id).await?;
    let relations = ProjectRepo::relations(uow.conn(), id)
        .await?
        .ok_or(policy::PROJECT_MANAGE_ADMINS_DENIED)?;
    decide_project(user.user_id, &relations, ProjectAction::ManageAdmins).check()?;

    if input.user_id == relations.creator_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "The project creator cannot be removed.".to_string(),
        )));
    }

    let member = ProjectRepo::find_member(&mut *uow.conn(), id, input.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound(
                "User is not an admin of this project.".to_string(),
            ))
        })?;

    uow.changes().record_delete(&member);
    ProjectRepo::remove_member(uow.conn(), id, input.user_id).await?;
    uow.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
