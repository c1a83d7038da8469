//! Repository for the `projects` and `project_members` tables.

use sqlx::{PgConnection, PgExecutor};
use taskflow_core::policy::ProjectRelations;
use taskflow_core::types::DbId;

use crate::models::project::{CreateProject, Project, ProjectAdmin, ProjectMember};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, created_by, created_at, updated_by, updated_at";

const MEMBER_COLUMNS: &str = "project_id, user_id, role, created_by, created_at";

/// Provides CRUD operations for projects and their admin memberships.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project stamped with its creator.
    pub async fn create(
        conn: &mut PgConnection,
        creator_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (title, description, created_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(creator_id)
            .fetch_one(conn)
            .await
    }

    /// Find a project by internal ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List every project the user created or holds an Admin membership on.
    pub async fn list_visible(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects p
             WHERE p.created_by = $1
                OR EXISTS (SELECT 1 FROM project_members pm
                           WHERE pm.project_id = p.id AND pm.user_id = $1)
             ORDER BY p.created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(executor)
            .await
    }

    /// Replace a project's title and description, stamping the updater.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        title: &str,
        description: Option<&str>,
        updated_by: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = $2,
                description = $3,
                updated_by = $4,
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(title)
            .bind(description)
            .bind(updated_by)
            .fetch_optional(conn)
            .await
    }

    /// Delete a project row. Tasks and memberships must already be gone.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load the relationship snapshot the policy engine evaluates against:
    /// the creator plus every admin member.
    pub async fn relations(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<Option<ProjectRelations>, sqlx::Error> {
        let creator: Option<(DbId,)> =
            sqlx::query_as("SELECT created_by FROM projects WHERE id = $1")
                .bind(project_id)
                .fetch_optional(&mut *conn)
                .await?;
        let Some((creator_id,)) = creator else {
            return Ok(None);
        };

        let admin_ids: Vec<(DbId,)> = sqlx::query_as(
            "SELECT user_id FROM project_members WHERE project_id = $1 AND role = 'Admin'",
        )
        .bind(project_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(Some(ProjectRelations {
            creator_id,
            admin_ids: admin_ids.into_iter().map(|(id,)| id).collect(),
        }))
    }

    // -----------------------------------------------------------------------
    // Membership operations
    // -----------------------------------------------------------------------

    /// Insert an Admin membership, returning the created row.
    pub async fn add_member(
        conn: &mut PgConnection,
        project_id: DbId,
        user_id: DbId,
        granted_by: DbId,
    ) -> Result<ProjectMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_members (project_id, user_id, role, created_by)
             VALUES ($1, $2, 'Admin', $3)
             RETURNING {MEMBER_COLUMNS}"
        );
        sqlx::query_as::<_, ProjectMember>(&query)
            .bind(project_id)
            .bind(user_id)
            .bind(granted_by)
            .fetch_one(conn)
            .await
    }

    /// Find a membership row for the (project, user) pair.
    pub async fn find_member(
        executor: impl PgExecutor<'_>,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ProjectMember>, sqlx::Error> {
        let query = format!(
            "SELECT {MEMBER_COLUMNS} FROM project_members
             WHERE project_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, ProjectMember>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// List every membership row of a project.
    pub async fn list_members(
        executor: impl PgExecutor<'_>,
        project_id: DbId,
    ) -> Result<Vec<ProjectMember>, sqlx::Error> {
        let query = format!(
            "SELECT {MEMBER_COLUMNS} FROM project_members
             WHERE project_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, ProjectMember>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// List a project's admins with usernames for response assembly.
    pub async fn list_admins(
        executor: impl PgExecutor<'_>,
        project_id: DbId,
    ) -> Result<Vec<ProjectAdmin>, sqlx::Error> {
        sqlx::query_as::<_, ProjectAdmin>(
            "SELECT pm.user_id, u.username
             FROM project_members pm
             JOIN users u ON u.id = pm.user_id
             WHERE pm.project_id = $1 AND pm.role = 'Admin'
             ORDER BY u.username",
        )
        .bind(project_id)
        .fetch_all(executor)
        .await
    }

    /// Delete every membership row of a project, returning how many went away.
    pub async fn remove_members_for_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_members WHERE project_id = $1")
            .bind(project_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete a membership row.
    pub async fn remove_member(
        conn: &mut PgConnection,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
