//! Repository for the `tasks` table.

use sqlx::{PgConnection, PgExecutor};
use taskflow_core::types::DbId;

use crate::models::task::{CreateTask, Task, TaskDetail};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, status, project_id, assigned_to, \
                       created_by, created_at, updated_by, updated_at";

/// Joined columns for API-facing task rows.
const DETAIL_COLUMNS: &str = "t.id, t.project_id, p.title AS project_title, t.title, \
                              t.description, t.status, t.assigned_to AS assigned_to_id, \
                              a.username AS assigned_to, c.username AS created_by, t.created_at";

const DETAIL_JOINS: &str = "FROM tasks t
             JOIN projects p ON p.id = t.project_id
             JOIN users c ON c.id = t.created_by
             LEFT JOIN users a ON a.id = t.assigned_to";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task stamped with its creator. Status starts at `ToDo`.
    pub async fn create(
        conn: &mut PgConnection,
        creator_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (title, description, project_id, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.project_id)
            .bind(creator_id)
            .fetch_one(conn)
            .await
    }

    /// Find a task by internal ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a task with the joined names its API representation needs.
    pub async fn find_detail_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<TaskDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} {DETAIL_JOINS} WHERE t.id = $1");
        sqlx::query_as::<_, TaskDetail>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List every task of a project, newest first.
    pub async fn list_for_project(
        executor: impl PgExecutor<'_>,
        project_id: DbId,
    ) -> Result<Vec<TaskDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_JOINS}
             WHERE t.project_id = $1 ORDER BY t.created_at DESC"
        );
        sqlx::query_as::<_, TaskDetail>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// List every task currently assigned to a user, newest first.
    pub async fn list_assigned_to(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<Vec<TaskDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_JOINS}
             WHERE t.assigned_to = $1 ORDER BY t.created_at DESC"
        );
        sqlx::query_as::<_, TaskDetail>(&query)
            .bind(user_id)
            .fetch_all(executor)
            .await
    }

    /// List plain task rows of a project, for cascade deletion capture.
    pub async fn list_rows_for_project(
        executor: impl PgExecutor<'_>,
        project_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// Replace a task's title and description, stamping the updater.
    pub async fn update_fields(
        conn: &mut PgConnection,
        id: DbId,
        title: &str,
        description: Option<&str>,
        updated_by: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = $2,
                description = $3,
                updated_by = $4,
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(title)
            .bind(description)
            .bind(updated_by)
            .fetch_optional(conn)
            .await
    }

    /// Set a task's status, stamping the updater.
    pub async fn update_status(
        conn: &mut PgConnection,
        id: DbId,
        status: &str,
        updated_by: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                status = $2,
                updated_by = $3,
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(status)
            .bind(updated_by)
            .fetch_optional(conn)
            .await
    }

    /// Set or clear a task's assignee, stamping the updater.
    pub async fn set_assignee(
        conn: &mut PgConnection,
        id: DbId,
        assignee: Option<DbId>,
        updated_by: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                assigned_to = $2,
                updated_by = $3,
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(assignee)
            .bind(updated_by)
            .fetch_optional(conn)
            .await
    }

    /// Delete a task row.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every task of a project (cascade half of project deletion).
    pub async fn delete_for_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
