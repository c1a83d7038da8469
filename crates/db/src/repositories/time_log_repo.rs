//! Repository for the `time_logs` table.

use sqlx::{PgConnection, PgExecutor};
use taskflow_core::types::DbId;

use crate::models::time_log::{CreateTimeLog, TimeLog, TimeLogDetail};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, task_id, user_id, start_time, end_time, created_at";

/// Provides operations for task time logs.
pub struct TimeLogRepo;

impl TimeLogRepo {
    /// Insert a new time log for the given task and user.
    pub async fn create(
        conn: &mut PgConnection,
        task_id: DbId,
        user_id: DbId,
        input: &CreateTimeLog,
    ) -> Result<TimeLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO time_logs (task_id, user_id, start_time, end_time)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimeLog>(&query)
            .bind(task_id)
            .bind(user_id)
            .bind(input.start_time)
            .bind(input.end_time)
            .fetch_one(conn)
            .await
    }

    /// List a task's logs with usernames, most recent start first.
    ///
    /// When `only_user` is set, the result is restricted to that user's rows
    /// (the "mine only" filter).
    pub async fn list_for_task(
        executor: impl PgExecutor<'_>,
        task_id: DbId,
        only_user: Option<DbId>,
    ) -> Result<Vec<TimeLogDetail>, sqlx::Error> {
        let base = "SELECT l.id, l.start_time, l.end_time, l.user_id, u.username
             FROM time_logs l
             JOIN users u ON u.id = l.user_id
             WHERE l.task_id = $1";
        match only_user {
            Some(user_id) => {
                let query = format!("{base} AND l.user_id = $2 ORDER BY l.start_time DESC");
                sqlx::query_as::<_, TimeLogDetail>(&query)
                    .bind(task_id)
                    .bind(user_id)
                    .fetch_all(executor)
                    .await
            }
            None => {
                let query = format!("{base} ORDER BY l.start_time DESC");
                sqlx::query_as::<_, TimeLogDetail>(&query)
                    .bind(task_id)
                    .fetch_all(executor)
                    .await
            }
        }
    }
}
