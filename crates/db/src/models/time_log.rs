//! Time log entity model and DTOs.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use taskflow_core::audit::Auditable;
use taskflow_core::types::{DbId, Timestamp};

/// A time log row from the `time_logs` table.
///
/// `user_id` is the task assignee at the time the log was written; it is not
/// revalidated if the task is later reassigned.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimeLog {
    pub id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub created_at: Timestamp,
}

impl Auditable for TimeLog {
    const TABLE: &'static str = "time_logs";

    fn key_values(&self) -> String {
        format!("id={}", self.id)
    }

    fn audit_fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", json!(self.id)),
            ("task_id", json!(self.task_id)),
            ("user_id", json!(self.user_id)),
            ("start_time", json!(self.start_time)),
            ("end_time", json!(self.end_time)),
            ("created_at", json!(self.created_at)),
        ]
    }
}

/// DTO for creating a new time log against a task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTimeLog {
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

/// A time log row joined with the logging user's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimeLogDetail {
    pub id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub user_id: DbId,
    pub username: String,
}
