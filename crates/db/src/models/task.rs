//! Task entity model and DTOs.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use taskflow_core::audit::Auditable;
use taskflow_core::types::{DbId, Timestamp};

/// A task row from the `tasks` table.
///
/// `status` holds a member of the closed set validated by
/// `taskflow_core::status::TaskStatus`; `project_id` never changes after
/// creation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub project_id: DbId,
    pub assigned_to: Option<DbId>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_by: Option<DbId>,
    pub updated_at: Option<Timestamp>,
}

impl Auditable for Task {
    const TABLE: &'static str = "tasks";

    fn key_values(&self) -> String {
        format!("id={}", self.id)
    }

    fn audit_fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", json!(self.id)),
            ("title", json!(self.title)),
            ("description", json!(self.description)),
            ("status", json!(self.status)),
            ("project_id", json!(self.project_id)),
            ("assigned_to", json!(self.assigned_to)),
            ("created_by", json!(self.created_by)),
            ("created_at", json!(self.created_at)),
            // Stamp columns stay out of the descriptors; see [`Project`].
        ]
    }
}

/// DTO for creating a new task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
}

/// A task row joined with the usernames its API representation needs.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskDetail {
    pub id: DbId,
    pub project_id: DbId,
    pub project_title: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub assigned_to_id: Option<DbId>,
    pub assigned_to: Option<String>,
    pub created_by: String,
    pub created_at: Timestamp,
}
