//! Project and project-membership entity models and DTOs.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use taskflow_core::audit::Auditable;
use taskflow_core::types::{DbId, Timestamp};

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_by: Option<DbId>,
    pub updated_at: Option<Timestamp>,
}

impl Auditable for Project {
    const TABLE: &'static str = "projects";

    fn key_values(&self) -> String {
        format!("id={}", self.id)
    }

    fn audit_fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", json!(self.id)),
            ("title", json!(self.title)),
            ("description", json!(self.description)),
            ("created_by", json!(self.created_by)),
            ("created_at", json!(self.created_at)),
            // updated_by / updated_at are deliberately not descriptors: the
            // audit row itself records who changed the entity and when, and
            // stamp churn must not turn a no-op update into an audit entry.
        ]
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub description: Option<String>,
}

/// A membership row from the `project_members` table (composite key).
///
/// Existence of a row grants Admin capability on the project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectMember {
    pub project_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
}

impl Auditable for ProjectMember {
    const TABLE: &'static str = "project_members";

    fn key_values(&self) -> String {
        format!("project_id={},user_id={}", self.project_id, self.user_id)
    }

    fn audit_fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("project_id", json!(self.project_id)),
            ("user_id", json!(self.user_id)),
            ("role", json!(self.role)),
            ("created_by", json!(self.created_by)),
            ("created_at", json!(self.created_at)),
        ]
    }
}

/// Admin summary used when assembling project responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectAdmin {
    pub user_id: DbId,
    pub username: String,
}
