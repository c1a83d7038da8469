//! Audit log entity model.
//!
//! Rows are append-only: there is no update DTO and no `updated_at`. Inserts
//! go through `AuditLogRepo::insert` from a derived
//! [`AuditEntry`](taskflow_core::audit::AuditEntry), never from user input.

use serde::Serialize;
use sqlx::FromRow;
use taskflow_core::types::{DbId, Timestamp};

/// A single audit log entry. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub table_name: String,
    /// Primary key of the described entity as `name=value` pairs.
    pub key_values: String,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    /// Comma-joined column names; empty for create/delete.
    pub changed_columns: String,
    pub user_id: DbId,
    pub audit_type: String,
    pub created_at: Timestamp,
}
