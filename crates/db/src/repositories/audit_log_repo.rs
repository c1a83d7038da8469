//! Repository for the append-only `audit_logs` table.

use sqlx::{PgConnection, PgExecutor};
use taskflow_core::audit::AuditEntry;
use taskflow_core::types::DbId;

use crate::models::audit_log::AuditLog;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, table_name, key_values, old_values, new_values, \
                       changed_columns, user_id, audit_type, created_at";

/// Provides insert and query operations for audit rows. There is no update
/// or delete: the trail is append-only.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Persist one derived audit entry on behalf of `user_id`.
    pub async fn insert(
        conn: &mut PgConnection,
        user_id: DbId,
        entry: &AuditEntry,
    ) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs
                (table_name, key_values, old_values, new_values, changed_columns, user_id, audit_type)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(entry.table_name)
            .bind(&entry.key_values)
            .bind(&entry.old_values)
            .bind(&entry.new_values)
            .bind(entry.changed_columns.join(","))
            .bind(user_id)
            .bind(entry.kind.as_str())
            .fetch_one(conn)
            .await
    }

    /// List every audit row for a table, oldest first.
    pub async fn list_for_table(
        executor: impl PgExecutor<'_>,
        table_name: &str,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM audit_logs WHERE table_name = $1 ORDER BY id");
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(table_name)
            .fetch_all(executor)
            .await
    }

    /// List every audit row describing one entity instance, oldest first.
    pub async fn list_for_entity(
        executor: impl PgExecutor<'_>,
        table_name: &str,
        key_values: &str,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs
             WHERE table_name = $1 AND key_values = $2 ORDER BY id"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(table_name)
            .bind(key_values)
            .fetch_all(executor)
            .await
    }
}
