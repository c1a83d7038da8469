//! Repository for the `users` table.

use sqlx::{PgConnection, PgExecutor};
use taskflow_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, display_name, email, password_hash, created_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(conn: &mut PgConnection, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, display_name, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.display_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(conn)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        executor: impl PgExecutor<'_>,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(executor)
            .await
    }

    /// List users whose username contains `search` (all users when absent),
    /// ordered by username.
    pub async fn search(
        executor: impl PgExecutor<'_>,
        search: Option<&str>,
    ) -> Result<Vec<User>, sqlx::Error> {
        match search {
            Some(term) if !term.trim().is_empty() => {
                let query = format!(
                    "SELECT {COLUMNS} FROM users
                     WHERE username LIKE '%' || $1 || '%'
                     ORDER BY username"
                );
                sqlx::query_as::<_, User>(&query)
                    .bind(term.trim())
                    .fetch_all(executor)
                    .await
            }
            _ => {
                let query = format!("SELECT {COLUMNS} FROM users ORDER BY username");
                sqlx::query_as::<_, User>(&query).fetch_all(executor).await
            }
        }
    }
}
