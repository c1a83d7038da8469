//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use taskflow_core::audit::Auditable;
use taskflow_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: Timestamp,
}

impl Auditable for User {
    const TABLE: &'static str = "users";

    fn key_values(&self) -> String {
        format!("id={}", self.id)
    }

    fn audit_fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", json!(self.id)),
            ("username", json!(self.username)),
            ("display_name", json!(self.display_name)),
            ("email", json!(self.email)),
            // Listed so the descriptor set is complete; the recorder's fixed
            // redaction list strips it from every value map.
            ("password_hash", json!(self.password_hash)),
            ("created_at", json!(self.created_at)),
        ]
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
}
