//! Domain error type shared across the workspace.
//!
//! Variant messages are complete sentences written for the API client; the
//! HTTP layer renders them verbatim, so no variant prefixes its message.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    /// A grant that already exists. Distinct from `Conflict` so clients can
    /// tell a repeated admin grant apart from other uniqueness conflicts.
    #[error("{0}")]
    AlreadyGranted(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
