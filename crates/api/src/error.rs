//! API error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use taskflow_core::error::CoreError;
use taskflow_core::policy::{Denial, DenialKind};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        let reason = denial.reason.to_string();
        match denial.kind {
            DenialKind::Forbidden => AppError::Core(CoreError::Forbidden(reason)),
            DenialKind::NotFound => AppError::Core(CoreError::NotFound(reason)),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Core(core) => match core {
                CoreError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                CoreError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
                CoreError::AlreadyGranted(_) => (StatusCode::CONFLICT, "ALREADY_GRANTED"),
                CoreError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
                CoreError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                CoreError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// The message rendered to the client. Database and internal errors are
    /// replaced with a generic message so details never leak.
    fn public_message(&self) -> String {
        match self {
            AppError::Core(core) => core.to_string(),
            AppError::Database(err) => match classify_sqlx_error(err) {
                (StatusCode::NOT_FOUND, _) => "Resource not found".to_string(),
                (StatusCode::CONFLICT, _) => conflict_message(err),
                _ => "An internal error occurred".to_string(),
            },
            AppError::BadRequest(msg) => msg.clone(),
            AppError::InternalError(_) => "An internal error occurred".to_string(),
        }
    }
}

/// Map a sqlx error onto an HTTP status.
///
/// Unique violations (SQLSTATE 23505) and foreign key violations (23503)
/// surface as 409 so a duplicate username or a delete blocked by dependent
/// rows reads as a conflict rather than a server fault.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str) {
    match err {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") | Some("23503") => (StatusCode::CONFLICT, "CONFLICT"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
        },
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
    }
}

fn conflict_message(err: &sqlx::Error) -> String {
    if let sqlx::Error::Database(db_err) = err {
        match db_err.code().as_deref() {
            Some("23505") => {
                return "A record with the same unique value already exists".to_string();
            }
            Some("23503") => {
                return "The operation conflicts with related records".to_string();
            }
            _ => {}
        }
    }
    "Conflict".to_string()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let body = Json(json!({
            "error": self.public_message(),
            "code": code,
        }));
        (status, body).into_response()
    }
}
