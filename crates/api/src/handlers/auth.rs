//! Registration and login.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskflow_core::audit::ChangeSet;
use taskflow_core::error::CoreError;
use taskflow_db::models::user::{CreateUser, UserResponse};
use taskflow_db::repositories::{AuditLogRepo, UserRepo};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{check_password_strength, hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    pub password: String,
    #[validate(length(max = 128))]
    pub display_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// POST /auth/register
///
/// The created account is itself audited. Registration is the one operation
/// whose actor only exists after the insert, so it drives the transaction
/// directly instead of going through a [`UnitOfWork`], stamping the audit row
/// with the new user's own ID.
///
/// [`UnitOfWork`]: taskflow_db::uow::UnitOfWork
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.validate()?;
    check_password_strength(&input.password)?;

    if UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Username already exists.".to_string(),
        )));
    }

    let create = CreateUser {
        display_name: input.display_name.unwrap_or_else(|| input.username.clone()),
        email: input.email.unwrap_or_default(),
        username: input.username,
        password_hash: hash_password(&input.password)?,
    };

    let mut tx = state.pool.begin().await?;
    let user = UserRepo::create(&mut tx, &create).await?;
    let mut changes = ChangeSet::new();
    changes.record_create(&user);
    for entry in changes.into_entries() {
        AuditLogRepo::insert(&mut tx, user.id, &entry).await?;
    }
    tx.commit().await?;

    tracing::info!(user_id = user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid credentials.".to_string()))
        })?;

    if !verify_password(&input.password, &user.password_hash)? {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials.".to_string(),
        )));
    }

    let config = &state.config.jwt;
    let access_token = generate_access_token(user.id, &user.username, config)?;
    tracing::info!(user_id = user.id, "user logged in");
    Ok(Json(LoginResponse {
        access_token,
        expires_in: config.access_token_expiry_mins * 60,
        user: user.into(),
    }))
}
