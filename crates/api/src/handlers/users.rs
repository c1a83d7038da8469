//! User lookup for pickers (assignees, admin grants).

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use taskflow_db::models::user::UserResponse;
use taskflow_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserSearchQuery {
    pub search: Option<String>,
}

/// GET /users?search=term
pub async fn search(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<UserSearchQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::search(&state.pool, query.search.as_deref()).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
