// handlers/protected/auth.rs - GET /api/auth handler

use axum::{extract::State, Extension, Json};

use crate::database::User;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /api/auth - The authenticated user, without credential fields
pub async fn current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<User>> {
    // A valid token can outlive its account; there is no revocation.
    let user = state
        .users
        .find_by_id(auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user))
}
