// handlers/public/profile.rs - Read-only profile endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::database::Profile;
use crate::error::{ApiError, ApiResult};
use crate::services::Repo;
use crate::state::AppState;

/// GET /api/profile - All profiles
pub async fn list_profiles(State(state): State<AppState>) -> ApiResult<Json<Vec<Profile>>> {
    Ok(Json(state.profiles.list().await?))
}

/// GET /api/profile/user/:user_id - Profile owned by a user
///
/// A malformed id is indistinguishable from an unknown one.
pub async fn profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Profile>> {
    let not_found = || ApiError::not_found("Profile not found");

    let user_id = Uuid::parse_str(&user_id).map_err(|_| not_found())?;
    let profile = state.profiles.find_by_subject(user_id).await?.ok_or_else(not_found)?;

    Ok(Json(profile))
}

/// GET /api/profile/github/:username - Public repositories, oldest created first
pub async fn github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<Vec<Repo>>> {
    Ok(Json(state.github.user_repos(&username).await?))
}
