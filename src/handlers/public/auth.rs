// handlers/public/auth.rs - POST /api/auth handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::auth::password::{verify_against_dummy, verify_password};
use crate::error::{ApiError, ApiResult};
use crate::handlers::validate::Validator;
use crate::handlers::{blocking, TokenResponse};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// POST /api/auth - Authenticate user and receive a token
///
/// Input: `{ "email": "string", "password": "string" }`
/// Output: `{ "token": "eyJhbGciOiJIUzI1NiI..." }`
///
/// Unknown email and wrong password produce the identical
/// `{ "errors": [{ "msg": "Invalid Credentials" }] }` and cost the same
/// Argon2 run.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(payload) = payload?;

    let mut v = Validator::new();
    let email = v.email("email", payload.email.as_deref(), "Please include a valid email");
    let password = match payload.password {
        Some(p) if !p.is_empty() => Some(p),
        _ => {
            v.fail("password", "Password is required");
            None
        }
    };
    v.finish()?;
    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::InternalServerError);
    };

    let user = state.users.find_by_email(&email).await?;

    let (user_id, matched) = match user {
        Some(user) => {
            let hash = user.password_hash;
            let matched = blocking(move || verify_password(&password, &hash)).await?;
            (Some(user.id), matched)
        }
        None => (None, blocking(move || verify_against_dummy(&password)).await?),
    };

    let user_id = match (user_id, matched) {
        (Some(id), true) => id,
        _ => {
            tracing::warn!("Login rejected");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let token = state.tokens.issue(user_id)?;
    tracing::info!(user_id = %user_id, "Login succeeded");

    Ok(Json(TokenResponse { token }))
}
