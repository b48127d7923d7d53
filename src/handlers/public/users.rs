// handlers/public/users.rs - POST /api/users handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::auth::password::hash_password;
use crate::database::{NewUser, StoreError};
use crate::error::{ApiError, ApiResult};
use crate::handlers::validate::Validator;
use crate::handlers::{blocking, TokenResponse};
use crate::state::AppState;

const USER_EXISTS_MSG: &str = "User already exists";
const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// POST /api/users - Register a new account and receive a token
///
/// Input: `{ "name": "string", "email": "string", "password": "string" }`
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(payload) = payload?;

    let mut v = Validator::new();
    let name = v.required("name", payload.name.as_deref(), "Name is required");
    let email = v.email("email", payload.email.as_deref(), "Please include a valid email");
    let password = v.min_length(
        "password",
        payload.password.as_deref(),
        MIN_PASSWORD_LENGTH,
        "Please enter a password with 6 or more characters",
    );
    v.finish()?;
    let (Some(name), Some(email), Some(password)) = (name, email, password) else {
        return Err(ApiError::InternalServerError);
    };

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::rejected(USER_EXISTS_MSG));
    }

    let password_hash = blocking(move || hash_password(&password)).await??;

    let user = match state.users.insert(NewUser::new(name, &email, password_hash)).await {
        Ok(user) => user,
        // Lost a race with a concurrent registration of the same email
        Err(StoreError::Conflict(_)) => return Err(ApiError::rejected(USER_EXISTS_MSG)),
        Err(e) => return Err(e.into()),
    };

    let token = state.tokens.issue(user.id)?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(TokenResponse { token }))
}
