use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{Claims, TokenCodec};
use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the bearer token
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Authenticated user context extracted from the token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

impl TryFrom<Claims> for AuthUser {
    type Error = ApiError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: claims.subject()?,
        })
    }
}

/// Token middleware: rejects the request or injects `AuthUser` into its extensions
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = authenticate(request.headers(), &state.tokens)?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Resolve the caller from request headers
pub fn authenticate(headers: &HeaderMap, tokens: &TokenCodec) -> Result<AuthUser, ApiError> {
    let token = extract_token_from_headers(headers)?.ok_or(ApiError::Unauthenticated)?;

    let claims = tokens.decode(token).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        ApiError::from(e)
    })?;

    AuthUser::try_from(claims)
}

/// Extract the raw token. `Ok(None)` when the header is missing or blank.
fn extract_token_from_headers(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(value) = headers.get(AUTH_TOKEN_HEADER) else {
        return Ok(None);
    };

    let token = value.to_str().map_err(|_| ApiError::InvalidToken)?.trim();
    if token.is_empty() {
        return Ok(None);
    }
    Ok(Some(token))
}
