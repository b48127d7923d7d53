// handlers/mod.rs - Two-tier handler architecture
//
// Public (no auth) → Protected (x-auth-token required)
pub mod public;    // Tier 1: login, registration, public profile reads
pub mod protected; // Tier 2: caller's own account and profile
pub mod validate;

use serde::Serialize;

use crate::error::{ApiError, ApiResult};

/// Body returned by login and registration
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Body for endpoints that only confirm an action
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: &'static str,
}

/// Run CPU-heavy work (Argon2) off the async workers
pub(crate) async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!("Blocking task failed: {}", e);
        ApiError::InternalServerError
    })
}
