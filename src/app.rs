use axum::{
    extract::State,
    http::HeaderValue,
    middleware,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::error::{ApiError, ApiResult};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full application router with shared state attached
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(public::register))
        .route("/api/auth", post(public::login))
        .route("/api/profile", get(public::list_profiles))
        .route("/api/profile/user/:user_id", get(public::profile_by_user))
        .route("/api/profile/github/:username", get(public::github_repos))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth", get(protected::current_user))
        .route("/api/profile/me", get(protected::my_profile))
        .route(
            "/api/profile",
            post(protected::upsert_profile).delete(protected::delete_account),
        )
        .route("/api/profile/experience", put(protected::add_experience))
        .route("/api/profile/experience/:exp_id", delete(protected::remove_experience))
        .route("/api/profile/education", put(protected::add_education))
        .route("/api/profile/education/:edu_id", delete(protected::remove_education))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "devconnector-api",
        "version": version,
        "endpoints": {
            "users": "POST /api/users (public - register)",
            "auth": "POST /api/auth (public - login), GET /api/auth (protected)",
            "profile": "GET /api/profile, GET /api/profile/user/:user_id (public); GET /api/profile/me, POST/DELETE /api/profile (protected)",
            "experience": "PUT /api/profile/experience, DELETE /api/profile/experience/:exp_id (protected)",
            "education": "PUT /api/profile/education, DELETE /api/profile/education/:edu_id (protected)",
            "github": "GET /api/profile/github/:username (public)",
        },
        "auth_header": crate::middleware::AUTH_TOKEN_HEADER,
    }))
}

async fn health(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state.users.health_check().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable("Database unavailable")
    })?;

    Ok(Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "database": "ok"
    })))
}
