use std::sync::Arc;

use crate::auth::TokenCodec;
use crate::config::AppConfig;
use crate::database::{ProfileStore, UserStore};
use crate::services::{GithubClient, GithubError};

/// Shared handles cloned into every request. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: TokenCodec,
    pub users: Arc<dyn UserStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub github: GithubClient,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Result<Self, GithubError> {
        let tokens = TokenCodec::from_config(&config.security);
        let github = GithubClient::new(config.github.clone())?;

        Ok(Self {
            config: Arc::new(config),
            tokens,
            users,
            profiles,
            github,
        })
    }
}
