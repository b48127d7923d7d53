use reqwest::{header, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::GithubConfig;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub user not found")]
    NotFound,

    #[error("invalid GitHub API base: {0}")]
    InvalidBase(String),

    #[error("GitHub responded with {0}")]
    Upstream(StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Subset of the GitHub repository payload shown on profile pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub id: u64,
    pub name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
}

/// Client for the public GitHub REST API
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    config: GithubConfig,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Result<Self, GithubError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http, config })
    }

    /// GitHub logins: 1-39 characters of ASCII alphanumerics and hyphens.
    pub fn is_valid_username(username: &str) -> bool {
        !username.is_empty()
            && username.len() <= 39
            && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    }

    pub fn repos_url(&self, username: &str) -> Result<Url, GithubError> {
        let mut url =
            Url::parse(&self.config.api_base).map_err(|e| GithubError::InvalidBase(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GithubError::InvalidBase(self.config.api_base.clone()))?
            .pop_if_empty()
            .extend(["users", username, "repos"]);
        url.query_pairs_mut()
            .append_pair("per_page", &self.config.repo_limit.to_string())
            .append_pair("sort", "created")
            .append_pair("direction", "asc");
        Ok(url)
    }

    /// First `repo_limit` public repositories of `username`, oldest created first.
    pub async fn user_repos(&self, username: &str) -> Result<Vec<Repo>, GithubError> {
        if !Self::is_valid_username(username) {
            return Err(GithubError::NotFound);
        }

        let mut request = self
            .http
            .get(self.repos_url(username)?)
            .header(header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        match response.status() {
            StatusCode::OK => Ok(response.json::<Vec<Repo>>().await?),
            StatusCode::NOT_FOUND => Err(GithubError::NotFound),
            other => Err(GithubError::Upstream(other)),
        }
    }
}
