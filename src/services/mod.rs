pub mod github;

pub use github::{GithubClient, GithubError, Repo};
