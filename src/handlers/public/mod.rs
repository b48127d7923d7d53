// handlers/public/mod.rs - Public handlers (no authentication)
//
// Token acquisition and read-only profile endpoints.

pub mod auth;    // POST /api/auth - exchange credentials for a token
pub mod profile; // GET /api/profile, /api/profile/user/:user_id, /api/profile/github/:username
pub mod users;   // POST /api/users - register and receive a token

pub use auth::login;
pub use profile::{github_repos, list_profiles, profile_by_user};
pub use users::register;
