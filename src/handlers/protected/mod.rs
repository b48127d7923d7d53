// handlers/protected/mod.rs - Protected handlers (token required)
//
// Every route here sits behind `jwt_auth_middleware`, which places the
// caller's `AuthUser` in the request extensions before the handler runs.

pub mod auth;       // GET /api/auth
pub mod education;  // PUT/DELETE /api/profile/education
pub mod experience; // PUT/DELETE /api/profile/experience
pub mod profile;    // GET /api/profile/me, POST/DELETE /api/profile

pub use auth::current_user;
pub use education::{add_education, remove_education};
pub use experience::{add_experience, remove_experience};
pub use profile::{delete_account, my_profile, upsert_profile};
