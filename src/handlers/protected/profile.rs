// handlers/protected/profile.rs - The caller's own profile

use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde::Deserialize;

use crate::database::{Profile, ProfileFields, Social};
use crate::error::{ApiError, ApiResult};
use crate::handlers::validate::{non_blank, split_list, Validator};
use crate::handlers::MessageResponse;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Skills arrive either as "rust, sql, go" or as a JSON array
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    Text(String),
    List(Vec<String>),
}

impl SkillsInput {
    fn into_list(self) -> Vec<String> {
        match self {
            SkillsInput::Text(raw) => split_list(&raw),
            SkillsInput::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub githubusername: Option<String>,
    #[serde(default)]
    pub skills: Option<SkillsInput>,
    #[serde(default)]
    pub youtube: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
}

impl ProfileRequest {
    fn into_fields(self) -> Result<ProfileFields, ApiError> {
        let mut v = Validator::new();
        let status = v.required("status", self.status.as_deref(), "Status is required");
        let skills = self.skills.map(SkillsInput::into_list).unwrap_or_default();
        if skills.is_empty() {
            v.fail("skills", "Skills is required");
        }
        v.finish()?;

        Ok(ProfileFields {
            company: non_blank(self.company.as_deref()),
            website: non_blank(self.website.as_deref()),
            location: non_blank(self.location.as_deref()),
            status: status.unwrap_or_default(),
            skills,
            bio: non_blank(self.bio.as_deref()),
            githubusername: non_blank(self.githubusername.as_deref()),
            social: Social {
                youtube: non_blank(self.youtube.as_deref()),
                twitter: non_blank(self.twitter.as_deref()),
                instagram: non_blank(self.instagram.as_deref()),
                linkedin: non_blank(self.linkedin.as_deref()),
                facebook: non_blank(self.facebook.as_deref()),
            },
        })
    }
}

/// GET /api/profile/me - The caller's profile
pub async fn my_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Profile>> {
    let profile = state
        .profiles
        .find_by_subject(auth.id)
        .await?
        .ok_or_else(|| ApiError::bad_request("There is no profile for the user"))?;

    Ok(Json(profile))
}

/// POST /api/profile - Create the caller's profile or update it in place
///
/// Optional fields left out of an update keep their stored values;
/// `status`, `skills` and the social links are replaced.
pub async fn upsert_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> ApiResult<Json<Profile>> {
    let Json(payload) = payload?;
    let fields = payload.into_fields()?;

    let profile = state.profiles.upsert(auth.id, fields).await?;
    tracing::debug!(user_id = %auth.id, profile_id = %profile.id, "Profile saved");

    Ok(Json(profile))
}

/// DELETE /api/profile - Remove the caller's profile and account
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<MessageResponse>> {
    state.profiles.delete(auth.id).await?;
    state.users.delete(auth.id).await?;
    tracing::info!(user_id = %auth.id, "User deleted");

    Ok(Json(MessageResponse { msg: "User deleted" }))
}
