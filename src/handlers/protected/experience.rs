// handlers/protected/experience.rs - Work history entries on the caller's profile

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::{Experience, ListItem, Profile, ProfileList};
use crate::error::{ApiError, ApiResult};
use crate::handlers::validate::{non_blank, Validator};
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ExperienceRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl ExperienceRequest {
    fn into_item(self) -> Result<Experience, ApiError> {
        let mut v = Validator::new();
        let title = v.required("title", self.title.as_deref(), "Title is required");
        let company = v.required("company", self.company.as_deref(), "Company is required");
        let from = v.required_date("from", self.from.as_deref(), "From date is required");
        let to = v.optional_date("to", self.to.as_deref());
        v.finish()?;

        let (Some(title), Some(company), Some(from)) = (title, company, from) else {
            return Err(ApiError::InternalServerError);
        };

        Ok(Experience {
            id: Uuid::new_v4(),
            title,
            company,
            location: non_blank(self.location.as_deref()),
            from,
            // An ongoing position has no end date.
            to: if self.current { None } else { to },
            current: self.current,
            description: non_blank(self.description.as_deref()),
        })
    }
}

/// PUT /api/profile/experience - Prepend an experience entry
pub async fn add_experience(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<ExperienceRequest>, JsonRejection>,
) -> ApiResult<Json<Profile>> {
    let Json(payload) = payload?;
    let item = payload.into_item()?;

    let profile = state
        .profiles
        .append_list_item(auth.id, ListItem::Experience(item))
        .await?;
    Ok(Json(profile))
}

/// DELETE /api/profile/experience/:exp_id - Remove an experience entry
pub async fn remove_experience(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(exp_id): Path<String>,
) -> ApiResult<Json<Profile>> {
    let exp_id = Uuid::parse_str(&exp_id).map_err(|_| ApiError::not_found("Experience not found"))?;

    let profile = state
        .profiles
        .remove_list_item(auth.id, ProfileList::Experience, exp_id)
        .await?;
    Ok(Json(profile))
}
