// handlers/protected/education.rs - Schooling entries on the caller's profile

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::{Education, ListItem, Profile, ProfileList};
use crate::error::{ApiError, ApiResult};
use crate::handlers::validate::{non_blank, Validator};
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct EducationRequest {
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub fieldofstudy: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl EducationRequest {
    fn into_item(self) -> Result<Education, ApiError> {
        let mut v = Validator::new();
        let school = v.required("school", self.school.as_deref(), "School is required");
        let degree = v.required("degree", self.degree.as_deref(), "Degree is required");
        let fieldofstudy =
            v.required("fieldofstudy", self.fieldofstudy.as_deref(), "Field of study is required");
        let from = v.required_date("from", self.from.as_deref(), "From date is required");
        let to = v.optional_date("to", self.to.as_deref());
        v.finish()?;

        let (Some(school), Some(degree), Some(fieldofstudy), Some(from)) =
            (school, degree, fieldofstudy, from)
        else {
            return Err(ApiError::InternalServerError);
        };

        Ok(Education {
            id: Uuid::new_v4(),
            school,
            degree,
            fieldofstudy,
            from,
            to: if self.current { None } else { to },
            current: self.current,
            description: non_blank(self.description.as_deref()),
        })
    }
}

/// PUT /api/profile/education - Prepend an education entry
pub async fn add_education(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<EducationRequest>, JsonRejection>,
) -> ApiResult<Json<Profile>> {
    let Json(payload) = payload?;
    let item = payload.into_item()?;

    let profile = state
        .profiles
        .append_list_item(auth.id, ListItem::Education(item))
        .await?;
    Ok(Json(profile))
}

/// DELETE /api/profile/education/:edu_id - Remove an education entry
pub async fn remove_education(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(edu_id): Path<String>,
) -> ApiResult<Json<Profile>> {
    let edu_id = Uuid::parse_str(&edu_id).map_err(|_| ApiError::not_found("Education not found"))?;

    let profile = state
        .profiles
        .remove_list_item(auth.id, ProfileList::Education, edu_id)
        .await?;
    Ok(Json(profile))
}
