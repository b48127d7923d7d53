use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserSummary;

/// Profile as returned to clients, with the owner's public details embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user: UserSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub status: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub githubusername: Option<String>,
    pub social: Social,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Named lists inside a profile document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileList {
    Experience,
    Education,
}

impl ProfileList {
    /// Column holding the list. Only ever these two literals.
    pub fn column(self) -> &'static str {
        match self {
            ProfileList::Experience => "experience",
            ProfileList::Education => "education",
        }
    }

    pub fn item_label(self) -> &'static str {
        match self {
            ProfileList::Experience => "Experience",
            ProfileList::Education => "Education",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    Experience(Experience),
    Education(Education),
}

impl ListItem {
    pub fn list(&self) -> ProfileList {
        match self {
            ListItem::Experience(_) => ProfileList::Experience,
            ListItem::Education(_) => ProfileList::Education,
        }
    }
}

/// Writable profile fields. `None` optionals leave stored values untouched on update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFields {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: String,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub social: Social,
}

/// Stored form of a profile, without the joined user details.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDocument {
    pub id: Uuid,
    pub user_id: Uuid,
    pub fields: ProfileFields,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub created_at: DateTime<Utc>,
}

impl ProfileDocument {
    pub fn new(user_id: Uuid, fields: ProfileFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            fields,
            experience: Vec::new(),
            education: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn merge(&mut self, fields: ProfileFields) {
        let current = &mut self.fields;
        if fields.company.is_some() {
            current.company = fields.company;
        }
        if fields.website.is_some() {
            current.website = fields.website;
        }
        if fields.location.is_some() {
            current.location = fields.location;
        }
        if fields.bio.is_some() {
            current.bio = fields.bio;
        }
        if fields.githubusername.is_some() {
            current.githubusername = fields.githubusername;
        }
        current.status = fields.status;
        current.skills = fields.skills;
        current.social = fields.social;
    }

    pub fn prepend(&mut self, item: ListItem) {
        match item {
            ListItem::Experience(exp) => self.experience.insert(0, exp),
            ListItem::Education(edu) => self.education.insert(0, edu),
        }
    }

    /// Returns false when no item with `item_id` exists in `list`.
    pub fn remove(&mut self, list: ProfileList, item_id: Uuid) -> bool {
        match list {
            ProfileList::Experience => remove_by_id(&mut self.experience, item_id, |e| e.id),
            ProfileList::Education => remove_by_id(&mut self.education, item_id, |e| e.id),
        }
    }

    pub fn to_profile(&self, user: UserSummary) -> Profile {
        let fields = self.fields.clone();
        Profile {
            id: self.id,
            user,
            company: fields.company,
            website: fields.website,
            location: fields.location,
            status: fields.status,
            skills: fields.skills,
            bio: fields.bio,
            githubusername: fields.githubusername,
            social: fields.social,
            experience: self.experience.clone(),
            education: self.education.clone(),
            created_at: self.created_at,
        }
    }
}

fn remove_by_id<T>(items: &mut Vec<T>, item_id: Uuid, id_of: impl Fn(&T) -> Uuid) -> bool {
    match items.iter().position(|item| id_of(item) == item_id) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}
