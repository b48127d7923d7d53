use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::manager::DatabaseManager;
use super::{
    profile_not_found, Education, Experience, ListItem, NewUser, Profile, ProfileFields,
    ProfileList, ProfileStore, Social, StoreError, User, UserStore, UserSummary,
};

const PROFILE_SELECT: &str = r#"
    SELECT
        p.id, p.user_id, p.company, p.website, p.location, p.status, p.skills,
        p.bio, p.githubusername, p.social, p.experience, p.education, p.created_at,
        u.name AS user_name, u.avatar AS user_avatar
    FROM profiles p
    JOIN users u ON u.id = p.user_id
"#;

/// PostgreSQL-backed user and profile store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    user_id: Uuid,
    company: Option<String>,
    website: Option<String>,
    location: Option<String>,
    status: String,
    skills: Vec<String>,
    bio: Option<String>,
    githubusername: Option<String>,
    social: Json<Social>,
    experience: Json<Vec<Experience>>,
    education: Json<Vec<Education>>,
    created_at: DateTime<Utc>,
    user_name: String,
    user_avatar: String,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
                avatar: row.user_avatar,
            },
            company: row.company,
            website: row.website,
            location: row.location,
            status: row.status,
            skills: row.skills,
            bio: row.bio,
            githubusername: row.githubusername,
            social: row.social.0,
            experience: row.experience.0,
            education: row.education.0,
            created_at: row.created_at,
        }
    }
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_profile(&self, user_id: Uuid) -> Result<Profile, StoreError> {
        self.find_by_subject(user_id).await?.ok_or_else(profile_not_found)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23503"))
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = super::models::user::normalize_email(email);
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, avatar, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, avatar, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, avatar, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, avatar, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.avatar)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict(format!(
                "email {} already registered",
                user.email
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        // profiles.user_id cascades
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn find_by_subject(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let sql = format!("{} WHERE p.user_id = $1", PROFILE_SELECT);
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Profile::from))
    }

    async fn list(&self) -> Result<Vec<Profile>, StoreError> {
        let sql = format!("{} ORDER BY p.created_at", PROFILE_SELECT);
        let rows = sqlx::query_as::<_, ProfileRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn upsert(&self, user_id: Uuid, fields: ProfileFields) -> Result<Profile, StoreError> {
        // Unsupplied optionals keep their stored value; status, skills and social are replaced.
        let result = sqlx::query(
            r#"
            INSERT INTO profiles
                (id, user_id, company, website, location, status, skills, bio, githubusername, social)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id) DO UPDATE SET
                company = COALESCE(EXCLUDED.company, profiles.company),
                website = COALESCE(EXCLUDED.website, profiles.website),
                location = COALESCE(EXCLUDED.location, profiles.location),
                status = EXCLUDED.status,
                skills = EXCLUDED.skills,
                bio = COALESCE(EXCLUDED.bio, profiles.bio),
                githubusername = COALESCE(EXCLUDED.githubusername, profiles.githubusername),
                social = EXCLUDED.social
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&fields.company)
        .bind(&fields.website)
        .bind(&fields.location)
        .bind(&fields.status)
        .bind(&fields.skills)
        .bind(&fields.bio)
        .bind(&fields.githubusername)
        .bind(Json(&fields.social))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => self.fetch_profile(user_id).await,
            Err(e) if is_foreign_key_violation(&e) => {
                Err(StoreError::NotFound(format!("User {} not found", user_id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn append_list_item(&self, user_id: Uuid, item: ListItem) -> Result<Profile, StoreError> {
        let column = item.list().column();
        let value = match item {
            ListItem::Experience(exp) => serde_json::to_value(vec![exp]),
            ListItem::Education(edu) => serde_json::to_value(vec![edu]),
        }
        .map_err(|e| StoreError::QueryError(e.to_string()))?;

        // `column` is one of two fixed literals, never user input.
        let sql = format!(
            "UPDATE profiles SET {col} = $2::jsonb || {col} WHERE user_id = $1",
            col = column
        );
        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(Json(value))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(profile_not_found());
        }
        self.fetch_profile(user_id).await
    }

    async fn remove_list_item(
        &self,
        user_id: Uuid,
        list: ProfileList,
        item_id: Uuid,
    ) -> Result<Profile, StoreError> {
        let sql = format!(
            r#"
            UPDATE profiles SET {col} = COALESCE(
                (SELECT jsonb_agg(t.item ORDER BY t.ord)
                 FROM jsonb_array_elements({col}) WITH ORDINALITY AS t(item, ord)
                 WHERE t.item->>'id' <> $2),
                '[]'::jsonb)
            WHERE user_id = $1
              AND EXISTS (SELECT 1 FROM jsonb_array_elements({col}) e WHERE e->>'id' = $2)
            "#,
            col = list.column()
        );
        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(item_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            // Either the profile or the item is missing; tell them apart for the caller.
            self.fetch_profile(user_id).await?;
            return Err(StoreError::NotFound(format!("{} not found", list.item_label())));
        }
        self.fetch_profile(user_id).await
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
