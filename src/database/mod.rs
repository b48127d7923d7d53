use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemoryStore;
pub use models::profile::{Education, Experience, ListItem, Profile, ProfileFields, ProfileList, Social};
pub use models::user::{NewUser, User, UserSummary};
pub use postgres::PgStore;

/// Errors from the user and profile stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Account records keyed by id, unique by email.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Fails with `Conflict` when the email is already registered.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Profile documents, one per user, keyed by the owning user's id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_by_subject(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;

    async fn list(&self) -> Result<Vec<Profile>, StoreError>;

    /// Create the profile or merge `fields` into the existing one.
    async fn upsert(&self, user_id: Uuid, fields: ProfileFields) -> Result<Profile, StoreError>;

    /// Prepend `item` to the list it belongs to.
    async fn append_list_item(&self, user_id: Uuid, item: ListItem) -> Result<Profile, StoreError>;

    async fn remove_list_item(
        &self,
        user_id: Uuid,
        list: ProfileList,
        item_id: Uuid,
    ) -> Result<Profile, StoreError>;

    async fn delete(&self, user_id: Uuid) -> Result<(), StoreError>;
}

pub(crate) fn profile_not_found() -> StoreError {
    StoreError::NotFound("Profile not found".to_string())
}
