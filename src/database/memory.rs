use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::profile::ProfileDocument;
use super::{
    profile_not_found, ListItem, NewUser, Profile, ProfileFields, ProfileList, ProfileStore,
    StoreError, User, UserStore, UserSummary,
};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    profiles: HashMap<Uuid, ProfileDocument>,
}

/// Process-local store for development runs and tests. Contents die with the process.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inner {
    fn summary(&self, user_id: Uuid) -> Result<UserSummary, StoreError> {
        self.users
            .get(&user_id)
            .map(UserSummary::from)
            .ok_or_else(|| StoreError::NotFound(format!("User {} not found", user_id)))
    }

    fn view(&self, doc: &ProfileDocument) -> Result<Profile, StoreError> {
        Ok(doc.to_profile(self.summary(doc.user_id)?))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = super::models::user::normalize_email(email);
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!("email {} already registered", user.email)));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        // Mirror the relational cascade: a user's profile goes with it.
        inner.profiles.remove(&id);
        inner.users.remove(&id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_by_subject(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let inner = self.inner.read().await;
        inner
            .profiles
            .get(&user_id)
            .map(|doc| inner.view(doc))
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Profile>, StoreError> {
        let inner = self.inner.read().await;
        let mut docs: Vec<&ProfileDocument> = inner.profiles.values().collect();
        docs.sort_by_key(|doc| doc.created_at);
        docs.into_iter().map(|doc| inner.view(doc)).collect()
    }

    async fn upsert(&self, user_id: Uuid, fields: ProfileFields) -> Result<Profile, StoreError> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        // Profiles hang off an existing user, as the foreign key enforces in Postgres.
        inner.summary(user_id)?;

        match inner.profiles.get_mut(&user_id) {
            Some(doc) => doc.merge(fields),
            None => {
                inner.profiles.insert(user_id, ProfileDocument::new(user_id, fields));
            }
        }

        let doc = inner.profiles.get(&user_id).ok_or_else(profile_not_found)?;
        inner.view(doc)
    }

    async fn append_list_item(&self, user_id: Uuid, item: ListItem) -> Result<Profile, StoreError> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let doc = inner.profiles.get_mut(&user_id).ok_or_else(profile_not_found)?;
        doc.prepend(item);

        let doc = inner.profiles.get(&user_id).ok_or_else(profile_not_found)?;
        inner.view(doc)
    }

    async fn remove_list_item(
        &self,
        user_id: Uuid,
        list: ProfileList,
        item_id: Uuid,
    ) -> Result<Profile, StoreError> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let doc = inner.profiles.get_mut(&user_id).ok_or_else(profile_not_found)?;
        if !doc.remove(list, item_id) {
            return Err(StoreError::NotFound(format!("{} not found", list.item_label())));
        }

        let doc = inner.profiles.get(&user_id).ok_or_else(profile_not_found)?;
        inner.view(doc)
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), StoreError> {
        self.inner.write().await.profiles.remove(&user_id);
        Ok(())
    }
}
