// In-memory store backend

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ListQuery, StoreError, UserStore};
use crate::models::user::{User, UserId};

/// Hash map behind an async lock. Used when no DATABASE_URL is configured
/// and by the test suite. Listing order matches the Postgres backend:
/// newest first, id as tie-break.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held. Lets tests assert that a rejected
    /// request never wrote anything.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get(&self, id: UserId) -> Result<User, StoreError> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn save(&self, user: User) -> Result<User, StoreError> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list(&self, query: ListQuery) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        let mut page: Vec<User> = users.values().cloned().collect();
        page.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.as_uuid().cmp(&b.id.as_uuid()))
        });
        Ok(page
            .into_iter()
            .skip(query.skip.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect())
    }

    async fn remove(&self, user: &User) -> Result<(), StoreError> {
        self.users.write().await.remove(&user.id);
        Ok(())
    }
}
