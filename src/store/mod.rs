// User persistence seam

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::user::{User, UserId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no user with id {0}")]
    NotFound(UserId),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// One page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: i64,
    pub skip: i64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { limit: 50, skip: 0 }
    }
}

/// Persistence backend for user records. Each request issues at most one
/// read and one write per record; backends provide their own consistency
/// (last write wins, no optimistic concurrency).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch one user by id.
    async fn get(&self, id: UserId) -> Result<User, StoreError>;

    /// Insert or fully overwrite a user, returning the persisted record.
    async fn save(&self, user: User) -> Result<User, StoreError>;

    /// One page of users, newest first.
    async fn list(&self, query: ListQuery) -> Result<Vec<User>, StoreError>;

    /// Delete a user. Removing a record that is already gone is not an error.
    async fn remove(&self, user: &User) -> Result<(), StoreError>;

    /// Connectivity probe for the health endpoint.
    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
