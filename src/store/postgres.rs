// Postgres store backend

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use uuid::Uuid;

use super::{ListQuery, StoreError, UserStore};
use crate::config::StoreConfig;
use crate::models::user::{User, UserId};

/// Postgres-backed store. Plain runtime queries with `.bind()`, so builds
/// never need a live database.
pub struct PgStore {
    pool: PgPool,
}

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    email TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    enrolment_number TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

impl PgStore {
    /// Connect and make sure the users table exists.
    pub async fn connect(config: &StoreConfig, url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    enrolment_number: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from(row.id),
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            enrolment_number: row.enrolment_number,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn get(&self, id: UserId) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, first_name, last_name, enrolment_number, created_at \
             FROM users WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::from).ok_or(StoreError::NotFound(id))
    }

    async fn save(&self, user: User) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, first_name, last_name, enrolment_number, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
                SET email = EXCLUDED.email,
                    first_name = EXCLUDED.first_name,
                    last_name = EXCLUDED.last_name,
                    enrolment_number = EXCLUDED.enrolment_number
            RETURNING id, email, first_name, last_name, enrolment_number, created_at
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.enrolment_number)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list(&self, query: ListQuery) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, first_name, last_name, enrolment_number, created_at \
             FROM users ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
        )
        .bind(query.limit.max(0))
        .bind(query.skip.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn remove(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn health(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
