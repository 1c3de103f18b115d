//! `user_roles` accessed directly over a Postgres connection pool.

use async_trait::async_trait;

use super::store::{RoleStore, StoreError};
use crate::{db::Db, models::RoleRecord};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone)]
pub struct PgRoleStore {
    pool: Db,
}

impl PgRoleStore {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// A duplicate `user_id` is a conflict; anything else is a backend fault.
fn insert_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            StoreError::Conflict
        }
        e => backend(e),
    }
}

#[async_trait]
impl RoleStore for PgRoleStore {
    async fn fetch(&self, user_id: &str) -> Result<RoleRecord, StoreError> {
        sqlx::query_as::<_, RoleRecord>(
            "SELECT user_id, role FROM user_roles WHERE user_id = $1 LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?
        .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, record: &RoleRecord) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO user_roles (user_id, role, created_at, updated_at)
             VALUES ($1, $2, NOW(), NOW())",
        )
        .bind(&record.user_id)
        .bind(&record.role)
        .execute(&self.pool)
        .await;

        result.map(|_| ()).map_err(insert_error)
    }

    async fn upsert(&self, record: &RoleRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role, created_at, updated_at)
             VALUES ($1, $2, NOW(), NOW())
             ON CONFLICT (user_id) DO UPDATE
             SET role = EXCLUDED.role, updated_at = NOW()",
        )
        .bind(&record.user_id)
        .bind(&record.role)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }
}
