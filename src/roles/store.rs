use async_trait::async_trait;
use thiserror::Error;

use crate::models::RoleRecord;

/// Table holding one role per user.
pub const ROLE_TABLE: &str = "user_roles";

#[derive(Debug, Error)]
pub enum StoreError {
    /// No row for the requested key. Not a failure: triggers self-provisioning.
    #[error("role record not found")]
    NotFound,
    /// Unique-key violation on insert.
    #[error("role record already exists")]
    Conflict,
    #[error("role store error: {0}")]
    Backend(String),
}

/// Point lookup, insert and upsert on `user_roles`, keyed by `user_id`.
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn fetch(&self, user_id: &str) -> Result<RoleRecord, StoreError>;

    async fn insert(&self, record: &RoleRecord) -> Result<(), StoreError>;

    async fn upsert(&self, record: &RoleRecord) -> Result<(), StoreError>;
}
