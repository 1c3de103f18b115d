use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{RoleStore, StoreError};
use crate::models::RoleRecord;

/// Process-local role table. Lost on restart.
#[derive(Debug, Default)]
pub struct MemoryRoleStore {
    rows: RwLock<HashMap<String, Option<String>>>,
}

impl MemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate rows, e.g. a bootstrap admin for local development.
    pub fn with_records(records: impl IntoIterator<Item = RoleRecord>) -> Self {
        let rows = records.into_iter().map(|r| (r.user_id, r.role)).collect();
        Self { rows: RwLock::new(rows) }
    }

    pub async fn contains(&self, user_id: &str) -> bool {
        self.rows.read().await.contains_key(user_id)
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn fetch(&self, user_id: &str) -> Result<RoleRecord, StoreError> {
        self.rows
            .read()
            .await
            .get(user_id)
            .map(|role| RoleRecord { user_id: user_id.to_owned(), role: role.clone() })
            .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, record: &RoleRecord) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&record.user_id) {
            return Err(StoreError::Conflict);
        }
        rows.insert(record.user_id.clone(), record.role.clone());
        Ok(())
    }

    async fn upsert(&self, record: &RoleRecord) -> Result<(), StoreError> {
        self.rows
            .write()
            .await
            .insert(record.user_id.clone(), record.role.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[tokio::test]
    async fn insert_conflicts_on_existing_key() {
        let store = MemoryRoleStore::new();
        store.insert(&RoleRecord::new("u1", Role::User)).await.unwrap();
        let err = store.insert(&RoleRecord::new("u1", Role::Admin)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
        assert_eq!(store.fetch("u1").await.unwrap().role.as_deref(), Some("user"));
    }

    #[tokio::test]
    async fn upsert_overwrites() {
        let store = MemoryRoleStore::with_records([RoleRecord::new("u1", Role::User)]);
        store.upsert(&RoleRecord::new("u1", Role::Admin)).await.unwrap();
        assert_eq!(store.fetch("u1").await.unwrap().role.as_deref(), Some("admin"));
        assert!(matches!(store.fetch("u2").await, Err(StoreError::NotFound)));
    }
}
