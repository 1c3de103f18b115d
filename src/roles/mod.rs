//! Role lookup and assignment over the `user_roles` table.
//!
//! Every failure resolves to [`SAFE_ROLE`]: a broken or unreachable store can
//! demote an admin to `user` but can never promote anyone.

pub mod memory;
pub mod postgres;
pub mod postgrest;
pub mod store;

use std::sync::Arc;

use crate::models::{Identity, Role, RoleRecord, SAFE_ROLE};
use store::{RoleStore, StoreError};

#[derive(Clone)]
pub struct RoleService {
    store: Arc<dyn RoleStore>,
}

impl RoleService {
    pub fn new(store: Arc<dyn RoleStore>) -> Self {
        Self { store }
    }

    /// Read step: the stored role for `user_id`, normalized.
    pub async fn lookup(&self, user_id: &str) -> Result<Role, StoreError> {
        let record = self.store.fetch(user_id).await?;
        Ok(Role::from_stored(record.role.as_deref()))
    }

    /// Repair step: create the default `user` row. A unique-key conflict means a
    /// concurrent lookup already created it, which counts as success.
    pub async fn provision_default(&self, user_id: &str) -> bool {
        match self.store.insert(&RoleRecord::new(user_id, SAFE_ROLE)).await {
            Ok(()) => {
                tracing::info!(user_id, "Provisioned default role");
                true
            }
            Err(StoreError::Conflict) => true,
            Err(err) => {
                tracing::warn!(user_id, error = %err, "Failed to provision default role");
                false
            }
        }
    }

    pub async fn get_role(&self, identity: Option<&Identity>) -> Role {
        let Some(identity) = identity else {
            return SAFE_ROLE;
        };

        match self.lookup(&identity.id).await {
            Ok(role) => role,
            Err(StoreError::NotFound) => {
                self.provision_default(&identity.id).await;
                SAFE_ROLE
            }
            Err(err) => {
                tracing::warn!(user_id = %identity.id, error = %err, "Role lookup failed");
                SAFE_ROLE
            }
        }
    }

    pub async fn is_admin(&self, identity: Option<&Identity>) -> bool {
        self.get_role(identity).await == Role::Admin
    }

    /// Assign `role` to `target_id`. Only an admin caller may write; returns
    /// `true` only when the store confirms the write.
    pub async fn set_role(&self, caller: Option<&Identity>, target_id: &str, role: Role) -> bool {
        if !self.is_admin(caller).await {
            return false;
        }
        // is_admin already rejected a missing caller.
        let caller_id = caller.map(|c| c.id.as_str()).unwrap_or_default();

        match self.store.upsert(&RoleRecord::new(target_id, role)).await {
            Ok(()) => {
                tracing::info!(caller = caller_id, target = target_id, %role, "Role updated");
                true
            }
            Err(err) => {
                tracing::warn!(caller = caller_id, target = target_id, error = %err, "Role update failed");
                false
            }
        }
    }
}
