//! GoTrue admin endpoints (service-role only).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;

use super::{decode, rejected, send, SupabaseClient};
use crate::{
    backend::{BackendError, UserDirectory},
    models::DirectoryUser,
};

#[derive(Debug, Deserialize)]
struct AdminUsersPage {
    #[serde(default)]
    users: Vec<AdminUserRow>,
}

#[derive(Debug, Deserialize)]
struct AdminUserRow {
    id:                 String,
    email:              Option<String>,
    phone:              Option<String>,
    created_at:         Option<DateTime<Utc>>,
    last_sign_in_at:    Option<DateTime<Utc>>,
    email_confirmed_at: Option<DateTime<Utc>>,
}

impl From<AdminUserRow> for DirectoryUser {
    fn from(row: AdminUserRow) -> Self {
        // GoTrue sends "" rather than null for unset contact fields.
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        DirectoryUser {
            id:              row.id,
            email:           non_empty(row.email),
            phone:           non_empty(row.phone),
            created_at:      row.created_at,
            last_sign_in_at: row.last_sign_in_at,
            email_confirmed: row.email_confirmed_at.is_some(),
        }
    }
}

#[async_trait]
impl UserDirectory for SupabaseClient {
    async fn list_users(&self, page: u32, per_page: u32) -> Result<Vec<DirectoryUser>, BackendError> {
        if !self.has_service_key() {
            return Err(BackendError::Unconfigured("SUPABASE_SERVICE_ROLE_KEY"));
        }

        let path = format!("/auth/v1/admin/users?page={page}&per_page={per_page}");
        let resp = send(self.service_request(Method::GET, &path)?).await?;
        if !resp.status().is_success() {
            return Err(rejected(resp).await);
        }

        let body: AdminUsersPage = decode(resp).await?;
        Ok(body.users.into_iter().map(DirectoryUser::from).collect())
    }
}
