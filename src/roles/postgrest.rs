//! `user_roles` accessed through the Supabase REST API.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};

use super::store::{RoleStore, StoreError, ROLE_TABLE};
use crate::{
    backend::BackendError,
    models::RoleRecord,
    supabase::{error_body, send, ErrorBody, SupabaseClient},
};

/// PostgREST code for "requested a single object, got zero rows".
const NO_ROWS: &str = "PGRST116";
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone)]
pub struct PostgrestRoleStore {
    client: SupabaseClient,
}

impl PostgrestRoleStore {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn write(&self, record: &RoleRecord, upsert: bool) -> Result<(), StoreError> {
        let (path, prefer) = if upsert {
            (
                format!("/rest/v1/{ROLE_TABLE}?on_conflict=user_id"),
                "resolution=merge-duplicates,return=minimal",
            )
        } else {
            (format!("/rest/v1/{ROLE_TABLE}"), "return=minimal")
        };

        let req = self
            .client
            .table_request(Method::POST, &path)
            .map_err(backend)?
            .header("Prefer", prefer)
            .json(record);
        let resp = send(req).await.map_err(backend)?;
        if resp.status().is_success() {
            return Ok(());
        }

        let (status, body) = error_body(resp).await;
        Err(write_error(status, &body))
    }
}

/// Only `PGRST116` means the row is absent; a missing table or a 404 from a
/// proxy is a backend fault.
fn read_error(status: u16, body: &ErrorBody) -> StoreError {
    if body.code().as_deref() == Some(NO_ROWS) {
        return StoreError::NotFound;
    }
    StoreError::Backend(format!("{status}: {}", body.text()))
}

fn write_error(status: u16, body: &ErrorBody) -> StoreError {
    if status == StatusCode::CONFLICT.as_u16() || body.code().as_deref() == Some(UNIQUE_VIOLATION) {
        return StoreError::Conflict;
    }
    StoreError::Backend(format!("{status}: {}", body.text()))
}

fn backend(e: BackendError) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[async_trait]
impl RoleStore for PostgrestRoleStore {
    async fn fetch(&self, user_id: &str) -> Result<RoleRecord, StoreError> {
        let path = format!(
            "/rest/v1/{ROLE_TABLE}?select=user_id,role&user_id=eq.{}",
            urlencoding::encode(user_id)
        );
        let req = self
            .client
            .table_request(Method::GET, &path)
            .map_err(backend)?
            .header("Accept", "application/vnd.pgrst.object+json");
        let resp = send(req).await.map_err(backend)?;

        if resp.status().is_success() {
            return resp
                .json::<RoleRecord>()
                .await
                .map_err(|e| StoreError::Backend(format!("undecodable role row: {e}")));
        }

        let (status, body) = error_body(resp).await;
        Err(read_error(status, &body))
    }

    async fn insert(&self, record: &RoleRecord) -> Result<(), StoreError> {
        self.write(record, false).await
    }

    async fn upsert(&self, record: &RoleRecord) -> Result<(), StoreError> {
        self.write(record, true).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn body(value: serde_json::Value) -> ErrorBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn zero_rows_is_not_found() {
        let no_rows = body(json!({
            "code": "PGRST116",
            "message": "JSON object requested, multiple (or no) rows returned"
        }));
        assert!(matches!(read_error(406, &no_rows), StoreError::NotFound));
    }

    #[test]
    fn missing_table_is_a_backend_error() {
        let missing_relation = body(json!({ "code": "42P01", "message": "relation \"user_roles\" does not exist" }));
        assert!(matches!(read_error(404, &missing_relation), StoreError::Backend(_)));

        let schema_cache = body(json!({ "code": "PGRST205", "message": "Could not find the table" }));
        assert!(matches!(read_error(404, &schema_cache), StoreError::Backend(_)));
    }

    #[test]
    fn other_read_failures_are_backend_errors() {
        assert!(matches!(read_error(401, &body(json!({ "message": "JWT expired" }))), StoreError::Backend(_)));
        assert!(matches!(read_error(503, &ErrorBody::default()), StoreError::Backend(_)));
        // A conflict status on a read is still a fault, never "absent".
        assert!(matches!(read_error(409, &ErrorBody::default()), StoreError::Backend(_)));
    }

    #[test]
    fn duplicate_key_is_conflict() {
        assert!(matches!(write_error(409, &ErrorBody::default()), StoreError::Conflict));

        let unique = body(json!({ "code": "23505", "message": "duplicate key value violates unique constraint" }));
        assert!(matches!(write_error(409, &unique), StoreError::Conflict));
        assert!(matches!(write_error(400, &unique), StoreError::Conflict));
    }

    #[test]
    fn other_write_failures_are_backend_errors() {
        let denied = body(json!({ "code": "42501", "message": "permission denied for table user_roles" }));
        assert!(matches!(write_error(403, &denied), StoreError::Backend(msg) if msg.contains("permission denied")));
        assert!(matches!(write_error(404, &body(json!({ "code": "PGRST116" }))), StoreError::Backend(_)));
    }
}
