//! Seams to the managed auth service. The Supabase client implements them in
//! production; tests plug in fakes.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DirectoryUser, Identity, SessionTokens};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend not configured: {0}")]
    Unconfigured(&'static str),
    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("backend request failed: {0}")]
    Transport(String),
    #[error("could not decode backend response: {0}")]
    Decode(String),
}

/// End-user session operations.
///
/// `Ok(None)` means the backend answered and the token is simply not valid;
/// `Err` means the backend could not be asked.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn get_user(&self, access_token: &str) -> Result<Option<Identity>, BackendError>;

    async fn refresh_session(&self, refresh_token: &str) -> Result<Option<SessionTokens>, BackendError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<SessionTokens>, BackendError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;
}

/// Privileged user listing, authenticated with the service-role credential.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list_users(&self, page: u32, per_page: u32) -> Result<Vec<DirectoryUser>, BackendError>;
}
