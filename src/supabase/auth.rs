//! GoTrue end-user endpoints.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::json;

use super::{decode, rejected, send, SupabaseClient};
use crate::{
    backend::{AuthBackend, BackendError},
    models::{Identity, SessionTokens},
};

#[async_trait]
impl AuthBackend for SupabaseClient {
    async fn get_user(&self, access_token: &str) -> Result<Option<Identity>, BackendError> {
        let resp = send(self.public_request(Method::GET, "/auth/v1/user", Some(access_token))?).await?;

        match resp.status() {
            s if s.is_success() => decode::<Identity>(resp).await.map(Some),
            // Expired, malformed or revoked JWT.
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            _ => Err(rejected(resp).await),
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Option<SessionTokens>, BackendError> {
        let req = self
            .public_request(Method::POST, "/auth/v1/token?grant_type=refresh_token", None)?
            .json(&json!({ "refresh_token": refresh_token }));
        token_grant(req).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<SessionTokens>, BackendError> {
        let req = self
            .public_request(Method::POST, "/auth/v1/token?grant_type=password", None)?
            .json(&json!({ "email": email, "password": password }));
        token_grant(req).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let resp = send(self.public_request(Method::POST, "/auth/v1/logout", Some(access_token))?).await?;
        match resp.status() {
            s if s.is_success() => Ok(()),
            // Session already gone.
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(()),
            _ => Err(rejected(resp).await),
        }
    }
}

/// Run a `/token` grant. 400/401/403 mean the presented grant is not valid.
async fn token_grant(req: reqwest::RequestBuilder) -> Result<Option<SessionTokens>, BackendError> {
    let resp = send(req).await?;
    match resp.status() {
        s if s.is_success() => decode::<SessionTokens>(resp).await.map(Some),
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
        _ => Err(rejected(resp).await),
    }
}
