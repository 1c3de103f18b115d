//! Thin HTTP client over the Supabase auth (GoTrue) and REST (PostgREST) APIs.

pub mod admin;
pub mod auth;

use std::time::Duration;

use once_cell::sync::OnceCell;
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;

use crate::{backend::BackendError, config::Config};

static HTTP: OnceCell<reqwest::Client> = OnceCell::new();

/// Shared HTTP client, built on first use and reused for the life of the process.
fn http_client(timeout_secs: u64) -> Result<&'static reqwest::Client, BackendError> {
    HTTP.get_or_try_init(|| {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("callboard-backend/", env!("CARGO_PKG_VERSION")))
            .build()
    })
    .map_err(|e| BackendError::Transport(format!("failed to create HTTP client: {e}")))
}

/// Read-only handle on one Supabase project. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    base_url:     Option<String>,
    anon_key:     Option<String>,
    service_key:  Option<String>,
    timeout_secs: u64,
}

impl SupabaseClient {
    pub fn new(
        base_url: Option<String>,
        anon_key: Option<String>,
        service_key: Option<String>,
        timeout_secs: u64,
    ) -> Self {
        Self { base_url, anon_key, service_key, timeout_secs }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.supabase_url.clone(),
            config.supabase_anon_key.clone(),
            config.supabase_service_key.clone(),
            config.http_timeout_secs,
        )
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.anon_key.is_some()
    }

    pub fn has_service_key(&self) -> bool {
        self.base_url.is_some() && self.service_key.is_some()
    }

    fn url(&self, path: &str) -> Result<String, BackendError> {
        let base = self.base_url.as_deref().ok_or(BackendError::Unconfigured("SUPABASE_URL"))?;
        Ok(format!("{base}{path}"))
    }

    fn anon_key(&self) -> Result<&str, BackendError> {
        self.anon_key.as_deref().ok_or(BackendError::Unconfigured("SUPABASE_ANON_KEY"))
    }

    fn service_key(&self) -> Result<&str, BackendError> {
        self.service_key.as_deref().ok_or(BackendError::Unconfigured("SUPABASE_SERVICE_ROLE_KEY"))
    }

    /// Key for server-side table access: service role when present, anon otherwise.
    fn table_key(&self) -> Result<&str, BackendError> {
        match self.service_key.as_deref() {
            Some(key) => Ok(key),
            None => self.anon_key(),
        }
    }

    /// Request carrying the anon key, optionally acting as an end user.
    fn public_request(
        &self,
        method: reqwest::Method,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<RequestBuilder, BackendError> {
        let key = self.anon_key()?;
        let req = http_client(self.timeout_secs)?
            .request(method, self.url(path)?)
            .header("apikey", key)
            .bearer_auth(bearer.unwrap_or(key));
        Ok(req)
    }

    /// Request carrying the service-role key.
    fn service_request(&self, method: reqwest::Method, path: &str) -> Result<RequestBuilder, BackendError> {
        let key = self.service_key()?;
        Ok(http_client(self.timeout_secs)?
            .request(method, self.url(path)?)
            .header("apikey", key)
            .bearer_auth(key))
    }

    /// Request against the REST API for table access.
    pub(crate) fn table_request(&self, method: reqwest::Method, path: &str) -> Result<RequestBuilder, BackendError> {
        let key = self.table_key()?;
        Ok(http_client(self.timeout_secs)?
            .request(method, self.url(path)?)
            .header("apikey", key)
            .bearer_auth(key))
    }
}

pub(crate) async fn send(req: RequestBuilder) -> Result<Response, BackendError> {
    req.send()
        .await
        .map_err(|e| BackendError::Transport(e.to_string()))
}

async fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, BackendError> {
    resp.json::<T>()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// Error body shapes used by GoTrue and PostgREST. All fields are optional
/// because the two services (and their versions) disagree on naming.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub code:              Option<serde_json::Value>,
    pub error_code:        Option<String>,
    pub msg:               Option<String>,
    pub message:           Option<String>,
    pub error:             Option<String>,
    pub error_description: Option<String>,
}

impl ErrorBody {
    pub fn text(&self) -> String {
        self.msg
            .clone()
            .or_else(|| self.message.clone())
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "unknown error".into())
    }

    /// PostgREST / SQLSTATE code, or GoTrue `error_code`.
    pub fn code(&self) -> Option<String> {
        match &self.code {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            _ => self.error_code.clone(),
        }
    }
}

/// Read a non-success response into its status and parsed error body.
pub(crate) async fn error_body(resp: Response) -> (u16, ErrorBody) {
    let status = resp.status().as_u16();
    let body = resp.json::<ErrorBody>().await.unwrap_or_default();
    (status, body)
}

async fn rejected(resp: Response) -> BackendError {
    let (status, body) = error_body(resp).await;
    BackendError::Rejected { status, message: body.text() }
}
