//! HTTP-facing error type. Every handler returns `AppResult<T>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    BadGateway(String),
    #[error("Server misconfigured: {0}")]
    Misconfigured(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized     => StatusCode::UNAUTHORIZED,
            AppError::Forbidden        => StatusCode::FORBIDDEN,
            AppError::BadRequest(_)    => StatusCode::BAD_REQUEST,
            AppError::BadGateway(_)    => StatusCode::BAD_GATEWAY,
            AppError::Misconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_)      => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "Internal error");
                "Internal server error".to_owned()
            }
            AppError::Misconfigured(what) => {
                tracing::error!(missing = %what, "Request hit unconfigured backend");
                self.to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
