//! Role-based authorization guard.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{errors::AppError, models::Identity, state::AppState};

/// Middleware: require the `admin` role. Must sit behind `require_session`.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = req.extensions().get::<Identity>().cloned();
    if identity.is_none() {
        return Err(AppError::Unauthorized);
    }
    if !state.roles.is_admin(identity.as_ref()).await {
        return Err(AppError::Forbidden);
    }
    Ok(next.run(req).await)
}
