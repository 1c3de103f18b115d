use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;

use crate::{
    backend::BackendError,
    errors::{AppError, AppResult},
    middleware::auth_guard::MaybeIdentity,
    models::{Identity, Role},
    session::{clear_session_cookies, set_session_cookies, ACCESS_COOKIE},
    state::AppState,
};

// ── Request / response types ──────────────────────────────────

#[derive(Deserialize)]
struct LoginRequest {
    email:    String,
    password: String,
}

#[derive(Serialize)]
struct MeResponse {
    id:    String,
    email: Option<String>,
    role:  Role,
}

impl MeResponse {
    fn new(identity: Identity, role: Role) -> Self {
        Self { id: identity.id, email: identity.email, role }
    }
}

// ── Router ────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login",  post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me",     get(me))
}

// ── Handlers ──────────────────────────────────────────────────

/// POST /auth/login — email+password sign-in against the auth backend.
async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(body): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    validate_email(&body.email)?;
    if body.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".into()));
    }

    let tokens = match state.auth.sign_in(body.email.trim(), &body.password).await {
        Ok(Some(tokens)) => tokens,
        Ok(None) => return Err(AppError::Unauthorized),
        Err(BackendError::Unconfigured(what)) => return Err(AppError::Misconfigured(what.into())),
        Err(err) => {
            tracing::warn!(error = %err, "Sign-in failed");
            return Err(AppError::BadGateway("Authentication service unavailable".into()));
        }
    };

    set_session_cookies(&cookies, &tokens, state.cookie_policy());
    let role = state.roles.get_role(Some(&tokens.user)).await;
    tracing::info!(user_id = %tokens.user.id, %role, "Signed in");

    Ok(Json(MeResponse::new(tokens.user, role)))
}

/// POST /auth/logout — revoke the session (best effort) and drop the cookies.
async fn logout(
    State(state): State<AppState>,
    cookies: Cookies,
) -> AppResult<impl IntoResponse> {
    if let Some(token) = cookies.get(ACCESS_COOKIE).map(|c| c.value().to_owned()) {
        if !token.is_empty() {
            if let Err(err) = state.auth.sign_out(&token).await {
                tracing::warn!(error = %err, "Sign-out call failed; clearing cookies anyway");
            }
        }
    }
    clear_session_cookies(&cookies);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me — the signed-in identity and its role.
async fn me(
    State(state): State<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
) -> AppResult<impl IntoResponse> {
    let identity = identity.ok_or(AppError::Unauthorized)?;
    let role = state.roles.get_role(Some(&identity)).await;
    Ok(Json(MeResponse::new(identity, role)))
}

fn validate_email(email: &str) -> AppResult<()> {
    let email = email.trim();
    if !email.contains('@') || email.len() < 5 {
        return Err(AppError::BadRequest("Invalid email address".into()));
    }
    Ok(())
}
