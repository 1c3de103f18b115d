//! Session gate middleware.
//!
//! Runs in front of every route. Resolves the session from the auth cookies,
//! applies the redirect policy and, when the request may proceed, injects the
//! caller's `Identity` into request extensions for downstream handlers.
//! Cookie rotations done while resolving are written by `CookieManagerLayer`
//! on whatever response leaves here, redirects included.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::{
    gate::{decide, is_public, is_static_asset},
    models::Identity,
    session::resolve_session,
    state::AppState,
};

/// Middleware: gate every non-asset request on the session.
pub async fn require_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    if is_static_asset(&path) {
        return next.run(req).await;
    }

    let identity = resolve_session(state.auth.as_ref(), &cookies, state.cookie_policy()).await;

    let decision = decide(identity.is_some(), is_public(&path), &path);
    match decision.location() {
        Some(location) => {
            tracing::debug!(%path, ?decision, "Redirecting");
            Redirect::temporary(location).into_response()
        }
        None => {
            if let Some(identity) = identity {
                req.extensions_mut().insert(identity);
            }
            next.run(req).await
        }
    }
}

/// Extractor for the identity `require_session` attached, if any.
/// Public routes see `None` for signed-out callers.
pub struct MaybeIdentity(pub Option<Identity>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Identity>().cloned()))
    }
}
