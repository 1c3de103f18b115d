use axum::{middleware, Router};
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use crate::{middleware::auth_guard::require_session, state::AppState};

mod admin;
mod auth;
mod pages;
mod phone;

/// Build the full application router.
///
/// Every route, the static fallback included, runs behind [`require_session`];
/// which paths are reachable without a session is decided there, not here.
/// `CookieManagerLayer` wraps the gate so cookie rotations reach the client
/// even when the gate answers with a redirect.
pub fn app(state: AppState) -> Router {
    let gate = middleware::from_fn_with_state(state.clone(), require_session);
    Router::new()
        .merge(pages::router(&state.config))
        .merge(auth::router())
        .nest(
            "/api",
            Router::new()
                .merge(admin::router(state.clone()))
                .merge(phone::router()),
        )
        .layer(gate)
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
