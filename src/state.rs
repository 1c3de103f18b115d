//! Shared application state — injected into every handler via `axum::extract::State`.

use std::sync::Arc;

use crate::{
    backend::{AuthBackend, UserDirectory},
    config::Config,
    roles::RoleService,
    session::CookiePolicy,
};

/// Application-wide state passed via axum `State<AppState>`.
///
/// Backends sit behind `Arc<dyn ...>` so cloning per request only bumps
/// reference counts; none of them hold per-request mutable state.
#[derive(Clone)]
pub struct AppState {
    pub config:    Config,
    pub auth:      Arc<dyn AuthBackend>,
    pub directory: Arc<dyn UserDirectory>,
    pub roles:     RoleService,
}

impl AppState {
    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy {
            secure:       self.config.cookie_secure,
            session_days: self.config.session_days,
        }
    }
}
