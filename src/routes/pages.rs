//! Dashboard pages, served as static files from `STATIC_DIR`.

use std::path::PathBuf;

use axum::{response::Redirect, routing::get, Router};
use tower_http::services::{ServeDir, ServeFile};

use crate::{config::Config, gate::DASHBOARD_PATH, state::AppState};

pub fn router(config: &Config) -> Router<AppState> {
    let dir = PathBuf::from(&config.static_dir);
    Router::new()
        .route("/", get(|| async { Redirect::temporary(DASHBOARD_PATH) }))
        .route_service("/login",     ServeFile::new(dir.join("login.html")))
        .route_service("/dashboard", ServeFile::new(dir.join("dashboard.html")))
        .route_service("/phone",     ServeFile::new(dir.join("phone.html")))
        .fallback_service(ServeDir::new(dir))
}
