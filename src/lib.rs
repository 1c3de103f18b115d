//! Session-gated dashboard backend: Supabase-backed sign-in, an `admin`/`user`
//! role table, the admin user listing and the dashboard's page surface.

pub mod backend;
pub mod config;
pub mod db;
pub mod errors;
pub mod gate;
pub mod middleware;
pub mod models;
pub mod roles;
pub mod routes;
pub mod session;
pub mod state;
pub mod supabase;
