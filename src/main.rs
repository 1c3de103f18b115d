use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use callboard_backend::{
    config::{Config, RoleStoreKind},
    db,
    roles::{
        memory::MemoryRoleStore, postgres::PgRoleStore, postgrest::PostgrestRoleStore,
        store::RoleStore, RoleService,
    },
    routes,
    state::AppState,
    supabase::SupabaseClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ───────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── Config ────────────────────────────────────────────────
    let config = Config::from_env()?;
    tracing::info!(env = %config.app_env, role_store = ?config.role_store, "Starting callboard backend");

    // ── Auth backend ──────────────────────────────────────────
    let supabase = SupabaseClient::from_config(&config);
    if !supabase.is_configured() {
        tracing::warn!("SUPABASE_URL / SUPABASE_ANON_KEY not set; every request will be treated as signed out");
    }
    if !supabase.has_service_key() {
        tracing::warn!("SUPABASE_SERVICE_ROLE_KEY not set; admin user listing will fail");
    }

    // ── Role store ────────────────────────────────────────────
    let store: Arc<dyn RoleStore> = match config.role_store {
        RoleStoreKind::Postgrest => Arc::new(PostgrestRoleStore::new(supabase.clone())),
        RoleStoreKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for ROLE_STORE=postgres"))?;
            let pool = db::connect(url).await?;
            db::run_migrations(&pool).await?;
            Arc::new(PgRoleStore::new(pool))
        }
        RoleStoreKind::Memory => {
            if !config.is_development() {
                tracing::warn!("In-memory role store outside development; roles are lost on restart");
            }
            Arc::new(MemoryRoleStore::new())
        }
    };

    let supabase = Arc::new(supabase);
    let addr: SocketAddr = format!("{}:{}", config.backend_host, config.backend_port).parse()?;

    let app_state = AppState {
        auth:      supabase.clone(),
        directory: supabase,
        roles:     RoleService::new(store),
        config,
    };

    // ── Router ────────────────────────────────────────────────
    let app = routes::app(app_state);
    tracing::info!(%addr, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
