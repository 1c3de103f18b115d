use dotenvy::dotenv;
use std::env;
use thiserror::Error;

/// Which backend holds the `user_roles` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleStoreKind {
    /// Supabase REST (PostgREST) over HTTP.
    Postgrest,
    /// Direct Postgres connection through sqlx.
    Postgres,
    /// Process-local map, for local development only.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    // Supabase
    pub supabase_url:         Option<String>,
    pub supabase_anon_key:    Option<String>,
    pub supabase_service_key: Option<String>,

    // Roles
    pub role_store:           RoleStoreKind,
    pub database_url:         Option<String>,

    // Backend
    pub backend_host:         String,
    pub backend_port:         u16,
    pub static_dir:           String,
    pub http_timeout_secs:    u64,

    // Session cookies
    pub session_days:         i64,
    pub cookie_secure:        bool,

    // Telephony (browser SDK, public values only)
    pub ringcentral_client_id:  Option<String>,
    pub ringcentral_server_url: String,
    pub ringcentral_sip_domain: Option<String>,

    // App
    pub app_env:              String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        fn require(key: &str) -> Result<String, ConfigError> {
            env::var(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingVar(key.to_string()))
        }

        fn optional(key: &str) -> Option<String> {
            env::var(key).ok().filter(|v| !v.trim().is_empty())
        }

        fn parse_num<T: std::str::FromStr>(key: &str) -> Result<T, ConfigError> {
            let raw = require(key)?;
            raw.parse::<T>()
                .map_err(|_| ConfigError::InvalidValue(key.to_string(), raw))
        }

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let role_store = match optional("ROLE_STORE").as_deref() {
            None | Some("postgrest") => RoleStoreKind::Postgrest,
            Some("postgres")         => RoleStoreKind::Postgres,
            Some("memory")           => RoleStoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue("ROLE_STORE".into(), other.into()));
            }
        };

        let database_url = optional("DATABASE_URL");
        if role_store == RoleStoreKind::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingVar("DATABASE_URL".into()));
        }

        let cookie_secure = match optional("COOKIE_SECURE") {
            Some(v) => v.parse::<bool>()
                .map_err(|_| ConfigError::InvalidValue("COOKIE_SECURE".into(), v))?,
            None => app_env != "development",
        };

        Ok(Self {
            supabase_url:         optional("SUPABASE_URL").map(|u| u.trim_end_matches('/').to_owned()),
            supabase_anon_key:    optional("SUPABASE_ANON_KEY"),
            supabase_service_key: optional("SUPABASE_SERVICE_ROLE_KEY"),

            role_store,
            database_url,

            backend_host:      env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            backend_port:      parse_num("BACKEND_PORT").unwrap_or(8080),
            static_dir:        env::var("STATIC_DIR").unwrap_or_else(|_| "static".into()),
            http_timeout_secs: parse_num("HTTP_TIMEOUT_SECS").unwrap_or(10),

            session_days:  session_days(optional("SESSION_DAYS"))?,
            cookie_secure,

            ringcentral_client_id:  optional("RINGCENTRAL_CLIENT_ID"),
            ringcentral_server_url: env::var("RINGCENTRAL_SERVER_URL")
                .unwrap_or_else(|_| "https://platform.ringcentral.com".into()),
            ringcentral_sip_domain: optional("RINGCENTRAL_SIP_DOMAIN"),

            app_env,
        })
    }

    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

/// Refresh-cookie lifetime in days. Must be at least one day.
fn session_days(raw: Option<String>) -> Result<i64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(30);
    };
    match raw.trim().parse::<i64>() {
        Ok(days) if days >= 1 => Ok(days),
        _ => Err(ConfigError::InvalidValue("SESSION_DAYS".into(), raw)),
    }
}

impl Default for Config {
    /// Development defaults with no backend configured.
    fn default() -> Self {
        Self {
            supabase_url:           None,
            supabase_anon_key:      None,
            supabase_service_key:   None,
            role_store:             RoleStoreKind::Memory,
            database_url:           None,
            backend_host:           "127.0.0.1".into(),
            backend_port:           8080,
            static_dir:             "static".into(),
            http_timeout_secs:      10,
            session_days:           30,
            cookie_secure:          false,
            ringcentral_client_id:  None,
            ringcentral_server_url: "https://platform.ringcentral.com".into(),
            ringcentral_sip_domain: None,
            app_env:                "development".into(),
        }
    }
}
