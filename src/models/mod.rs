use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Identities ───────────────────────────────────────────────

/// The authenticated principal a session resolves to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    pub id:         String,
    #[serde(default)]
    pub email:      Option<String>,
    /// Everything else the auth backend attached (metadata, provider info).
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), email: None, attributes: serde_json::Map::new() }
    }
}

/// Token set issued by the auth backend on sign-in or refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionTokens {
    pub access_token:  String,
    pub refresh_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in:    i64,
    pub user:          Identity,
}

fn default_expires_in() -> i64 {
    3600
}

/// User as shown by the admin listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DirectoryUser {
    pub id:              String,
    pub email:           Option<String>,
    pub phone:           Option<String>,
    pub created_at:      Option<DateTime<Utc>>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
    pub email_confirmed: bool,
}

// ── Roles ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// Role every failure path resolves to.
pub const SAFE_ROLE: Role = Role::User;

impl Role {
    /// Strict parse for values coming from callers.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "admin" => Some(Role::Admin),
            "user"  => Some(Role::User),
            _       => None,
        }
    }

    /// Lenient read of a stored column: empty, null or unknown values become [`SAFE_ROLE`].
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => SAFE_ROLE,
            Some(value) => Self::parse(value).unwrap_or_else(|| {
                tracing::debug!(value, "Unrecognized stored role, treating as user");
                SAFE_ROLE
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User  => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of `user_roles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoleRecord {
    pub user_id: String,
    pub role:    Option<String>,
}

impl RoleRecord {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self { user_id: user_id.into(), role: Some(role.as_str().to_owned()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_role_fails_closed() {
        assert_eq!(Role::from_stored(Some("admin")), Role::Admin);
        assert_eq!(Role::from_stored(Some("user")), Role::User);
        assert_eq!(Role::from_stored(Some("")), Role::User);
        assert_eq!(Role::from_stored(None), Role::User);
        assert_eq!(Role::from_stored(Some("superuser")), Role::User);
        assert_eq!(Role::from_stored(Some("ADMIN")), Role::User);
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse(" user "), Some(Role::User));
        assert_eq!(Role::parse("owner"), None);
    }

    #[test]
    fn identity_keeps_extra_attributes() {
        let raw = serde_json::json!({
            "id": "u1",
            "email": "u1@example.com",
            "aud": "authenticated",
            "user_metadata": { "name": "U One" }
        });
        let identity: Identity = serde_json::from_value(raw).unwrap();
        assert_eq!(identity.id, "u1");
        assert_eq!(identity.email.as_deref(), Some("u1@example.com"));
        assert_eq!(identity.attributes["aud"], "authenticated");
        assert!(identity.attributes.contains_key("user_metadata"));
    }
}
