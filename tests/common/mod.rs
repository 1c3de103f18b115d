#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use tower::ServiceExt;

use callboard_backend::{
    backend::{AuthBackend, BackendError, UserDirectory},
    config::Config,
    models::{DirectoryUser, Identity, Role, RoleRecord, SessionTokens},
    roles::{memory::MemoryRoleStore, RoleService},
    routes,
    state::AppState,
};

/// Access token `tok-<id>` resolves to identity `<id>`; refresh token
/// `refresh-<id>` rotates into `tok-<id>` / `refresh-<id>-2`.
#[derive(Default)]
pub struct FakeAuth {
    pub down: bool,
    pub passwords: HashMap<String, (String, String)>,
}

impl FakeAuth {
    pub fn with_password(mut self, email: &str, password: &str, user_id: &str) -> Self {
        self.passwords.insert(email.into(), (password.into(), user_id.into()));
        self
    }

    fn tokens_for(user_id: &str) -> SessionTokens {
        SessionTokens {
            access_token:  format!("tok-{user_id}"),
            refresh_token: format!("refresh-{user_id}-2"),
            expires_in:    3600,
            user:          Identity::new(user_id),
        }
    }
}

#[async_trait]
impl AuthBackend for FakeAuth {
    async fn get_user(&self, access_token: &str) -> Result<Option<Identity>, BackendError> {
        if self.down {
            return Err(BackendError::Transport("connection refused".into()));
        }
        Ok(access_token.strip_prefix("tok-").map(Identity::new))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Option<SessionTokens>, BackendError> {
        if self.down {
            return Err(BackendError::Transport("connection refused".into()));
        }
        Ok(refresh_token.strip_prefix("refresh-").map(Self::tokens_for))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<SessionTokens>, BackendError> {
        if self.down {
            return Err(BackendError::Transport("connection refused".into()));
        }
        Ok(self
            .passwords
            .get(email)
            .filter(|(expected, _)| expected == password)
            .map(|(_, user_id)| Self::tokens_for(user_id)))
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), BackendError> {
        Ok(())
    }
}

pub enum FakeDirectory {
    Unconfigured,
    Rejected,
    Down,
    Users(Vec<DirectoryUser>),
}

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn list_users(&self, _page: u32, _per_page: u32) -> Result<Vec<DirectoryUser>, BackendError> {
        match self {
            FakeDirectory::Unconfigured => Err(BackendError::Unconfigured("SUPABASE_SERVICE_ROLE_KEY")),
            FakeDirectory::Rejected => Err(BackendError::Rejected {
                status:  403,
                message: "User not allowed".into(),
            }),
            FakeDirectory::Down => Err(BackendError::Transport("connection refused".into())),
            FakeDirectory::Users(users) => Ok(users.clone()),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub store:  Arc<MemoryRoleStore>,
}

pub fn config() -> Config {
    Config {
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/static").into(),
        ..Config::default()
    }
}

pub fn app_with(auth: FakeAuth, directory: FakeDirectory, config: Config) -> TestApp {
    let store = Arc::new(MemoryRoleStore::with_records([
        RoleRecord::new("admin1", Role::Admin),
        RoleRecord::new("u3", Role::User),
    ]));
    let state = AppState {
        config,
        auth: Arc::new(auth),
        directory: Arc::new(directory),
        roles: RoleService::new(store.clone()),
    };
    TestApp { router: routes::app(state), store }
}

pub fn app() -> TestApp {
    app_with(FakeAuth::default(), FakeDirectory::Users(Vec::new()), config())
}

impl TestApp {
    pub async fn send(&self, method: Method, uri: &str, cookie: Option<&str>, json: Option<serde_json::Value>) -> Response {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        let body = match json {
            Some(value) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(req.body(body).unwrap())
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        self.send(Method::GET, uri, cookie, None).await
    }
}

pub fn location(resp: &Response) -> Option<&str> {
    resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok())
}

pub fn set_cookies(resp: &Response) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_owned))
        .collect()
}

pub async fn json_body(resp: Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn assert_redirect(resp: &Response, to: &str) {
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(resp), Some(to));
}
