//! `/api/admin` routes — user listing and role assignment.
//! All routes in this module require the `admin` role (enforced via the
//! `require_admin` role-guard applied in `router`).

use axum::{
    extract::{Extension, Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    backend::BackendError,
    errors::{AppError, AppResult},
    middleware::role_guard::require_admin,
    models::{DirectoryUser, Identity, Role},
    state::AppState,
};

const DEFAULT_PER_PAGE: u32 = 50;
const MAX_PER_PAGE:     u32 = 1000;

pub fn router(state: AppState) -> Router<AppState> {
    use axum::middleware;
    // require_admin looks the caller's role up, so it needs AppState.
    let admin_guard = middleware::from_fn_with_state(state, require_admin);
    Router::new()
        .route("/admin/users",           get(list_users))
        .route("/admin/users/{id}/role", put(update_role))
        .route_layer(admin_guard)
}

// ── Request / response types ─────────────────────────────────

#[derive(Deserialize)]
struct ListQuery {
    page:     Option<u32>,
    per_page: Option<u32>,
}

#[derive(Serialize)]
struct UsersResponse {
    users: Vec<DirectoryUser>,
}

#[derive(Deserialize)]
struct UpdateRoleBody {
    role: String,
}

#[derive(Serialize)]
struct RoleResponse {
    user_id: String,
    role:    Role,
}

// ── Handlers ─────────────────────────────────────────────────

/// GET /api/admin/users — list users through the service-role credential.
async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<UsersResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);

    match state.directory.list_users(page, per_page).await {
        Ok(users) => Ok(Json(UsersResponse { users })),
        Err(BackendError::Unconfigured(what)) => Err(AppError::Misconfigured(what.into())),
        Err(BackendError::Rejected { status, message }) => {
            tracing::warn!(status, %message, "User listing rejected by backend");
            Err(AppError::BadRequest(message))
        }
        Err(err) => Err(AppError::Internal(anyhow::anyhow!("User listing failed: {err}"))),
    }
}

/// PUT /api/admin/users/{id}/role — assign a role to another user.
async fn update_role(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path(id): Path<String>,
    Json(body): Json<UpdateRoleBody>,
) -> AppResult<Json<RoleResponse>> {
    let role = Role::parse(&body.role)
        .ok_or_else(|| AppError::BadRequest("Invalid role".into()))?;
    if id.trim().is_empty() {
        return Err(AppError::BadRequest("User id is required".into()));
    }

    if state.roles.set_role(Some(&caller), &id, role).await {
        return Ok(Json(RoleResponse { user_id: id, role }));
    }

    // The guard let the caller through, so a refusal is either a demotion in
    // the meantime or a failed write.
    if !state.roles.is_admin(Some(&caller)).await {
        return Err(AppError::Forbidden);
    }
    Err(AppError::BadGateway("Role update failed".into()))
}
