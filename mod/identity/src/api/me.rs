use axum::extract::{Extension, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use taskmarket_core::ServiceError;

use crate::api::AppState;
use crate::model::{AccountView, Claims};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/me/role", post(assign_role))
}

/// GET /identity/me — the authenticated account.
async fn me(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<AccountView>, ServiceError> {
    let account = svc
        .find_by_internal_id(&claims.sub)
        .map_err(ServiceError::from)?
        .ok_or_else(|| ServiceError::NotFound(format!("account '{}'", claims.sub)))?;
    Ok(Json(AccountView::from(&account)))
}

#[derive(Deserialize)]
struct RoleRequest {
    role: String,
}

/// POST /identity/me/role — one-time role assignment for the
/// authenticated account. A conflicting earlier decision comes back as
/// HTTP 409 with the current role in the body.
async fn assign_role(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<RoleRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let role = svc
        .assign_role(&claims.sub, &body.role)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({ "ok": true, "role": role })))
}
