use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use taskmarket_core::ServiceError;

use crate::api::AppState;
use crate::model::AccountView;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(batch_lookup))
        .route("/accounts/{public_id}", get(get_account))
}

/// GET /identity/accounts/{public_id} — resolve one public identifier.
async fn get_account(
    State(svc): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Json<AccountView>, ServiceError> {
    let account = svc
        .resolve_by_public_id(&public_id)
        .map_err(ServiceError::from)?;
    Ok(Json(AccountView::from(&account)))
}

#[derive(Deserialize)]
struct BatchParams {
    #[serde(default)]
    ids: String,
}

/// GET /identity/accounts?ids=a,b,c — batch lookup of up to 200
/// comma-separated public identifiers. Results keep the caller's
/// order; unresolved identifiers are silently omitted. Empty input
/// yields an empty list, never an error.
async fn batch_lookup(
    State(svc): State<AppState>,
    Query(params): Query<BatchParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let candidates: Vec<String> = params
        .ids
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let accounts = svc
        .resolve_batch(&candidates)
        .map_err(ServiceError::from)?;
    let items: Vec<AccountView> = accounts.iter().map(AccountView::from).collect();
    Ok(Json(serde_json::json!({ "items": items })))
}
