use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use taskmarket_core::ServiceError;

use crate::api::AppState;
use crate::model::AccountView;

pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// POST /identity/login — verify a signed login assertion and issue a
/// session credential. The body is the login widget's flat field map.
async fn login(
    State(svc): State<AppState>,
    Json(fields): Json<serde_json::Map<String, serde_json::Value>>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let (account, token) = svc.login(&fields).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "access_token": token.access_token,
        "token_type": token.token_type,
        "expires_in": token.expires_in,
        "account": AccountView::from(&account),
    })))
}
