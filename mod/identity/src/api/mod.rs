mod accounts;
mod login;
mod me;
mod middleware;

use std::sync::Arc;

use axum::Router;

use crate::service::IdentityService;

/// Shared application state.
pub type AppState = Arc<IdentityService>;

/// Build the complete identity API router, mounted under `/identity`.
pub fn build_router(svc: Arc<IdentityService>) -> Router {
    let api = Router::new()
        .merge(login::routes())
        .merge(accounts::routes())
        .merge(me::routes());

    Router::new()
        .nest("/identity", api)
        .layer(axum::middleware::from_fn_with_state(
            svc.clone(),
            middleware::auth_middleware,
        ))
        .with_state(svc)
}
