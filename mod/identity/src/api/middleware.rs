use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, middleware::Next};
use serde_json::json;

use taskmarket_core::error::error_code;

use crate::api::AppState;

/// Paths that don't require a session credential.
const PUBLIC_PATHS: &[&str] = &["/identity/login"];

/// Session authentication middleware.
///
/// Checks for a Bearer token in the Authorization header; the login
/// endpoint is excluded. On success the decoded Claims are stored as a
/// request Extension for handlers to access via `Extension<Claims>`.
pub async fn auth_middleware(
    State(svc): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    if is_public_path(&path) {
        return next.run(req).await;
    }

    let token = match extract_bearer(req.headers()) {
        Some(t) => t.to_string(),
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "code": error_code::UNAUTHENTICATED,
                    "message": "missing authorization header",
                })),
            )
                .into_response();
        }
    };

    match svc.verify_session(&token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => taskmarket_core::ServiceError::from(e).into_response(),
    }
}

/// Extract the Bearer token from Authorization header.
fn extract_bearer(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Check if a path is public (no auth required).
fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        assert!(is_public_path("/identity/login"));
        assert!(!is_public_path("/identity/me"));
        assert!(!is_public_path("/identity/accounts/tg_1"));
    }

    #[test]
    fn test_extract_bearer() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert("authorization", "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(extract_bearer(&headers), Some("abc.def.ghi"));

        let mut headers = axum::http::HeaderMap::new();
        headers.insert("authorization", "Basic dXNlcg==".parse().unwrap());
        assert_eq!(extract_bearer(&headers), None);

        assert_eq!(extract_bearer(&axum::http::HeaderMap::new()), None);
    }
}
