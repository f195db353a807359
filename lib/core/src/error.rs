use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Clients match on these —
// never on the human-readable message string.

/// Stable error code constants.
///
/// Clients should match on `code` from `{"code": "NOT_FOUND", "message": "..."}`.
/// Codes never change; messages may be reworded.
pub mod error_code {
    pub const INVALID_PAYLOAD: &str = "INVALID_PAYLOAD";
    pub const INVALID_SIGNATURE: &str = "INVALID_SIGNATURE";
    pub const ASSERTION_EXPIRED: &str = "ASSERTION_EXPIRED";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INVALID_IDENTIFIER: &str = "INVALID_IDENTIFIER";
    pub const INVALID_ROLE: &str = "INVALID_ROLE";
    pub const ROLE_CONFLICT: &str = "ROLE_CONFLICT";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const NOT_CONFIGURED: &str = "NOT_CONFIGURED";
    pub const INTERNAL: &str = "INTERNAL";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified service error type used across all modules.
///
/// Each variant maps to a stable error code (see [`error_code`]) and an
/// HTTP status code. The JSON response always includes both:
///
/// ```json
/// {"code": "ROLE_CONFLICT", "message": "role already set", "current_role": "customer"}
/// ```
///
/// `RoleConflict` additionally reports the role the account already holds,
/// so the caller can react without retrying blindly.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed or missing request fields. HTTP 400.
    #[error("{0}")]
    InvalidPayload(String),

    /// Login assertion signature did not verify. HTTP 401.
    #[error("invalid login signature")]
    InvalidSignature,

    /// Login assertion is older than the freshness window. HTTP 401.
    #[error("login assertion expired")]
    AssertionExpired,

    /// Missing or invalid session credentials. HTTP 401.
    #[error("{0}")]
    Unauthorized(String),

    /// Resource does not exist. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Public identifier matches neither known encoding. HTTP 400.
    #[error("{0}")]
    InvalidIdentifier(String),

    /// Requested role is outside the allowed set. HTTP 400.
    #[error("{0}")]
    InvalidRole(String),

    /// Role already decided differently. HTTP 409.
    #[error("role already set to '{current}'")]
    RoleConflict { current: String },

    /// Storage backend unreachable or failing. HTTP 503.
    #[error("{0}")]
    Storage(String),

    /// Required secret or material missing at startup. HTTP 500.
    #[error("{0}")]
    NotConfigured(String),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::InvalidPayload(_) => error_code::INVALID_PAYLOAD,
            ServiceError::InvalidSignature => error_code::INVALID_SIGNATURE,
            ServiceError::AssertionExpired => error_code::ASSERTION_EXPIRED,
            ServiceError::Unauthorized(_) => error_code::UNAUTHENTICATED,
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::InvalidIdentifier(_) => error_code::INVALID_IDENTIFIER,
            ServiceError::InvalidRole(_) => error_code::INVALID_ROLE,
            ServiceError::RoleConflict { .. } => error_code::ROLE_CONFLICT,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::NotConfigured(_) => error_code::NOT_CONFIGURED,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ServiceError::InvalidSignature => StatusCode::UNAUTHORIZED,
            ServiceError::AssertionExpired => StatusCode::UNAUTHORIZED,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            ServiceError::InvalidRole(_) => StatusCode::BAD_REQUEST,
            ServiceError::RoleConflict { .. } => StatusCode::CONFLICT,
            ServiceError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        });
        if let ServiceError::RoleConflict { ref current } = self {
            body["current_role"] = serde_json::json!(current);
        }
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping() {
        assert_eq!(ServiceError::InvalidPayload("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::InvalidSignature.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ServiceError::AssertionExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ServiceError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ServiceError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ServiceError::InvalidIdentifier("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::InvalidRole("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServiceError::RoleConflict { current: "customer".into() }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(ServiceError::Storage("x".into()).status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ServiceError::NotConfigured("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ServiceError::Internal("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_code_mapping() {
        assert_eq!(ServiceError::InvalidPayload("x".into()).error_code(), "INVALID_PAYLOAD");
        assert_eq!(ServiceError::InvalidSignature.error_code(), "INVALID_SIGNATURE");
        assert_eq!(ServiceError::AssertionExpired.error_code(), "ASSERTION_EXPIRED");
        assert_eq!(ServiceError::Unauthorized("x".into()).error_code(), "UNAUTHENTICATED");
        assert_eq!(ServiceError::NotFound("x".into()).error_code(), "NOT_FOUND");
        assert_eq!(ServiceError::InvalidIdentifier("x".into()).error_code(), "INVALID_IDENTIFIER");
        assert_eq!(ServiceError::InvalidRole("x".into()).error_code(), "INVALID_ROLE");
        assert_eq!(
            ServiceError::RoleConflict { current: "executor".into() }.error_code(),
            "ROLE_CONFLICT"
        );
        assert_eq!(ServiceError::Storage("x".into()).error_code(), "STORAGE_ERROR");
        assert_eq!(ServiceError::NotConfigured("x".into()).error_code(), "NOT_CONFIGURED");
        assert_eq!(ServiceError::Internal("x".into()).error_code(), "INTERNAL");
    }

    #[test]
    fn role_conflict_message_names_current_role() {
        let err = ServiceError::RoleConflict { current: "customer".into() };
        assert_eq!(err.to_string(), "role already set to 'customer'");
    }

    #[test]
    fn json_response_status() {
        let err = ServiceError::NotFound("account 'abc' not found".into());
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
