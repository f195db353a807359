pub mod account;
pub mod login;
pub mod notify;
pub mod role;
pub mod schema;
pub mod session;
pub mod verify;

use std::sync::Arc;

use thiserror::Error;

use taskmarket_sql::{SQLError, SQLStore};

use crate::model::Role;
use crate::service::notify::RoleNotifier;

/// Identity service error type. Variants mirror the module's stable
/// error taxonomy; `From<IdentityError>` maps them onto the shared
/// `ServiceError` for HTTP responses.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("assertion expired")]
    AssertionExpired,

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("role already set to '{current}'")]
    RoleConflict { current: Role },

    #[error("storage: {0}")]
    Storage(String),

    #[error("not configured: {0}")]
    NotConfigured(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<SQLError> for IdentityError {
    fn from(e: SQLError) -> Self {
        IdentityError::Storage(e.to_string())
    }
}

impl From<IdentityError> for taskmarket_core::ServiceError {
    fn from(e: IdentityError) -> Self {
        use taskmarket_core::ServiceError;
        match e {
            IdentityError::InvalidPayload(m) => ServiceError::InvalidPayload(m),
            IdentityError::InvalidSignature => ServiceError::InvalidSignature,
            IdentityError::AssertionExpired => ServiceError::AssertionExpired,
            IdentityError::Unauthorized(m) => ServiceError::Unauthorized(m),
            IdentityError::NotFound(m) => ServiceError::NotFound(m),
            IdentityError::InvalidIdentifier(m) => ServiceError::InvalidIdentifier(m),
            IdentityError::InvalidRole(m) => ServiceError::InvalidRole(m),
            IdentityError::RoleConflict { current } => ServiceError::RoleConflict {
                current: current.as_str().to_string(),
            },
            IdentityError::Storage(m) => ServiceError::Storage(m),
            IdentityError::NotConfigured(m) => ServiceError::NotConfigured(m),
            IdentityError::Internal(m) => ServiceError::Internal(m),
        }
    }
}

/// Configuration for the identity service.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Shared secret the login widget signs assertions with.
    pub login_secret: String,
    /// JWT signing secret for session credentials.
    pub jwt_secret: String,
    /// Maximum accepted assertion age in seconds (default: 24h).
    pub max_assertion_age_secs: i64,
    /// Session credential lifetime in seconds (default: 30 days).
    pub session_ttl_secs: i64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            login_secret: "taskmarket-dev-login-secret".to_string(),
            jwt_secret: "taskmarket-dev-jwt-secret-change-me".to_string(),
            max_assertion_age_secs: 86400,       // 24h
            session_ttl_secs: 30 * 24 * 3600,    // 30 days
        }
    }
}

/// The identity service. Holds the account store, configuration and
/// the chat-bot notifier collaborator.
pub struct IdentityService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) config: IdentityConfig,
    pub(crate) notifier: Arc<dyn RoleNotifier>,
}

impl IdentityService {
    /// Create a new IdentityService, initializing the DB schema.
    ///
    /// Missing secrets are an operator error and fail fast, distinct
    /// from any runtime verification failure.
    pub fn new(
        sql: Arc<dyn SQLStore>,
        config: IdentityConfig,
        notifier: Arc<dyn RoleNotifier>,
    ) -> Result<Arc<Self>, IdentityError> {
        if config.login_secret.is_empty() {
            return Err(IdentityError::NotConfigured("login secret is empty".into()));
        }
        if config.jwt_secret.is_empty() {
            return Err(IdentityError::NotConfigured("jwt secret is empty".into()));
        }
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self {
            sql,
            config,
            notifier,
        }))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use taskmarket_sql::SqliteStore;

    use super::{IdentityConfig, IdentityService};
    use crate::service::notify::NoopNotifier;

    pub fn test_service() -> Arc<IdentityService> {
        test_service_with(IdentityConfig::default())
    }

    pub fn test_service_with(config: IdentityConfig) -> Arc<IdentityService> {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        IdentityService::new(sql, config, Arc::new(NoopNotifier)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use taskmarket_sql::SqliteStore;

    use super::*;
    use crate::service::notify::NoopNotifier;

    #[test]
    fn test_empty_secrets_fail_fast() {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        let config = IdentityConfig {
            login_secret: String::new(),
            ..Default::default()
        };
        let err = IdentityService::new(sql, config, Arc::new(NoopNotifier))
            .err()
            .unwrap();
        assert!(matches!(err, IdentityError::NotConfigured(_)));

        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        let config = IdentityConfig {
            jwt_secret: String::new(),
            ..Default::default()
        };
        let err = IdentityService::new(sql, config, Arc::new(NoopNotifier))
            .err()
            .unwrap();
        assert!(matches!(err, IdentityError::NotConfigured(_)));
    }
}
