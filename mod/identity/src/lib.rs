//! Identity module — login-assertion verification, identity mapping
//! and one-time role assignment.
//!
//! # Resources
//!
//! - **Account** — durable internal identity, optionally mapped to an
//!   external login-provider identity
//! - **PublicId** — the externally-visible identifier scheme
//!   (`tg_<external id>` or the internal id)
//! - **Role** — `pending → customer | executor`, assigned exactly once
//! - **Session** — 30-day JWT credential binding both identities
//!
//! # Usage
//!
//! ```ignore
//! use identity::{IdentityModule, service::IdentityConfig};
//!
//! let module = IdentityModule::new(sql, IdentityConfig::default(), notifier)?;
//! let router = module.routes(); // Already prefixed with /identity
//! ```

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use taskmarket_core::Module;
use taskmarket_sql::SQLStore;

use crate::service::notify::RoleNotifier;
use crate::service::{IdentityConfig, IdentityService};

/// Identity module implementing the Module trait.
///
/// Holds the IdentityService and provides HTTP routes for login,
/// account resolution and role assignment.
pub struct IdentityModule {
    service: Arc<IdentityService>,
}

impl IdentityModule {
    /// Create a new IdentityModule.
    pub fn new(
        sql: Arc<dyn SQLStore>,
        config: IdentityConfig,
        notifier: Arc<dyn RoleNotifier>,
    ) -> Result<Self, taskmarket_core::ServiceError> {
        let service = IdentityService::new(sql, config, notifier)
            .map_err(taskmarket_core::ServiceError::from)?;
        Ok(Self { service })
    }

    /// Get a reference to the underlying IdentityService.
    pub fn service(&self) -> &Arc<IdentityService> {
        &self.service
    }
}

impl Module for IdentityModule {
    fn name(&self) -> &str {
        "identity"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
