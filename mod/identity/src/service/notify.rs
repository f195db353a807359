use thiserror::Error;

use crate::model::{Account, Role};

/// Chat-bot notification failure modes, independent of the identity
/// core's own taxonomy: a failed notification never fails the
/// transaction that triggered it.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("account has no linked chat identity")]
    NotLinked,

    #[error("bot integration is disabled")]
    BotDisabled,

    #[error("send failed: {0}")]
    Send(String),
}

/// Fire-and-forget collaborator informed when a role is first assigned.
/// Message dispatch itself is external; implementations live outside
/// this module.
pub trait RoleNotifier: Send + Sync {
    fn role_assigned(&self, account: &Account, role: Role) -> Result<(), NotifyError>;
}

/// Notifier that does nothing. Used in tests and when no bot is wired.
pub struct NoopNotifier;

impl RoleNotifier for NoopNotifier {
    fn role_assigned(&self, _account: &Account, _role: Role) -> Result<(), NotifyError> {
        Ok(())
    }
}
