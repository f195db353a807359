use taskmarket_core::now_rfc3339;
use taskmarket_sql::Value;

use crate::model::{Account, Role};
use crate::service::{IdentityError, IdentityService};

impl IdentityService {
    /// Assign an account's role, exactly once, from `pending`.
    ///
    /// Re-affirming the role the account already holds succeeds
    /// idempotently without a write. A role decided differently — by
    /// an earlier request or by a concurrent one that won the race —
    /// is a conflict reporting the actual current role.
    pub fn assign_role(&self, id: &str, requested: &str) -> Result<Role, IdentityError> {
        let requested = Role::parse_assignable(requested).ok_or_else(|| {
            IdentityError::InvalidRole(format!(
                "role must be 'customer' or 'executor', got '{}'",
                requested
            ))
        })?;

        loop {
            let account = self
                .find_by_internal_id(id)?
                .ok_or_else(|| IdentityError::NotFound(format!("account '{}'", id)))?;

            if account.role == requested {
                return Ok(requested);
            }

            if account.role != Role::Pending {
                return Err(IdentityError::RoleConflict {
                    current: account.role,
                });
            }

            if self.set_role_if_matches(&account, Role::Pending, requested)? {
                tracing::info!(account = %account.id, role = %requested, "role assigned");
                self.notify_role_assigned(&account, requested);
                return Ok(requested);
            }

            // Missed the write guard: either another assignment decided
            // the role (classified as idempotent success or conflict on
            // the next read) or a concurrent profile merge bumped the
            // record while the role stayed pending. Re-read and retry.
        }
    }

    /// Conditional role write: succeeds only when the stored record is
    /// still exactly the snapshot the new record was built from (same
    /// role, same `updated_at`), so a concurrent profile merge is never
    /// clobbered by stale `data`. Returns whether the write took effect.
    fn set_role_if_matches(
        &self,
        account: &Account,
        expected: Role,
        new_role: Role,
    ) -> Result<bool, IdentityError> {
        let mut updated = account.clone();
        updated.role = new_role;
        updated.updated_at = now_rfc3339();
        let data = serde_json::to_string(&updated)
            .map_err(|e| IdentityError::Internal(e.to_string()))?;

        let affected = self.sql.exec(
            "UPDATE accounts SET role = ?1, data = ?2, updated_at = ?3 \
             WHERE id = ?4 AND role = ?5 AND updated_at = ?6",
            &[
                Value::Text(new_role.as_str().to_string()),
                Value::Text(data),
                Value::Text(updated.updated_at),
                Value::Text(account.id.clone()),
                Value::Text(expected.as_str().to_string()),
                Value::Text(account.updated_at.clone()),
            ],
        )?;
        Ok(affected == 1)
    }

    /// Best-effort chat-bot notification. Its failure modes are its
    /// own and never affect the role assignment's outcome.
    fn notify_role_assigned(&self, account: &Account, role: Role) {
        if let Err(e) = self.notifier.role_assigned(account, role) {
            tracing::warn!(account = %account.id, error = %e, "role notification failed");
        }
    }
}
