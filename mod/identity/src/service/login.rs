use serde_json::Value;

use taskmarket_core::now_unix;

use crate::model::{Account, LoginAssertion, SessionToken};
use crate::service::{IdentityError, IdentityService, verify};

impl IdentityService {
    /// Handle a signed login assertion end to end: verify the
    /// signature, enforce the freshness window, resolve or create the
    /// account, and mint a session credential.
    ///
    /// Freshness is checked after the signature so a correctly signed
    /// but stale assertion is still rejected, and the error taxonomy
    /// distinguishes the two without leaking anything about the
    /// canonical form or the secret.
    pub fn login(
        &self,
        fields: &serde_json::Map<String, Value>,
    ) -> Result<(Account, SessionToken), IdentityError> {
        let assertion = LoginAssertion::from_map(fields)?;

        if !verify::verify_assertion(fields, &self.config.login_secret) {
            return Err(IdentityError::InvalidSignature);
        }

        if !verify::is_fresh(
            assertion.issued_at,
            now_unix(),
            self.config.max_assertion_age_secs,
        ) {
            return Err(IdentityError::AssertionExpired);
        }

        let account = self.resolve_or_create(&assertion.external_id, &assertion.profile)?;
        tracing::debug!(account = %account.id, external = %assertion.external_id, "login verified");

        let token = self.issue_session(&account)?;
        Ok((account, token))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use taskmarket_core::now_unix;

    use crate::model::Role;
    use crate::service::test_support::{test_service, test_service_with};
    use crate::service::verify::tests::sign_fields;
    use crate::service::{IdentityConfig, IdentityError};

    fn assertion(id: &str, auth_date: i64, secret: &str) -> serde_json::Map<String, Value> {
        let mut fields = serde_json::json!({
            "id": id,
            "auth_date": auth_date,
            "first_name": "Ann",
            "username": "ann",
        })
        .as_object()
        .unwrap()
        .clone();
        sign_fields(&mut fields, secret);
        fields
    }

    #[test]
    fn test_login_creates_pending_account_and_token() {
        let svc = test_service();
        let fields = assertion("100", now_unix(), "taskmarket-dev-login-secret");

        let (account, token) = svc.login(&fields).unwrap();
        assert_eq!(account.external_id.as_deref(), Some("100"));
        assert_eq!(account.role, Role::Pending);
        assert_eq!(account.profile.first_name.as_deref(), Some("Ann"));

        let claims = svc.verify_session(&token.access_token).unwrap();
        assert_eq!(claims.sub, account.id);
    }

    #[test]
    fn test_login_twice_reuses_account() {
        let svc = test_service();
        let fields = assertion("100", now_unix(), "taskmarket-dev-login-secret");
        let (first, _) = svc.login(&fields).unwrap();
        let (second, _) = svc.login(&fields).unwrap();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_tampered_id_is_rejected() {
        let svc = test_service();
        let mut fields = assertion("1", now_unix(), "taskmarket-dev-login-secret");
        fields.insert("id".into(), Value::String("2".into()));
        assert!(matches!(
            svc.login(&fields),
            Err(IdentityError::InvalidSignature)
        ));
    }

    #[test]
    fn test_stale_assertion_rejected_despite_valid_signature() {
        let svc = test_service();
        let stale = now_unix() - 86401;
        let fields = assertion("100", stale, "taskmarket-dev-login-secret");
        assert!(matches!(
            svc.login(&fields),
            Err(IdentityError::AssertionExpired)
        ));
    }

    #[test]
    fn test_custom_freshness_window() {
        let svc = test_service_with(IdentityConfig {
            max_assertion_age_secs: 60,
            ..Default::default()
        });
        let fields = assertion("100", now_unix() - 120, "taskmarket-dev-login-secret");
        assert!(matches!(
            svc.login(&fields),
            Err(IdentityError::AssertionExpired)
        ));
    }

    #[test]
    fn test_missing_fields_are_payload_errors() {
        let svc = test_service();
        let fields = serde_json::json!({"first_name": "Ann"})
            .as_object()
            .unwrap()
            .clone();
        assert!(matches!(
            svc.login(&fields),
            Err(IdentityError::InvalidPayload(_))
        ));
    }
}
