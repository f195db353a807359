use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use taskmarket_core::now_unix;

use crate::model::{Account, Claims, SessionToken};
use crate::service::{IdentityError, IdentityService};

impl IdentityService {
    /// Issue a session credential for an account: a signed token with a
    /// fixed validity window, binding the internal id and, when
    /// present, the external identity.
    pub fn issue_session(&self, account: &Account) -> Result<SessionToken, IdentityError> {
        let now = now_unix();
        let claims = Claims {
            sub: account.id.clone(),
            tg: account.external_id.clone(),
            iat: now,
            exp: now + self.config.session_ttl_secs,
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| IdentityError::Internal(format!("JWT encode failed: {}", e)))?;

        Ok(SessionToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.session_ttl_secs,
        })
    }

    /// Verify a presented session credential (signature + expiry are
    /// the signing primitive's checks) and return its claims.
    pub fn verify_session(&self, token: &str) -> Result<Claims, IdentityError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| IdentityError::Unauthorized(format!("invalid token: {}", e)))?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use taskmarket_core::now_unix;

    use crate::model::Profile;
    use crate::service::IdentityError;
    use crate::service::test_support::test_service;

    #[test]
    fn test_issue_and_verify() {
        let svc = test_service();
        let account = svc.create_from_external("42", &Profile::default()).unwrap();

        let token = svc.issue_session(&account).unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 30 * 24 * 3600);

        let claims = svc.verify_session(&token.access_token).unwrap();
        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.tg.as_deref(), Some("42"));
        assert!(claims.exp - claims.iat == 30 * 24 * 3600);
        assert!(claims.exp > now_unix());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let svc = test_service();
        let err = svc.verify_session("this.is.not.a.valid.jwt").unwrap_err();
        assert!(matches!(err, IdentityError::Unauthorized(_)));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let svc = test_service();
        let other = crate::service::test_support::test_service_with(
            crate::service::IdentityConfig {
                jwt_secret: "a-different-secret".into(),
                ..Default::default()
            },
        );
        let account = svc.create_from_external("42", &Profile::default()).unwrap();
        let token = svc.issue_session(&account).unwrap();
        assert!(other.verify_session(&token.access_token).is_err());
    }
}
