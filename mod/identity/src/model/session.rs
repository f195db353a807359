use serde::{Deserialize, Serialize};

/// JWT claims payload for a session credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: internal account id.
    pub sub: String,

    /// External provider identity, when the account has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tg: Option<String>,

    /// Issued at (unix timestamp).
    pub iat: i64,

    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// Signed session credential returned after login.
#[derive(Debug, Clone, Serialize)]
pub struct SessionToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}
