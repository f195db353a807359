use serde_json::Value;

use crate::model::Profile;
use crate::service::IdentityError;

/// The typed view of a verified login assertion.
///
/// The wire payload is a flat JSON object signed by the login widget;
/// signature verification runs over the raw field map (see
/// `service::verify`), and this type extracts the fields the identity
/// flow needs afterwards.
#[derive(Debug, Clone)]
pub struct LoginAssertion {
    /// External provider identity.
    pub external_id: String,
    /// Provider-issued login timestamp (unix seconds).
    pub issued_at: i64,
    /// Profile fields supplied by the provider.
    pub profile: Profile,
}

impl LoginAssertion {
    /// Extract the required fields from the raw assertion map.
    /// Missing or malformed required fields are an `invalid_payload`
    /// error, distinct from a signature failure.
    pub fn from_map(fields: &serde_json::Map<String, Value>) -> Result<Self, IdentityError> {
        let external_id = match fields.get("id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(IdentityError::InvalidPayload("missing field 'id'".into())),
        };

        let issued_at = match fields.get("auth_date") {
            Some(Value::Number(n)) if n.is_i64() => n.as_i64().unwrap_or(0),
            Some(Value::String(s)) => s
                .parse::<i64>()
                .map_err(|_| IdentityError::InvalidPayload("malformed field 'auth_date'".into()))?,
            _ => {
                return Err(IdentityError::InvalidPayload(
                    "missing field 'auth_date'".into(),
                ));
            }
        };

        if !fields.get("hash").is_some_and(Value::is_string) {
            return Err(IdentityError::InvalidPayload("missing field 'hash'".into()));
        }

        let profile = Profile {
            first_name: str_field(fields, "first_name"),
            last_name: str_field(fields, "last_name"),
            username: str_field(fields, "username"),
            photo_url: str_field(fields, "photo_url"),
        };

        Ok(LoginAssertion {
            external_id,
            issued_at,
            profile,
        })
    }
}

fn str_field(fields: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(json: serde_json::Value) -> serde_json::Map<String, Value> {
        json.as_object().unwrap().clone()
    }

    #[test]
    fn test_from_map_accepts_numeric_id() {
        let a = LoginAssertion::from_map(&map(serde_json::json!({
            "id": 42,
            "auth_date": 1700000000,
            "hash": "ff",
            "first_name": "Ann",
        })))
        .unwrap();
        assert_eq!(a.external_id, "42");
        assert_eq!(a.issued_at, 1700000000);
        assert_eq!(a.profile.first_name.as_deref(), Some("Ann"));
    }

    #[test]
    fn test_from_map_missing_fields() {
        let no_id = LoginAssertion::from_map(&map(serde_json::json!({
            "auth_date": 1, "hash": "ff"
        })));
        assert!(matches!(no_id, Err(IdentityError::InvalidPayload(_))));

        let no_date = LoginAssertion::from_map(&map(serde_json::json!({
            "id": "1", "hash": "ff"
        })));
        assert!(matches!(no_date, Err(IdentityError::InvalidPayload(_))));

        let no_hash = LoginAssertion::from_map(&map(serde_json::json!({
            "id": "1", "auth_date": 1
        })));
        assert!(matches!(no_hash, Err(IdentityError::InvalidPayload(_))));
    }

    #[test]
    fn test_empty_profile_fields_become_none() {
        let a = LoginAssertion::from_map(&map(serde_json::json!({
            "id": "1",
            "auth_date": "1700000000",
            "hash": "ff",
            "last_name": "",
        })))
        .unwrap();
        assert_eq!(a.profile.last_name, None);
    }
}
