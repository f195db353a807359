use crate::model::Account;

/// Prefix marking a public identifier as external-identity-addressed.
///
/// External identities are provider-issued numeric ids, so the encoded
/// form is `tg_` followed by digits. Internal ids are 32 hex characters
/// and never start with `tg_` + digits, so the two namespaces cannot
/// collide.
pub const EXTERNAL_PREFIX: &str = "tg_";

const INTERNAL_ID_LEN: usize = 32;

/// A decoded public identifier — the only way to obtain a selector.
/// Raw identifier strings are never pattern-matched anywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicId {
    /// Addressed by the external provider identity.
    External(String),
    /// Addressed by the internal account id.
    Internal(String),
}

impl PublicId {
    /// Decode a public identifier. The external form is matched first
    /// (anchored prefix + one or more digits); anything else must be a
    /// valid internal-id literal. Returns None for unknown encodings.
    pub fn decode(s: &str) -> Option<PublicId> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix(EXTERNAL_PREFIX) {
            if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                return Some(PublicId::External(rest.to_string()));
            }
            return None;
        }
        if s.len() == INTERNAL_ID_LEN && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            // Internal ids are generated lowercase; accept any case.
            return Some(PublicId::Internal(s.to_ascii_lowercase()));
        }
        None
    }
}

/// Encode the externally-visible identifier for an account: the
/// prefixed external identity when one is present, the internal id
/// otherwise.
pub fn encode_public_id(account: &Account) -> String {
    match &account.external_id {
        Some(ext) => format!("{}{}", EXTERNAL_PREFIX, ext),
        None => account.id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Profile, Role};

    fn account(external: Option<&str>) -> Account {
        Account {
            id: "0123456789abcdef0123456789abcdef".into(),
            external_id: external.map(|s| s.to_string()),
            role: Role::Pending,
            profile: Profile::default(),
            created_at: "2026-01-01T00:00:00Z".into(),
            updated_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_roundtrip_external() {
        let a = account(Some("42"));
        let encoded = encode_public_id(&a);
        assert_eq!(encoded, "tg_42");
        assert_eq!(PublicId::decode(&encoded), Some(PublicId::External("42".into())));
    }

    #[test]
    fn test_roundtrip_internal() {
        let a = account(None);
        let encoded = encode_public_id(&a);
        assert_eq!(
            PublicId::decode(&encoded),
            Some(PublicId::Internal(a.id.clone()))
        );
    }

    #[test]
    fn test_internal_id_case_insensitive() {
        assert_eq!(
            PublicId::decode("0123456789ABCDEF0123456789ABCDEF"),
            Some(PublicId::Internal("0123456789abcdef0123456789abcdef".into()))
        );
    }

    #[test]
    fn test_invalid_identifiers() {
        assert_eq!(PublicId::decode(""), None);
        assert_eq!(PublicId::decode("tg_"), None);
        assert_eq!(PublicId::decode("tg_12x"), None);
        assert_eq!(PublicId::decode("tg_1 2"), None);
        assert_eq!(PublicId::decode("not_a_real_id"), None);
        assert_eq!(PublicId::decode("0123456789abcdef"), None); // too short
        assert_eq!(PublicId::decode("z123456789abcdef0123456789abcdef"), None); // non-hex
    }

    #[test]
    fn test_prefix_match_wins_over_internal_parse() {
        // A 32-char string starting with the prefix is decoded on the
        // external branch or rejected — never misread as an internal id.
        let s = format!("tg_{}", "1".repeat(29));
        assert_eq!(PublicId::decode(&s), Some(PublicId::External("1".repeat(29))));
    }
}
