//! Login assertion signature verification.
//!
//! The login widget signs a flat field map: the `hash` field carries a
//! hex HMAC-SHA-256 digest of the remaining fields, canonicalized as
//! lexicographically sorted `key=value` lines, keyed with the SHA-256
//! digest of the shared secret. Verification is a pure function and
//! never fails with an error — only `false`.

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// The field carrying the assertion's own signature. Excluded from the
/// canonical string to avoid circular inclusion.
pub const SIGNATURE_FIELD: &str = "hash";

/// Verify a signed login assertion against the shared secret.
///
/// Malformed input (missing/non-string signature, non-scalar field
/// values, bad hex) yields `false`. The digest comparison is constant
/// time; a wrong-length signature is an immediate failure.
pub fn verify_assertion(fields: &serde_json::Map<String, Value>, shared_secret: &str) -> bool {
    let Some(signature) = fields.get(SIGNATURE_FIELD).and_then(Value::as_str) else {
        return false;
    };

    let Some(canonical) = canonical_string(fields) else {
        return false;
    };

    let sig_bytes = match hex::decode(signature) {
        // HMAC-SHA-256 digests are exactly 32 bytes; anything else
        // cannot match and is rejected before the MAC comparison.
        Ok(bytes) if bytes.len() == 32 => bytes,
        _ => return false,
    };

    let secret_key = Sha256::digest(shared_secret.as_bytes());
    let Ok(mut mac) = HmacSha256::new_from_slice(&secret_key) else {
        return false;
    };
    mac.update(canonical.as_bytes());

    // verify_slice compares in constant time.
    mac.verify_slice(&sig_bytes).is_ok()
}

/// Build the canonical string: drop the signature field and null
/// values, sort the remaining keys lexicographically, join `key=value`
/// pairs with newlines. Non-scalar values make the assertion
/// unverifiable (None).
fn canonical_string(fields: &serde_json::Map<String, Value>) -> Option<String> {
    let mut pairs: Vec<(&str, String)> = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        if key == SIGNATURE_FIELD {
            continue;
        }
        let rendered = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(_) | Value::Object(_) => return None,
        };
        pairs.push((key.as_str(), rendered));
    }
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let lines: Vec<String> = pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    Some(lines.join("\n"))
}

/// Whether an assertion issued at `issued_at` (unix seconds) is still
/// within the freshness window. A policy check, separate from the
/// signature math: callers evaluate it even when the signature is
/// valid. Future-dated assertions pass (clock skew tolerance).
pub fn is_fresh(issued_at: i64, now: i64, max_age_secs: i64) -> bool {
    now - issued_at <= max_age_secs
}
