//! Expiry checks on the bearer token.
//!
//! Only the payload's `exp` claim is read. The signature is never verified
//! here; the backend does that on every request. A token that does not decode
//! as a JWT is unusable and gets discarded like an expired one. A decodable
//! token without `exp` never expires locally.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Claims {
    /// Unix-epoch seconds. Some issuers emit fractional values.
    pub exp: Option<f64>,
}

/// Reads the claim set from the payload segment of a JWT, if it has one.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let mut segments = token.split('.');
    let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// A token is usable only if it decodes and, when it carries `exp`, while `now < exp`.
pub fn is_usable_at(token: &str, now_secs: f64) -> bool {
    match decode_claims(token) {
        Some(Claims { exp: Some(exp) }) => now_secs < exp,
        Some(Claims { exp: None }) => true,
        None => false,
    }
}

pub fn is_usable(token: &str) -> bool {
    is_usable_at(token, now_secs())
}

fn now_secs() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

#[cfg(test)]
pub(crate) fn jwt_with_claims(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_past_exp_is_unusable() {
        let token = jwt_with_claims(json!({ "id": "u1", "exp": 1_000 }));
        assert!(!is_usable_at(&token, 1_001.0));
    }

    #[test]
    fn test_exp_equal_to_now_is_unusable() {
        let token = jwt_with_claims(json!({ "exp": 5_000 }));
        assert!(!is_usable_at(&token, 5_000.0));
        assert!(is_usable_at(&token, 4_999.5));
    }

    #[test]
    fn test_missing_exp_never_expires() {
        let token = jwt_with_claims(json!({ "id": "u1" }));
        assert!(is_usable_at(&token, f64::MAX));
    }

    #[test]
    fn test_undecodable_token_is_unusable() {
        assert!(decode_claims("not-a-jwt").is_none());
        assert!(!is_usable("not-a-jwt"));
        assert!(!is_usable("a.b.c.d"));
        assert!(!is_usable("aGVhZGVy.bm90IGpzb24.c2ln"));
    }

    #[test]
    fn test_future_exp_is_usable() {
        let exp = Utc::now().timestamp() + 3_600;
        let token = jwt_with_claims(json!({ "exp": exp }));
        assert!(is_usable(&token));
    }
}
