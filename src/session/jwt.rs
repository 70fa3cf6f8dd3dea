//! Best-effort inspection of bearer tokens.
//!
//! The payload is decoded without verifying the signature: the result only
//! drives local UX decisions (is the user still logged in?). The server
//! remains the sole authority on token validity.

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
use std::collections::HashSet;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|e| DateTime::from_timestamp(e, 0))
    }
}

fn unverified_validation() -> Validation {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();
    validation
}

/// Decode the claims of a JWT without checking its signature.
pub fn decode_claims(token: &str) -> AppResult<Claims> {
    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &unverified_validation())
        .map(|data| data.claims)
        .map_err(|e| AppError::Validation(format!("malformed token: {e}")))
}

/// True when the token cannot be decoded or its `exp` lies in the past.
/// A token without `exp` is left to the server to judge.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    match decode_claims(token) {
        Ok(claims) => match claims.expires_at() {
            Some(exp) => exp <= now,
            None => false,
        },
        Err(e) => {
            tracing::debug!("treating token as expired: {e}");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    fn mint(claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .unwrap()
    }

    #[test]
    fn reads_exp_without_knowing_the_key() {
        let token = mint(json!({ "sub": "a@b.com", "exp": 4_102_444_800_i64 }));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.exp, Some(4_102_444_800));
        assert!(!is_expired(&token, Utc::now()));
    }

    #[test]
    fn past_exp_is_expired() {
        let now = Utc::now();
        let token = mint(json!({ "sub": 12, "exp": now.timestamp() - 60, "aud": "tt" }));
        assert!(is_expired(&token, now));
    }

    #[test]
    fn malformed_token_is_expired() {
        assert!(is_expired("not-a-jwt", Utc::now()));
        assert!(is_expired("a.b.c", Utc::now()));
        assert!(decode_claims("").is_err());
    }

    #[test]
    fn token_without_exp_is_not_expired() {
        let token = mint(json!({ "sub": "a@b.com" }));
        assert!(!is_expired(&token, Utc::now()));
    }
}
