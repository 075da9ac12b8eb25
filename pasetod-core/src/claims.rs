//! Registered-claim validation.
//!
//! A payload is a JSON object. Seven keys carry protocol-defined meaning
//! and are type-checked whenever they appear: `iss`, `sub`, `aud`, `jti`
//! are strings; `exp`, `nbf`, `iat` are RFC 3339 timestamps. Everything
//! else passes through untouched.

use std::time::Duration;

use jiff::Timestamp;
use serde_json::{Map, Value};

use crate::{InvalidClaim, PasetoError, ProviderError, VerificationError};

/// The registered type of a claim value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimType {
    String,
    /// An RFC 3339 timestamp carried as a JSON string.
    Timestamp,
}

/// Claims with protocol-defined semantics.
pub const REGISTERED_CLAIMS: &[(&str, ClaimType)] = &[
    ("iss", ClaimType::String),
    ("sub", ClaimType::String),
    ("aud", ClaimType::String),
    ("jti", ClaimType::String),
    ("exp", ClaimType::Timestamp),
    ("nbf", ClaimType::Timestamp),
    ("iat", ClaimType::Timestamp),
];

/// Tokens expire ten minutes after issuance unless the caller says
/// otherwise.
const DEFAULT_EXPIRY: Duration = Duration::from_secs(10 * 60);

fn registered(claim: &str) -> Option<(&'static str, ClaimType)> {
    REGISTERED_CLAIMS
        .iter()
        .find(|(name, _)| *name == claim)
        .copied()
}

fn type_checks(claim_type: ClaimType, value: &Value) -> bool {
    match claim_type {
        ClaimType::String => value.is_string(),
        ClaimType::Timestamp => parse_timestamp(value).is_some(),
    }
}

fn parse_timestamp(value: &Value) -> Option<Timestamp> {
    value.as_str()?.parse().ok()
}

/// Build the canonical claims object for a payload about to be signed or
/// encrypted.
///
/// Registered claims keep their supplied value only if it type-checks; an
/// ill-typed value is dropped in favor of the default where one exists. A
/// `null` value opts the claim out entirely, defaults included. `iat` and
/// `exp` are injected when not supplied.
///
/// The caller must serialize the result exactly once and reuse those bytes
/// for both the crypto input and the wire payload; a later re-serialization
/// is not guaranteed to be byte-identical.
pub fn prepare_for_issuance(payload: &Value, now: Timestamp) -> Result<Map<String, Value>, PasetoError> {
    let payload = payload
        .as_object()
        .ok_or(PasetoError::Provider(ProviderError::PayloadShape))?;

    let mut out = Map::new();
    for (claim, value) in payload {
        match registered(claim) {
            None => {
                out.insert(claim.clone(), value.clone());
            }
            Some((_, claim_type)) => {
                if !value.is_null() && type_checks(claim_type, value) {
                    out.insert(claim.clone(), value.clone());
                }
            }
        }
    }

    let opted_out = |claim: &str| payload.get(claim).is_some_and(Value::is_null);

    if !out.contains_key("iat") && !opted_out("iat") {
        out.insert("iat".to_owned(), Value::String(now.to_string()));
    }
    if !out.contains_key("exp") && !opted_out("exp") {
        let exp = now + DEFAULT_EXPIRY;
        out.insert("exp".to_owned(), Value::String(exp.to_string()));
    }

    Ok(out)
}

/// Check the registered claims of a cryptographically verified payload.
///
/// Runs strictly after the signature or tag check; a payload that fails
/// here is authentic but not acceptable.
pub fn validate_at_verification(
    payload: &Map<String, Value>,
    now: Timestamp,
) -> Result<(), PasetoError> {
    for (claim, value) in payload {
        if let Some((name, claim_type)) = registered(claim) {
            if !type_checks(claim_type, value) {
                return Err(PasetoError::InvalidClaim(InvalidClaim::Type { claim: name }));
            }
        }
    }

    if let Some(exp) = payload.get("exp").and_then(parse_timestamp) {
        if exp <= now {
            return Err(PasetoError::InvalidClaim(InvalidClaim::Expired));
        }
    }

    if let Some(nbf) = payload.get("nbf").and_then(parse_timestamp) {
        if nbf >= now {
            return Err(PasetoError::InvalidClaim(InvalidClaim::NotYetValid));
        }
    }

    Ok(())
}

/// Require that a parsed token's header is the provider's own.
pub fn validate_header(expected: &'static str, actual: &str) -> Result<(), PasetoError> {
    if actual != expected {
        return Err(PasetoError::Verification(VerificationError::Header { expected }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(text: &str) -> Timestamp {
        text.parse().unwrap()
    }

    #[test]
    fn injects_iat_and_exp_defaults() {
        let now = at("2026-08-05T12:00:00Z");
        let out = prepare_for_issuance(&json!({ "data": "hi" }), now).unwrap();

        assert_eq!(out["data"], json!("hi"));
        assert_eq!(out["iat"], json!("2026-08-05T12:00:00Z"));
        assert_eq!(out["exp"], json!("2026-08-05T12:10:00Z"));
    }

    #[test]
    fn supplied_registered_claims_are_kept() {
        let now = at("2026-08-05T12:00:00Z");
        let out = prepare_for_issuance(
            &json!({ "exp": "2039-01-01T00:00:00+00:00", "iss": "pasetod" }),
            now,
        )
        .unwrap();

        assert_eq!(out["exp"], json!("2039-01-01T00:00:00+00:00"));
        assert_eq!(out["iss"], json!("pasetod"));
    }

    #[test]
    fn null_opts_out_of_a_default() {
        let now = at("2026-08-05T12:00:00Z");
        let out = prepare_for_issuance(&json!({ "exp": null }), now).unwrap();

        assert!(!out.contains_key("exp"));
        assert!(out.contains_key("iat"));
    }

    #[test]
    fn ill_typed_registered_claim_falls_back_to_default() {
        let now = at("2026-08-05T12:00:00Z");
        let out = prepare_for_issuance(&json!({ "exp": 12345, "sub": 7 }), now).unwrap();

        // exp was invalid, so the default replaces it; sub has no default
        assert_eq!(out["exp"], json!("2026-08-05T12:10:00Z"));
        assert!(!out.contains_key("sub"));
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = prepare_for_issuance(&json!("just a string"), at("2026-08-05T12:00:00Z"));
        assert_eq!(err, Err(PasetoError::Provider(ProviderError::PayloadShape)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let payload = prepare_for_issuance(
            &json!({ "exp": "2020-01-01T00:00:00Z" }),
            at("2019-12-01T00:00:00Z"),
        )
        .unwrap();

        assert_eq!(
            validate_at_verification(&payload, at("2026-08-05T12:00:00Z")),
            Err(PasetoError::InvalidClaim(InvalidClaim::Expired))
        );
    }

    #[test]
    fn future_nbf_is_rejected() {
        let mut payload = Map::new();
        payload.insert("nbf".to_owned(), json!("2039-01-01T00:00:00Z"));

        assert_eq!(
            validate_at_verification(&payload, at("2026-08-05T12:00:00Z")),
            Err(PasetoError::InvalidClaim(InvalidClaim::NotYetValid))
        );
    }

    #[test]
    fn type_mismatch_hard_fails_at_verification() {
        let mut payload = Map::new();
        payload.insert("iss".to_owned(), json!(42));

        assert_eq!(
            validate_at_verification(&payload, at("2026-08-05T12:00:00Z")),
            Err(PasetoError::InvalidClaim(InvalidClaim::Type { claim: "iss" }))
        );
    }

    #[test]
    fn unregistered_claims_pass_through() {
        let mut payload = Map::new();
        payload.insert("role".to_owned(), json!(["admin", 1, null]));

        assert_eq!(validate_at_verification(&payload, at("2026-08-05T12:00:00Z")), Ok(()));
    }

    #[test]
    fn header_mismatch_names_the_expected_header() {
        assert_eq!(
            validate_header("v2.public", "v4.public"),
            Err(PasetoError::Verification(VerificationError::Header {
                expected: "v2.public"
            }))
        );
        assert_eq!(validate_header("v2.public", "v2.public"), Ok(()));
    }
}
