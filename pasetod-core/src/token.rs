//! Wire-format packing and raw parsing.
//!
//! A token is 3 or 4 dot-separated, non-empty fields:
//! `version.purpose.payload[.footer]`, payload and footer base64url
//! without padding. For the public purpose the decoded payload is
//! `message_bytes || signature_bytes` with the signature length fixed by
//! the protocol registry, never inferred from the token.

use serde_json::{Map, Value};

use crate::registry::Protocol;
use crate::version::{Purpose, Version};
use crate::{base64, InvalidToken, PasetoError};

/// Serialize one token.
///
/// The footer segment is emitted only when the footer is non-empty; an
/// empty footer and an absent footer are the same wire token.
pub fn pack(header: &str, message: &[u8], signature: &[u8], footer: &str) -> String {
    let mut payload = Vec::with_capacity(message.len() + signature.len());
    payload.extend_from_slice(message);
    payload.extend_from_slice(signature);

    let mut token = format!("{header}.{}", base64::encode(&payload));
    if !footer.is_empty() {
        token.push('.');
        token.push_str(&base64::encode(footer.as_bytes()));
    }
    token
}

/// A parsed but cryptographically **unverified** token.
///
/// Parsing proves nothing about authenticity; treat every field as
/// attacker-controlled until `verify`/`decrypt` has accepted the token.
/// The raw `message` and `signature` bytes are retained so verification
/// can be computed over exactly the bytes that were signed, never over a
/// re-serialization of the decoded JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedToken {
    pub version: Version,
    pub purpose: Purpose,
    /// Public: the cleartext message bytes. Local: the still-sealed
    /// payload (`nonce || ciphertext || tag`).
    pub message: Vec<u8>,
    /// The trailing signature bytes (public purpose only).
    pub signature: Option<Vec<u8>>,
    /// The decoded JSON claims object (public purpose only, unverified).
    pub payload: Option<Map<String, Value>>,
    /// The decoded footer; `None` when the token has no footer segment.
    pub footer: Option<String>,
}

impl ParsedToken {
    /// The `version.purpose` header this token was parsed under.
    pub fn header(&self) -> String {
        format!("{}.{}", self.version, self.purpose)
    }
}

/// Split and decode a wire token against the protocol it is expected to
/// belong to.
///
/// The version/purpose comparison runs before any decoding so foreign
/// tokens are rejected cheaply.
pub fn parse(token: &str, expected: &Protocol) -> Result<ParsedToken, PasetoError> {
    let fields: Vec<&str> = token.split('.').collect();
    if !(3..=4).contains(&fields.len()) || fields.iter().any(|field| field.is_empty()) {
        return Err(PasetoError::InvalidToken(InvalidToken::Malformed));
    }

    if fields[0] != expected.version.as_str() {
        return Err(PasetoError::InvalidToken(InvalidToken::UnsupportedVersion));
    }
    if fields[1] != expected.purpose.as_str() {
        return Err(PasetoError::InvalidToken(InvalidToken::UnsupportedPurpose));
    }

    let footer = match fields.get(3) {
        None => None,
        Some(segment) => {
            let bytes = base64::decode(segment)
                .ok_or(PasetoError::InvalidToken(InvalidToken::FooterEncoding))?;
            let text = String::from_utf8(bytes)
                .map_err(|_| PasetoError::InvalidToken(InvalidToken::FooterEncoding))?;
            Some(text)
        }
    };

    let decoded = base64::decode(fields[2])
        .ok_or(PasetoError::InvalidToken(InvalidToken::PayloadEncoding))?;

    match expected.purpose {
        Purpose::Local => Ok(ParsedToken {
            version: expected.version,
            purpose: expected.purpose,
            message: decoded,
            signature: None,
            payload: None,
            footer,
        }),
        Purpose::Public => {
            let sig_len = expected.signature_len;
            if decoded.len() < sig_len {
                return Err(PasetoError::InvalidToken(InvalidToken::Malformed));
            }
            let (message, signature) = decoded.split_at(decoded.len() - sig_len);

            let payload: Value = serde_json::from_slice(message)
                .map_err(|_| PasetoError::InvalidToken(InvalidToken::PayloadJson))?;
            let payload = match payload {
                Value::Object(map) => map,
                _ => return Err(PasetoError::InvalidToken(InvalidToken::PayloadJson)),
            };

            Ok(ParsedToken {
                version: expected.version,
                purpose: expected.purpose,
                message: message.to_vec(),
                signature: Some(signature.to_vec()),
                payload: Some(payload),
                footer,
            })
        }
    }
}

/// A token that has passed both its cryptographic check and claims
/// validation.
///
/// Only `verify`/`decrypt` construct this; there is no path from
/// untrusted input to a `VerifiedToken`.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct VerifiedToken {
    /// The decoded claims object.
    pub message: Value,
    /// The footer that accompanied the token, if any.
    pub footer: Option<String>,
}

impl VerifiedToken {
    pub(crate) fn new(message: Value, footer: Option<String>) -> Self {
        VerifiedToken { message, footer }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::protocol;
    use serde_json::json;

    const LOCAL_TOKEN: &str = "v2.local.QAxIpVe-ECVNI1z4xQbm_qQYomyT3h8FtV8bxkz8pBJWkT8f7HtlOpbroPDEZUKop_vaglyp76CzYy375cHmKCW8e1CCkV0Lflu4GTDyXMqQdpZMM1E6OaoQW27gaRSvWBrR3IgbFIa0AkuUFw";
    const PUBLIC_TOKEN: &str = "v2.public.eyJleHAiOiIyMDM5LTAxLTAxVDAwOjAwOjAwKzAwOjAwIiwiZGF0YSI6InRoaXMgaXMgYSBzaWduZWQgbWVzc2FnZSJ91gC7-jCWsN3mv4uJaZxZp0btLJgcyVwL-svJD7f4IHyGteKe3HTLjHYTGHI1MtCqJ-ESDLNoE7otkIzamFskCA";
    const FOOTER: &str = ".aGVsbG8gd29ybGQ=";

    fn v2_local() -> &'static Protocol {
        protocol(Version::V2, Purpose::Local)
    }

    fn v2_public() -> &'static Protocol {
        protocol(Version::V2, Purpose::Public)
    }

    #[test]
    fn parses_a_local_token() {
        let parsed = parse(LOCAL_TOKEN, v2_local()).unwrap();
        assert_eq!(parsed.version, Version::V2);
        assert_eq!(parsed.purpose, Purpose::Local);
        assert_eq!(parsed.footer, None);
        assert!(parsed.payload.is_none());
        assert!(parsed.signature.is_none());
    }

    #[test]
    fn parses_a_local_token_with_footer() {
        let parsed = parse(&format!("{LOCAL_TOKEN}{FOOTER}"), v2_local()).unwrap();
        assert_eq!(parsed.footer.as_deref(), Some("hello world"));
    }

    #[test]
    fn parses_a_public_token() {
        let parsed = parse(PUBLIC_TOKEN, v2_public()).unwrap();
        assert_eq!(parsed.header(), "v2.public");
        assert_eq!(parsed.signature.as_ref().map(Vec::len), Some(64));
        assert_eq!(
            Value::Object(parsed.payload.unwrap()),
            json!({
                "exp": "2039-01-01T00:00:00+00:00",
                "data": "this is a signed message",
            })
        );
        assert_eq!(parsed.footer, None);
    }

    #[test]
    fn parses_a_public_token_with_footer() {
        let parsed = parse(&format!("{PUBLIC_TOKEN}{FOOTER}"), v2_public()).unwrap();
        assert_eq!(parsed.footer.as_deref(), Some("hello world"));
        assert_eq!(parsed.signature.as_ref().map(Vec::len), Some(64));
    }

    #[test]
    fn raw_bytes_survive_for_reverification() {
        let parsed = parse(PUBLIC_TOKEN, v2_public()).unwrap();
        let decoded = base64::decode(PUBLIC_TOKEN.split('.').nth(2).unwrap()).unwrap();
        assert_eq!(parsed.message, decoded[..decoded.len() - 64]);
        assert_eq!(parsed.signature.unwrap(), decoded[decoded.len() - 64..]);
    }

    #[test]
    fn empty_token_fails() {
        assert_eq!(
            parse("", v2_public()),
            Err(PasetoError::InvalidToken(InvalidToken::Malformed))
        );
    }

    #[test]
    fn partial_token_fails() {
        assert_eq!(
            parse("v2.public", v2_public()),
            Err(PasetoError::InvalidToken(InvalidToken::Malformed))
        );
    }

    #[test]
    fn five_fields_fail() {
        assert_eq!(
            parse("v2.public.a.b.c", v2_public()),
            Err(PasetoError::InvalidToken(InvalidToken::Malformed))
        );
    }

    #[test]
    fn empty_footer_field_fails() {
        assert_eq!(
            parse(&format!("{PUBLIC_TOKEN}."), v2_public()),
            Err(PasetoError::InvalidToken(InvalidToken::Malformed))
        );
    }

    #[test]
    fn foreign_version_fails_before_decoding() {
        let token = PUBLIC_TOKEN.replacen("v2", "20", 1);
        assert_eq!(
            parse(&token, v2_public()),
            Err(PasetoError::InvalidToken(InvalidToken::UnsupportedVersion))
        );
    }

    #[test]
    fn foreign_purpose_fails_before_decoding() {
        let token = PUBLIC_TOKEN.replacen("public", "glorious", 1);
        assert_eq!(
            parse(&token, v2_public()),
            Err(PasetoError::InvalidToken(InvalidToken::UnsupportedPurpose))
        );
    }

    #[test]
    fn bad_footer_encoding_fails() {
        assert_eq!(
            parse(&format!("{PUBLIC_TOKEN}.un?defined"), v2_public()),
            Err(PasetoError::InvalidToken(InvalidToken::FooterEncoding))
        );
    }

    #[test]
    fn bad_payload_encoding_fails() {
        assert_eq!(
            parse("v2.public.un?defined", v2_public()),
            Err(PasetoError::InvalidToken(InvalidToken::PayloadEncoding))
        );
    }

    #[test]
    fn payload_that_is_not_json_fails() {
        // decodes fine, but the message bytes are not a JSON object
        let mut bytes = b"hello world".to_vec();
        bytes.extend_from_slice(&[0u8; 64]);
        let token = format!("v2.public.{}", base64::encode(&bytes));
        assert_eq!(
            parse(&token, v2_public()),
            Err(PasetoError::InvalidToken(InvalidToken::PayloadJson))
        );
    }

    #[test]
    fn pack_then_parse_round_trips() {
        let message = br#"{"data":"round trip"}"#;
        let signature = [7u8; 64];
        let token = pack("v2.public", message, &signature, "trailer");

        let parsed = parse(&token, v2_public()).unwrap();
        assert_eq!(parsed.message, message);
        assert_eq!(parsed.signature.as_deref(), Some(&signature[..]));
        assert_eq!(parsed.footer.as_deref(), Some("trailer"));
    }

    #[test]
    fn pack_omits_empty_footer() {
        let token = pack("v2.public", b"{}", &[0u8; 64], "");
        assert_eq!(token.split('.').count(), 3);
    }
}
