//! Helpers shared by the integration tests.

use pasetod_core::pae;
use pasetod_core::provider::PublicVersion;
use pasetod_core::{base64, token};

/// Decode one dot-separated segment of a token, let `mutate` rewrite the
/// bytes, and re-encode. Segment 0 is the version, 2 the payload, 3 the
/// footer.
pub fn tamper_segment(token: &str, segment: usize, mutate: impl FnOnce(&mut Vec<u8>)) -> String {
    let mut fields: Vec<String> = token.split('.').map(str::to_owned).collect();
    let mut bytes = base64::decode(&fields[segment]).expect("segment should be base64");
    mutate(&mut bytes);
    fields[segment] = base64::encode(&bytes);
    fields.join(".")
}

/// Flip a single bit of one byte inside a token segment.
pub fn flip_bit(token: &str, segment: usize, byte: usize, bit: u8) -> String {
    tamper_segment(token, segment, |bytes| bytes[byte] ^= 1 << bit)
}

/// The decoded length of a token segment, for driving bit-flip sweeps.
pub fn segment_len(token: &str, segment: usize) -> usize {
    let field = token.split('.').nth(segment).expect("segment should exist");
    base64::decode(field).expect("segment should be base64").len()
}

/// Build a signed wire token from raw message bytes, bypassing claim
/// canonicalization. Only the tests want this: it mints tokens a
/// well-behaved issuer never would.
pub fn forge_public_token<V: PublicVersion>(
    secret: &[u8],
    header: &str,
    message: &[u8],
    footer: &str,
) -> String {
    let pre_auth = pae::pre_auth_encode_vec(&[header.as_bytes(), message, footer.as_bytes()])
        .expect("pre-auth encoding should fit");
    let signature = V::sign(secret, &pre_auth).expect("signing should succeed");
    token::pack(header, message, &signature, footer)
}
