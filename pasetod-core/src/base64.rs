//! Unpadded base64url, as required by the token wire format.
//!
//! <https://github.com/paseto-standard/paseto-spec/blob/master/docs/01-Protocol-Versions/Common.md#base64-encoding>

use base64ct::{Base64UrlUnpadded, Encoding};

/// Encode to the `-`/`_` alphabet without padding.
pub fn encode(bytes: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(bytes)
}

/// Decode a base64url segment.
///
/// Tokens are emitted unpadded, but trailing `=` padding is tolerated on
/// input for compatibility with producers that pad their footers.
pub fn decode(text: &str) -> Option<Vec<u8>> {
    let text = text.trim_end_matches('=');
    Base64UrlUnpadded::decode_vec(text).ok()
}
