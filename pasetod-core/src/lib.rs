//! Version-independent PASETO token engine.
//!
//! Tokens have the shape `version.purpose.payload[.footer]` where the
//! payload is protected by the version's fixed cryptographic suite. This
//! crate implements everything that does not touch a primitive: the wire
//! packer and raw parser, the pre-authentication encoding fed to every
//! MAC/signature, the protocol registry, key "algorithm lucidity" checks,
//! registered-claim validation, and the provider orchestration. Concrete
//! suites live in the per-version crates (`pasetod-v1`, `pasetod-v2`,
//! `pasetod-v4`) which implement [`provider::PublicVersion`] and
//! [`provider::LocalVersion`].

#![forbid(unsafe_code)]

pub mod base64;
pub mod claims;
pub mod key;
pub mod pae;
pub mod provider;
pub mod registry;
pub mod token;
pub mod version;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
/// Error returned for all token operations that can fail.
///
/// Every variant maps to a stable machine-readable [`code`](Self::code) so
/// callers can branch without string matching.
pub enum PasetoError {
    /// Untrusted wire input failed a structural or encoding check.
    InvalidToken(InvalidToken),
    /// A registered claim failed its type or temporal check.
    InvalidClaim(InvalidClaim),
    /// The provider was misused before any crypto call was made.
    Provider(ProviderError),
    /// The signature check failed, or the token header does not belong to
    /// this provider.
    Verification(VerificationError),
    /// The authentication tag check failed while decrypting.
    Decryption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidToken {
    /// Wrong field count, or an empty field.
    Malformed,
    UnsupportedVersion,
    UnsupportedPurpose,
    FooterEncoding,
    PayloadEncoding,
    PayloadJson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidClaim {
    /// A registered claim is present with a value of the wrong type.
    Type { claim: &'static str },
    /// `exp` is in the past.
    Expired,
    /// `nbf` is in the future.
    NotYetValid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProviderError {
    /// No key is set for the requested operation.
    MissingKey,
    /// The key's kind does not fit the operation.
    KeyType,
    /// The key's algorithm parameters are not those of the protocol.
    KeyAlgorithm,
    /// The key's declared usages do not include the operation.
    KeyUsage,
    /// `generate_key` on a provider that already holds a key.
    KeyAlreadySet,
    /// Key material could not be decoded by the suite.
    InvalidKey,
    /// The payload is not a JSON object.
    PayloadShape,
    /// A field is too large to length-prefix safely.
    Oversized,
    /// The crypto primitive collaborator failed (entropy, key generation).
    Crypto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum VerificationError {
    /// The signature did not verify against the held public key.
    Signature,
    /// The parsed header is not the provider's `version.purpose`.
    Header { expected: &'static str },
}

impl PasetoError {
    /// Stable machine-readable code for this error class.
    pub fn code(&self) -> &'static str {
        match self {
            PasetoError::InvalidToken(_) => "INVALID_TOKEN",
            PasetoError::InvalidClaim(_) => "INVALID_TOKEN_CLAIM",
            PasetoError::Provider(_) => "PROVIDER_ERROR",
            PasetoError::Verification(_) => "VERIFICATION_ERROR",
            PasetoError::Decryption => "DECRYPTION_ERROR",
        }
    }
}

impl std::error::Error for PasetoError {}

impl std::fmt::Display for PasetoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasetoError::InvalidToken(kind) => kind.fmt(f),
            PasetoError::InvalidClaim(kind) => kind.fmt(f),
            PasetoError::Provider(kind) => kind.fmt(f),
            PasetoError::Verification(kind) => kind.fmt(f),
            PasetoError::Decryption => f.write_str("token could not be decrypted"),
        }
    }
}

impl std::fmt::Display for InvalidToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            InvalidToken::Malformed => {
                "token is malformed and does not conform to paseto specifications"
            }
            InvalidToken::UnsupportedVersion => "the designated paseto version is unsupported",
            InvalidToken::UnsupportedPurpose => "the designated paseto purpose is unsupported",
            InvalidToken::FooterEncoding => "token footer is not a valid base64-encoded string",
            InvalidToken::PayloadEncoding => "token payload is not a valid base64-encoded string",
            InvalidToken::PayloadJson => "token payload is not valid JSON",
        })
    }
}

impl std::fmt::Display for InvalidClaim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidClaim::Type { claim } => {
                write!(f, "claim `{claim}` does not match its registered type")
            }
            InvalidClaim::Expired => f.write_str("token has expired"),
            InvalidClaim::NotYetValid => f.write_str("token is not yet valid"),
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ProviderError::MissingKey => "provider has no appropriate key set",
            ProviderError::KeyType => "provider key cannot be used for this operation",
            ProviderError::KeyAlgorithm => "provider received unsupported key algorithm",
            ProviderError::KeyUsage => "provider key usages do not include this operation",
            ProviderError::KeyAlreadySet => "provider already holds a key",
            ProviderError::InvalidKey => "provider key material could not be decoded",
            ProviderError::PayloadShape => "payloads must be an object",
            ProviderError::Oversized => "message is too large to encode safely",
            ProviderError::Crypto => "the cryptographic provider failed",
        })
    }
}

impl std::fmt::Display for VerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationError::Signature => f.write_str("token signature could not be validated"),
            VerificationError::Header { expected } => {
                write!(f, "token header does not match the provider (expected `{expected}`)")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            PasetoError::InvalidToken(InvalidToken::Malformed).code(),
            "INVALID_TOKEN"
        );
        assert_eq!(
            PasetoError::InvalidClaim(InvalidClaim::Expired).code(),
            "INVALID_TOKEN_CLAIM"
        );
        assert_eq!(
            PasetoError::Provider(ProviderError::MissingKey).code(),
            "PROVIDER_ERROR"
        );
        assert_eq!(
            PasetoError::Verification(VerificationError::Signature).code(),
            "VERIFICATION_ERROR"
        );
        assert_eq!(PasetoError::Decryption.code(), "DECRYPTION_ERROR");
    }
}
