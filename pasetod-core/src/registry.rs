//! The protocol registry.
//!
//! One immutable, process-wide table mapping `(version, purpose)` to the
//! descriptor every other component consults: the fixed signature/tag
//! length used to split public payloads, the key shape, and the algorithm
//! parameters a supplied key must match exactly.

use crate::version::{Purpose, Version};

/// A cryptographic hash parameter inside an [`Algorithm`] descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hash {
    Sha384,
}

/// Algorithm parameters for one protocol entry.
///
/// Compared with deep equality during key validation; a key minted for one
/// set of parameters never passes for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Algorithm {
    /// AES-256-CTR with an HMAC tag, keys split by HKDF.
    Aes256Ctr { hmac: Hash, kdf: Hash },
    /// RSA-PSS signatures.
    RsaPss { modulus_bits: u32, salt_len: u32, hash: Hash },
    /// XChaCha20-Poly1305 AEAD.
    XChaCha20Poly1305,
    /// Ed25519 signatures.
    Ed25519,
    /// XChaCha20 stream cipher with a keyed-BLAKE2b tag.
    XChaCha20Blake2b,
    /// ECDSA over P-384.
    EcdsaP384 { hash: Hash },
}

/// Whether an entry's key material is one symmetric secret or a key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyShape {
    Secret { bits: u32 },
    KeyPair,
}

/// Descriptor for one `(version, purpose)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Protocol {
    pub version: Version,
    pub purpose: Purpose,
    /// Byte length of the trailing signature (public) or tag (local).
    pub signature_len: usize,
    pub key_shape: KeyShape,
    pub algorithm: Algorithm,
}

impl Protocol {
    /// The `version.purpose` prefix of every token under this protocol,
    /// also the first piece of its pre-authentication encoding.
    pub fn header(&self) -> &'static str {
        match (self.version, self.purpose) {
            (Version::V1, Purpose::Local) => "v1.local",
            (Version::V1, Purpose::Public) => "v1.public",
            (Version::V2, Purpose::Local) => "v2.local",
            (Version::V2, Purpose::Public) => "v2.public",
            (Version::V3, Purpose::Local) => "v3.local",
            (Version::V3, Purpose::Public) => "v3.public",
            (Version::V4, Purpose::Local) => "v4.local",
            (Version::V4, Purpose::Public) => "v4.public",
        }
    }
}

static PROTOCOLS: [Protocol; 8] = [
    Protocol {
        version: Version::V1,
        purpose: Purpose::Local,
        signature_len: 48,
        key_shape: KeyShape::Secret { bits: 256 },
        algorithm: Algorithm::Aes256Ctr { hmac: Hash::Sha384, kdf: Hash::Sha384 },
    },
    Protocol {
        version: Version::V1,
        purpose: Purpose::Public,
        signature_len: 256,
        key_shape: KeyShape::KeyPair,
        algorithm: Algorithm::RsaPss { modulus_bits: 2048, salt_len: 48, hash: Hash::Sha384 },
    },
    Protocol {
        version: Version::V2,
        purpose: Purpose::Local,
        signature_len: 16,
        key_shape: KeyShape::Secret { bits: 256 },
        algorithm: Algorithm::XChaCha20Poly1305,
    },
    Protocol {
        version: Version::V2,
        purpose: Purpose::Public,
        signature_len: 64,
        key_shape: KeyShape::KeyPair,
        algorithm: Algorithm::Ed25519,
    },
    Protocol {
        version: Version::V3,
        purpose: Purpose::Local,
        signature_len: 48,
        key_shape: KeyShape::Secret { bits: 256 },
        algorithm: Algorithm::Aes256Ctr { hmac: Hash::Sha384, kdf: Hash::Sha384 },
    },
    Protocol {
        version: Version::V3,
        purpose: Purpose::Public,
        signature_len: 96,
        key_shape: KeyShape::KeyPair,
        algorithm: Algorithm::EcdsaP384 { hash: Hash::Sha384 },
    },
    Protocol {
        version: Version::V4,
        purpose: Purpose::Local,
        signature_len: 32,
        key_shape: KeyShape::Secret { bits: 256 },
        algorithm: Algorithm::XChaCha20Blake2b,
    },
    Protocol {
        version: Version::V4,
        purpose: Purpose::Public,
        signature_len: 64,
        key_shape: KeyShape::KeyPair,
        algorithm: Algorithm::Ed25519,
    },
];

/// Look up the descriptor for `(version, purpose)`.
pub fn protocol(version: Version, purpose: Purpose) -> &'static Protocol {
    let index = match (version, purpose) {
        (Version::V1, Purpose::Local) => 0,
        (Version::V1, Purpose::Public) => 1,
        (Version::V2, Purpose::Local) => 2,
        (Version::V2, Purpose::Public) => 3,
        (Version::V3, Purpose::Local) => 4,
        (Version::V3, Purpose::Public) => 5,
        (Version::V4, Purpose::Local) => 6,
        (Version::V4, Purpose::Public) => 7,
    };
    &PROTOCOLS[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_signature_lengths_are_fixed_per_version() {
        assert_eq!(protocol(Version::V1, Purpose::Public).signature_len, 256);
        assert_eq!(protocol(Version::V2, Purpose::Public).signature_len, 64);
        assert_eq!(protocol(Version::V3, Purpose::Public).signature_len, 96);
        assert_eq!(protocol(Version::V4, Purpose::Public).signature_len, 64);
    }

    #[test]
    fn headers_match_version_and_purpose() {
        assert_eq!(protocol(Version::V2, Purpose::Public).header(), "v2.public");
        assert_eq!(protocol(Version::V4, Purpose::Local).header(), "v4.local");
    }

    #[test]
    fn every_entry_is_self_consistent() {
        for version in [Version::V1, Version::V2, Version::V3, Version::V4] {
            for purpose in [Purpose::Local, Purpose::Public] {
                let proto = protocol(version, purpose);
                assert_eq!(proto.version, version);
                assert_eq!(proto.purpose, purpose);
            }
        }
    }
}
