//! Key handles and "algorithm lucidity".
//!
//! Keys can be imported from elsewhere, so before any primitive runs we
//! check that a supplied key's kind, algorithm parameters, and declared
//! usages exactly match what the registry prescribes for the operation.
//! This is what prevents a key minted for one version or purpose from
//! being fed into another's primitive.

use crate::registry::{Algorithm, Protocol};
use crate::{PasetoError, ProviderError};

/// What a key is: a symmetric secret, or one half of a key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Secret,
    Public,
    Private,
}

/// The operations a key may be declared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Sign,
    Verify,
    Encrypt,
    Decrypt,
}

impl Operation {
    /// The key kind an operation demands: signatures are created with the
    /// private half and checked with the public half; both symmetric
    /// directions use the secret.
    pub fn required_kind(self) -> KeyKind {
        match self {
            Operation::Sign => KeyKind::Private,
            Operation::Verify => KeyKind::Public,
            Operation::Encrypt | Operation::Decrypt => KeyKind::Secret,
        }
    }
}

/// An in-memory key handle.
///
/// The material is an opaque byte encoding owned by the version suites
/// (raw 32-byte symmetric keys, seed || public for Ed25519, DER for RSA).
/// Keys are never persisted by this crate.
pub struct Key {
    kind: KeyKind,
    algorithm: Algorithm,
    usages: Box<[Operation]>,
    material: Box<[u8]>,
}

impl Key {
    pub fn new(
        kind: KeyKind,
        algorithm: Algorithm,
        usages: &[Operation],
        material: Box<[u8]>,
    ) -> Self {
        Key {
            kind,
            algorithm,
            usages: usages.into(),
            material,
        }
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn usages(&self) -> &[Operation] {
        &self.usages
    }

    /// The raw key material. Handle with care; the name is a reminder.
    pub fn expose_material(&self) -> &[u8] {
        &self.material
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // material deliberately omitted
        f.debug_struct("Key")
            .field("kind", &self.kind)
            .field("algorithm", &self.algorithm)
            .field("usages", &self.usages)
            .finish_non_exhaustive()
    }
}

/// Validate `key` for `operation` under `protocol`.
///
/// Must pass before the corresponding primitive is invoked; all failures
/// are provider misconfiguration, reported without touching the material.
pub fn check_key(
    operation: Operation,
    key: Option<&Key>,
    protocol: &Protocol,
) -> Result<(), PasetoError> {
    let key = key.ok_or(PasetoError::Provider(ProviderError::MissingKey))?;

    if key.kind() != operation.required_kind() {
        return Err(PasetoError::Provider(ProviderError::KeyType));
    }

    if key.algorithm() != protocol.algorithm {
        return Err(PasetoError::Provider(ProviderError::KeyAlgorithm));
    }

    if !key.usages().contains(&operation) {
        return Err(PasetoError::Provider(ProviderError::KeyUsage));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::protocol;
    use crate::version::{Purpose, Version};

    fn proto() -> &'static Protocol {
        protocol(Version::V2, Purpose::Public)
    }

    fn signing_key() -> Key {
        Key::new(
            KeyKind::Private,
            proto().algorithm,
            &[Operation::Sign],
            vec![0u8; 64].into_boxed_slice(),
        )
    }

    #[test]
    fn accepts_matching_key() {
        assert_eq!(check_key(Operation::Sign, Some(&signing_key()), proto()), Ok(()));
    }

    #[test]
    fn rejects_missing_key() {
        assert_eq!(
            check_key(Operation::Sign, None, proto()),
            Err(PasetoError::Provider(ProviderError::MissingKey))
        );
    }

    #[test]
    fn rejects_wrong_kind() {
        let key = Key::new(
            KeyKind::Public,
            proto().algorithm,
            &[Operation::Sign],
            vec![0u8; 32].into_boxed_slice(),
        );
        assert_eq!(
            check_key(Operation::Sign, Some(&key), proto()),
            Err(PasetoError::Provider(ProviderError::KeyType))
        );
    }

    #[test]
    fn rejects_wrong_algorithm() {
        let local = protocol(Version::V2, Purpose::Local);
        let key = Key::new(
            KeyKind::Private,
            local.algorithm,
            &[Operation::Sign],
            vec![0u8; 64].into_boxed_slice(),
        );
        assert_eq!(
            check_key(Operation::Sign, Some(&key), proto()),
            Err(PasetoError::Provider(ProviderError::KeyAlgorithm))
        );
    }

    #[test]
    fn rejects_undeclared_usage() {
        let key = Key::new(
            KeyKind::Private,
            proto().algorithm,
            &[],
            vec![0u8; 64].into_boxed_slice(),
        );
        assert_eq!(
            check_key(Operation::Sign, Some(&key), proto()),
            Err(PasetoError::Provider(ProviderError::KeyUsage))
        );
    }
}
