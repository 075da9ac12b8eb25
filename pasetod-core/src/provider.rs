//! Token providers.
//!
//! A provider is the pairing of one `(version, purpose)` protocol entry
//! with at most one key (or key pair). [`PublicProvider`] signs and
//! verifies; [`LocalProvider`] encrypts and decrypts. The version crates
//! supply the primitives through [`PublicVersion`] / [`LocalVersion`];
//! everything protocol-shaped (key lucidity, claim canonicalization, the
//! pre-authentication encoding, packing and parsing) happens here, so a
//! suite never sees an unvalidated input.

use std::marker::PhantomData;
use std::sync::OnceLock;

use jiff::Timestamp;
use serde_json::Value;

use crate::claims;
use crate::key::{check_key, Key, KeyKind, Operation};
use crate::pae;
use crate::registry::{protocol, Protocol};
use crate::token::{self, ParsedToken, VerifiedToken};
use crate::version::{Purpose, Version};
use crate::{PasetoError, ProviderError, VerificationError};

/// A version's asymmetric signature suite.
///
/// `message` is always the finished pre-authentication encoding; the suite
/// only runs the primitive.
pub trait PublicVersion {
    const VERSION: Version;

    /// Generate a fresh key pair, encoded in the suite's material format.
    fn generate_keys() -> Result<KeyPairMaterial, PasetoError>;

    /// Produce the signature bytes for `message`.
    fn sign(secret: &[u8], message: &[u8]) -> Result<Vec<u8>, PasetoError>;

    /// Check `signature` over `message`; any failure is
    /// [`VerificationError::Signature`].
    fn verify(public: &[u8], message: &[u8], signature: &[u8]) -> Result<(), PasetoError>;
}

/// A version's symmetric authenticated-encryption suite.
///
/// The suite owns its nonce and tag geometry and binds `header` and
/// `footer` into the tag through the shared pre-authentication encoding;
/// the sealed payload layout is `nonce || ciphertext || tag`.
pub trait LocalVersion {
    const VERSION: Version;

    /// Generate a fresh symmetric key in the suite's material format.
    fn generate_key() -> Result<Box<[u8]>, PasetoError>;

    /// Seal `message`, returning the full sealed payload.
    fn encrypt(
        key: &[u8],
        header: &str,
        message: &[u8],
        footer: &[u8],
    ) -> Result<Vec<u8>, PasetoError>;

    /// Open a sealed payload, returning the plaintext. Tag failure is
    /// [`PasetoError::Decryption`].
    fn decrypt(
        key: &[u8],
        header: &str,
        payload: &[u8],
        footer: &[u8],
    ) -> Result<Vec<u8>, PasetoError>;
}

/// Freshly generated asymmetric key material.
pub struct KeyPairMaterial {
    pub secret: Box<[u8]>,
    pub public: Box<[u8]>,
}

struct KeyPair {
    secret: Option<Key>,
    public: Option<Key>,
}

/// A provider for one version's `public` purpose.
///
/// The key slot is single-assignment: it is filled by a constructor or by
/// the first successful [`generate_key`](Self::generate_key) and never
/// changes afterwards, so sign/verify may run concurrently against a
/// stable key.
pub struct PublicProvider<V> {
    keys: OnceLock<KeyPair>,
    _version: PhantomData<V>,
}

impl<V: PublicVersion> Default for PublicProvider<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PublicVersion> PublicProvider<V> {
    /// A provider with no key; call
    /// [`generate_key`](Self::generate_key) before signing.
    pub fn new() -> Self {
        PublicProvider {
            keys: OnceLock::new(),
            _version: PhantomData,
        }
    }

    /// A provider holding an existing key pair.
    pub fn with_key_pair(secret: Key, public: Key) -> Self {
        let provider = Self::new();
        let _ = provider.keys.set(KeyPair {
            secret: Some(secret),
            public: Some(public),
        });
        provider
    }

    /// A verification-only provider holding a public key.
    pub fn with_public_key(public: Key) -> Self {
        let provider = Self::new();
        let _ = provider.keys.set(KeyPair {
            secret: None,
            public: Some(public),
        });
        provider
    }

    fn protocol() -> &'static Protocol {
        protocol(V::VERSION, Purpose::Public)
    }

    /// Generate and store a key pair. Fails with
    /// [`ProviderError::KeyAlreadySet`] if the slot is occupied, including
    /// when another thread wins the race.
    pub fn generate_key(&self) -> Result<(), PasetoError> {
        if self.keys.get().is_some() {
            return Err(PasetoError::Provider(ProviderError::KeyAlreadySet));
        }

        let proto = Self::protocol();
        let material = V::generate_keys()?;
        let pair = KeyPair {
            secret: Some(Key::new(
                KeyKind::Private,
                proto.algorithm,
                &[Operation::Sign],
                material.secret,
            )),
            public: Some(Key::new(
                KeyKind::Public,
                proto.algorithm,
                &[Operation::Verify],
                material.public,
            )),
        };

        self.keys
            .set(pair)
            .map_err(|_| PasetoError::Provider(ProviderError::KeyAlreadySet))
    }

    /// The held public key, for handing to a verification-only provider.
    pub fn public_key(&self) -> Option<&Key> {
        self.keys.get().and_then(|pair| pair.public.as_ref())
    }

    fn secret_key(&self) -> Option<&Key> {
        self.keys.get().and_then(|pair| pair.secret.as_ref())
    }

    /// Sign `payload` (a JSON object) and return the wire token.
    pub fn sign(&self, payload: &Value, footer: &str) -> Result<String, PasetoError> {
        let proto = Self::protocol();
        check_key(Operation::Sign, self.secret_key(), proto)?;

        let claims = claims::prepare_for_issuance(payload, Timestamp::now())?;
        // serialized exactly once; these bytes are signed and shipped
        let message = serde_json::to_vec(&claims)
            .map_err(|_| PasetoError::Provider(ProviderError::PayloadShape))?;

        let header = proto.header();
        let pre_auth =
            pae::pre_auth_encode_vec(&[header.as_bytes(), message.as_slice(), footer.as_bytes()])?;

        let secret = self
            .secret_key()
            .ok_or(PasetoError::Provider(ProviderError::MissingKey))?;
        let signature = V::sign(secret.expose_material(), &pre_auth)?;

        Ok(token::pack(header, &message, &signature, footer))
    }

    /// Verify a wire token, returning its claims and footer.
    ///
    /// All-or-nothing: structural checks, the signature, and the claims
    /// must all pass or the caller sees nothing of the payload.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, PasetoError> {
        self.verify_at(token, Timestamp::now())
    }

    /// [`verify`](Self::verify) against a caller-chosen clock.
    pub fn verify_at(&self, token: &str, now: Timestamp) -> Result<VerifiedToken, PasetoError> {
        let proto = Self::protocol();
        check_key(Operation::Verify, self.public_key(), proto)?;

        let parsed = token::parse(token, proto)?;
        claims::validate_header(proto.header(), &parsed.header())?;

        let ParsedToken {
            message,
            signature,
            payload,
            footer,
            ..
        } = parsed;
        let signature = signature.ok_or(PasetoError::Verification(VerificationError::Signature))?;

        // the exact bytes recovered from the wire, not a re-serialization
        let footer_bytes = footer.as_deref().unwrap_or_default().as_bytes();
        let pre_auth =
            pae::pre_auth_encode_vec(&[proto.header().as_bytes(), message.as_slice(), footer_bytes])?;

        let public = self
            .public_key()
            .ok_or(PasetoError::Provider(ProviderError::MissingKey))?;
        V::verify(public.expose_material(), &pre_auth, &signature)?;

        let payload = payload.ok_or(PasetoError::Verification(VerificationError::Signature))?;
        claims::validate_at_verification(&payload, now)?;

        Ok(VerifiedToken::new(Value::Object(payload), footer))
    }
}

/// A provider for one version's `local` purpose.
///
/// Same key-slot discipline as [`PublicProvider`], with a single symmetric
/// secret instead of a pair.
pub struct LocalProvider<V> {
    key: OnceLock<Key>,
    _version: PhantomData<V>,
}

impl<V: LocalVersion> Default for LocalProvider<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: LocalVersion> LocalProvider<V> {
    /// A provider with no key; call
    /// [`generate_key`](Self::generate_key) before encrypting.
    pub fn new() -> Self {
        LocalProvider {
            key: OnceLock::new(),
            _version: PhantomData,
        }
    }

    /// A provider holding an existing secret key.
    pub fn with_key(key: Key) -> Self {
        let provider = Self::new();
        let _ = provider.key.set(key);
        provider
    }

    fn protocol() -> &'static Protocol {
        protocol(V::VERSION, Purpose::Local)
    }

    /// Generate and store a secret key; single-assignment as for
    /// [`PublicProvider::generate_key`].
    pub fn generate_key(&self) -> Result<(), PasetoError> {
        if self.key.get().is_some() {
            return Err(PasetoError::Provider(ProviderError::KeyAlreadySet));
        }

        let proto = Self::protocol();
        let material = V::generate_key()?;
        let key = Key::new(
            KeyKind::Secret,
            proto.algorithm,
            &[Operation::Encrypt, Operation::Decrypt],
            material,
        );

        self.key
            .set(key)
            .map_err(|_| PasetoError::Provider(ProviderError::KeyAlreadySet))
    }

    /// Encrypt `payload` (a JSON object) and return the wire token.
    pub fn encrypt(&self, payload: &Value, footer: &str) -> Result<String, PasetoError> {
        let proto = Self::protocol();
        check_key(Operation::Encrypt, self.key.get(), proto)?;

        let claims = claims::prepare_for_issuance(payload, Timestamp::now())?;
        let message = serde_json::to_vec(&claims)
            .map_err(|_| PasetoError::Provider(ProviderError::PayloadShape))?;

        let header = proto.header();
        let key = self
            .key
            .get()
            .ok_or(PasetoError::Provider(ProviderError::MissingKey))?;
        let sealed = V::encrypt(key.expose_material(), header, &message, footer.as_bytes())?;

        Ok(token::pack(header, &sealed, &[], footer))
    }

    /// Decrypt a wire token, returning its claims and footer.
    pub fn decrypt(&self, token: &str) -> Result<VerifiedToken, PasetoError> {
        self.decrypt_at(token, Timestamp::now())
    }

    /// [`decrypt`](Self::decrypt) against a caller-chosen clock.
    pub fn decrypt_at(&self, token: &str, now: Timestamp) -> Result<VerifiedToken, PasetoError> {
        let proto = Self::protocol();
        check_key(Operation::Decrypt, self.key.get(), proto)?;

        let parsed = token::parse(token, proto)?;
        claims::validate_header(proto.header(), &parsed.header())?;

        let key = self
            .key
            .get()
            .ok_or(PasetoError::Provider(ProviderError::MissingKey))?;
        let footer_bytes = parsed.footer.as_deref().unwrap_or_default().as_bytes();
        let plaintext = V::decrypt(
            key.expose_material(),
            proto.header(),
            &parsed.message,
            footer_bytes,
        )?;

        let payload: Value = serde_json::from_slice(&plaintext)
            .map_err(|_| PasetoError::InvalidToken(crate::InvalidToken::PayloadJson))?;
        let payload = match payload {
            Value::Object(map) => map,
            _ => return Err(PasetoError::InvalidToken(crate::InvalidToken::PayloadJson)),
        };

        claims::validate_at_verification(&payload, now)?;

        Ok(VerifiedToken::new(Value::Object(payload), parsed.footer))
    }
}
