//! PASETO v4 providers (RustCrypto).
//!
//! ```
//! use pasetod_v4::LocalProvider;
//! use serde_json::json;
//!
//! let provider = LocalProvider::new();
//! provider.generate_key().unwrap();
//!
//! let token = provider
//!     .encrypt(&json!({ "data": "this is a secret message" }), "key-id:gandalf0")
//!     .unwrap();
//! assert!(token.starts_with("v4.local."));
//!
//! let decrypted = provider.decrypt(&token).unwrap();
//! assert_eq!(decrypted.message["data"], "this is a secret message");
//! assert_eq!(decrypted.footer.as_deref(), Some("key-id:gandalf0"));
//! ```

#![forbid(unsafe_code)]

/// Low level implementation primitives.
pub mod core;

pub use pasetod_core::PasetoError;
pub use pasetod_core::key::Key;
pub use pasetod_core::token::VerifiedToken;

/// Signs and verifies `v4.public` tokens (Ed25519).
pub type PublicProvider = pasetod_core::provider::PublicProvider<core::V4>;

/// Encrypts and decrypts `v4.local` tokens (XChaCha20 + BLAKE2b MAC).
pub type LocalProvider = pasetod_core::provider::LocalProvider<core::V4>;
