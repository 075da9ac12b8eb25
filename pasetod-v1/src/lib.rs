//! PASETO v1 providers (RustCrypto).
//!
//! v1 is the compatibility suite for environments limited to NIST-blessed
//! primitives. Prefer `pasetod-v2` or `pasetod-v4` where possible.
//!
//! ```
//! use pasetod_v1::LocalProvider;
//! use serde_json::json;
//!
//! let provider = LocalProvider::new();
//! provider.generate_key().unwrap();
//!
//! let token = provider.encrypt(&json!({ "data": "legacy secret" }), "").unwrap();
//! assert!(token.starts_with("v1.local."));
//!
//! let decrypted = provider.decrypt(&token).unwrap();
//! assert_eq!(decrypted.message["data"], "legacy secret");
//! ```

#![forbid(unsafe_code)]

/// Low level implementation primitives.
pub mod core;

pub use pasetod_core::PasetoError;
pub use pasetod_core::key::Key;
pub use pasetod_core::token::VerifiedToken;

/// Signs and verifies `v1.public` tokens (RSA-PSS, 2048-bit, SHA-384).
pub type PublicProvider = pasetod_core::provider::PublicProvider<core::V1>;

/// Encrypts and decrypts `v1.local` tokens (AES-256-CTR + HMAC-SHA-384).
pub type LocalProvider = pasetod_core::provider::LocalProvider<core::V1>;
