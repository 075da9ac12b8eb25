//! PASETO v2 providers (RustCrypto).
//!
//! ```
//! use pasetod_v2::PublicProvider;
//! use serde_json::json;
//!
//! // create a provider and give it a fresh key pair
//! let provider = PublicProvider::new();
//! provider.generate_key().unwrap();
//!
//! // mint a token asserting some claims
//! let token = provider
//!     .sign(&json!({ "sub": "conrad", "data": "this is a signed message" }), "")
//!     .unwrap();
//! assert!(token.starts_with("v2.public."));
//!
//! // verify the signature and validate the claims
//! let verified = provider.verify(&token).unwrap();
//! assert_eq!(verified.message["sub"], "conrad");
//! ```

#![forbid(unsafe_code)]

/// Low level implementation primitives.
pub mod core;

pub use pasetod_core::PasetoError;
pub use pasetod_core::key::Key;
pub use pasetod_core::token::VerifiedToken;

/// Signs and verifies `v2.public` tokens (Ed25519).
pub type PublicProvider = pasetod_core::provider::PublicProvider<core::V2>;

/// Encrypts and decrypts `v2.local` tokens (XChaCha20-Poly1305).
pub type LocalProvider = pasetod_core::provider::LocalProvider<core::V2>;
