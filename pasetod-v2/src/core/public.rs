use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use pasetod_core::provider::{KeyPairMaterial, PublicVersion};
use pasetod_core::version::Version;
use pasetod_core::{PasetoError, ProviderError, VerificationError};

use super::{random_bytes, V2};

impl PublicVersion for V2 {
    const VERSION: Version = Version::V2;

    fn generate_keys() -> Result<KeyPairMaterial, PasetoError> {
        let seed: [u8; 32] = random_bytes()?;
        let signing = SigningKey::from_bytes(&seed);
        let verifying = signing.verifying_key();

        // secret material is seed || public key, so decoding can confirm
        // the two halves still belong together
        let mut secret = Vec::with_capacity(64);
        secret.extend_from_slice(&seed);
        secret.extend_from_slice(verifying.as_bytes());

        Ok(KeyPairMaterial {
            secret: secret.into_boxed_slice(),
            public: verifying.as_bytes().to_vec().into_boxed_slice(),
        })
    }

    fn sign(secret: &[u8], message: &[u8]) -> Result<Vec<u8>, PasetoError> {
        let signing = decode_signing_key(secret)?;
        Ok(signing.sign(message).to_bytes().to_vec())
    }

    fn verify(public: &[u8], message: &[u8], signature: &[u8]) -> Result<(), PasetoError> {
        let verifying = decode_verifying_key(public)?;
        let signature = Signature::from_slice(signature)
            .map_err(|_| PasetoError::Verification(VerificationError::Signature))?;

        verifying
            .verify(message, &signature)
            .map_err(|_| PasetoError::Verification(VerificationError::Signature))
    }
}

fn decode_verifying_key(bytes: &[u8]) -> Result<VerifyingKey, PasetoError> {
    let bytes: &[u8; 32] = bytes
        .try_into()
        .map_err(|_| PasetoError::Provider(ProviderError::InvalidKey))?;
    VerifyingKey::from_bytes(bytes).map_err(|_| PasetoError::Provider(ProviderError::InvalidKey))
}

fn decode_signing_key(bytes: &[u8]) -> Result<SigningKey, PasetoError> {
    let (seed, public) = bytes
        .split_first_chunk::<32>()
        .ok_or(PasetoError::Provider(ProviderError::InvalidKey))?;

    let signing = SigningKey::from_bytes(seed);
    if signing.verifying_key().as_bytes() != public {
        return Err(PasetoError::Provider(ProviderError::InvalidKey));
    }

    Ok(signing)
}
