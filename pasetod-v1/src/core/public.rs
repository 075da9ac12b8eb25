use pasetod_core::provider::{KeyPairMaterial, PublicVersion};
use pasetod_core::version::Version;
use pasetod_core::{PasetoError, ProviderError, VerificationError};
use rand_core::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs8::spki::{DecodePublicKey, EncodePublicKey};
use rsa::pss::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{Keypair, RandomizedSigner, SignatureEncoding, Verifier};
use rsa::traits::PublicKeyParts;
use sha2::Sha384;

use super::V1;

const MODULUS_BITS: usize = 2048;

impl PublicVersion for V1 {
    const VERSION: Version = Version::V1;

    fn generate_keys() -> Result<KeyPairMaterial, PasetoError> {
        let signing = SigningKey::<Sha384>::random(&mut OsRng, MODULUS_BITS)
            .map_err(|_| PasetoError::Provider(ProviderError::Crypto))?;
        let verifying = signing.verifying_key();

        let secret = signing
            .to_pkcs1_der()
            .map_err(|_| PasetoError::Provider(ProviderError::Crypto))?
            .as_bytes()
            .to_vec();
        let public = verifying
            .to_public_key_der()
            .map_err(|_| PasetoError::Provider(ProviderError::Crypto))?
            .into_vec();

        Ok(KeyPairMaterial {
            secret: secret.into_boxed_slice(),
            public: public.into_boxed_slice(),
        })
    }

    fn sign(secret: &[u8], message: &[u8]) -> Result<Vec<u8>, PasetoError> {
        let signing = decode_signing_key(secret)?;
        let signature = signing
            .try_sign_with_rng(&mut OsRng, message)
            .map_err(|_| PasetoError::Provider(ProviderError::Crypto))?;

        Ok(signature.to_bytes().into_vec())
    }

    fn verify(public: &[u8], message: &[u8], signature: &[u8]) -> Result<(), PasetoError> {
        let verifying = decode_verifying_key(public)?;
        let signature = Signature::try_from(signature)
            .map_err(|_| PasetoError::Verification(VerificationError::Signature))?;

        verifying
            .verify(message, &signature)
            .map_err(|_| PasetoError::Verification(VerificationError::Signature))
    }
}

fn decode_signing_key(bytes: &[u8]) -> Result<SigningKey<Sha384>, PasetoError> {
    let key = rsa::RsaPrivateKey::from_pkcs1_der(bytes)
        .map_err(|_| PasetoError::Provider(ProviderError::InvalidKey))?;

    if key.n().bits() != MODULUS_BITS {
        return Err(PasetoError::Provider(ProviderError::InvalidKey));
    }

    Ok(SigningKey::new(key))
}

fn decode_verifying_key(bytes: &[u8]) -> Result<VerifyingKey<Sha384>, PasetoError> {
    let key = rsa::RsaPublicKey::from_public_key_der(bytes)
        .map_err(|_| PasetoError::Provider(ProviderError::InvalidKey))?;

    if key.n().bits() != MODULUS_BITS {
        return Err(PasetoError::Provider(ProviderError::InvalidKey));
    }

    Ok(VerifyingKey::new(key))
}
