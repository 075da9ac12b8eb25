use blake2::Blake2bMac;
use chacha20poly1305::aead::{AeadInPlace, KeyInit};
use chacha20poly1305::{Tag, XChaCha20Poly1305, XNonce};
use digest::consts::U24;
use digest::Mac;
use pasetod_core::pae;
use pasetod_core::provider::LocalVersion;
use pasetod_core::version::Version;
use pasetod_core::{InvalidToken, PasetoError, ProviderError};

use super::{random_bytes, V2};

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 24;
const TAG_LEN: usize = 16;

impl LocalVersion for V2 {
    const VERSION: Version = Version::V2;

    fn generate_key() -> Result<Box<[u8]>, PasetoError> {
        let bytes: [u8; KEY_LEN] = random_bytes()?;
        Ok(bytes.to_vec().into_boxed_slice())
    }

    fn encrypt(
        key: &[u8],
        header: &str,
        message: &[u8],
        footer: &[u8],
    ) -> Result<Vec<u8>, PasetoError> {
        let key = decode_key(key)?;
        let seed: [u8; NONCE_LEN] = random_bytes()?;
        let nonce = derive_nonce(&seed, message);

        let aad = pae::pre_auth_encode_vec(&[header.as_bytes(), &nonce, footer])?;

        let mut payload = Vec::with_capacity(NONCE_LEN + message.len() + TAG_LEN);
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(message);

        let tag = XChaCha20Poly1305::new((&key).into())
            .encrypt_in_place_detached(XNonce::from_slice(&nonce), &aad, &mut payload[NONCE_LEN..])
            .map_err(|_| PasetoError::Provider(ProviderError::Crypto))?;
        payload.extend_from_slice(&tag);

        Ok(payload)
    }

    fn decrypt(
        key: &[u8],
        header: &str,
        payload: &[u8],
        footer: &[u8],
    ) -> Result<Vec<u8>, PasetoError> {
        let key = decode_key(key)?;
        if payload.len() < NONCE_LEN + TAG_LEN {
            return Err(PasetoError::InvalidToken(InvalidToken::Malformed));
        }

        let (nonce, rest) = payload.split_at(NONCE_LEN);
        let (ciphertext, tag) = rest.split_at(rest.len() - TAG_LEN);

        let aad = pae::pre_auth_encode_vec(&[header.as_bytes(), nonce, footer])?;

        let mut cleartext = ciphertext.to_vec();
        XChaCha20Poly1305::new((&key).into())
            .decrypt_in_place_detached(
                XNonce::from_slice(nonce),
                &aad,
                &mut cleartext,
                Tag::from_slice(tag),
            )
            .map_err(|_| PasetoError::Decryption)?;

        Ok(cleartext)
    }
}

fn decode_key(bytes: &[u8]) -> Result<[u8; KEY_LEN], PasetoError> {
    bytes
        .try_into()
        .map_err(|_| PasetoError::Provider(ProviderError::InvalidKey))
}

/// Nonce = keyed BLAKE2b-24 of the message under a random seed; a
/// (nonce, message) pair never repeats even if the seed does.
fn derive_nonce(seed: &[u8; NONCE_LEN], message: &[u8]) -> [u8; NONCE_LEN] {
    let mut mac =
        <Blake2bMac<U24> as Mac>::new_from_slice(seed).expect("24 bytes is a valid key length");
    mac.update(message);

    let mut nonce = [0; NONCE_LEN];
    nonce.copy_from_slice(&mac.finalize().into_bytes());
    nonce
}
