use blake2::Blake2bMac;
use chacha20::{Key, XChaCha20, XNonce};
use cipher::{KeyIvInit, StreamCipher};
use digest::consts::{U32, U56};
use digest::Mac;
use pasetod_core::pae;
use pasetod_core::provider::LocalVersion;
use pasetod_core::version::Version;
use pasetod_core::{InvalidToken, PasetoError, ProviderError};

use super::{random_bytes, PreAuthEncodeDigest, V4};

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 32;
const TAG_LEN: usize = 32;

impl LocalVersion for V4 {
    const VERSION: Version = Version::V4;

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
        let nonce: [u8; NONCE_LEN] = random_bytes()?;
        let (mut cipher, mut mac) = split_key(&key, &nonce);

        let mut payload = Vec::with_capacity(NONCE_LEN + message.len() + TAG_LEN);
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(message);
        cipher.apply_keystream(&mut payload[NONCE_LEN..]);

        pre_auth(&mut mac, header, &nonce, &payload[NONCE_LEN..], footer)?;
        payload.extend_from_slice(&mac.finalize().into_bytes());

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

        let (mut cipher, mut mac) = split_key(&key, nonce);
        pre_auth(&mut mac, header, nonce, ciphertext, footer)?;
        mac.verify_slice(tag).map_err(|_| PasetoError::Decryption)?;

        let mut cleartext = ciphertext.to_vec();
        cipher.apply_keystream(&mut cleartext);

        Ok(cleartext)
    }
}

fn decode_key(bytes: &[u8]) -> Result<[u8; KEY_LEN], PasetoError> {
    bytes
        .try_into()
        .map_err(|_| PasetoError::Provider(ProviderError::InvalidKey))
}

/// Derive the per-token cipher and MAC from the master key and nonce.
fn split_key(key: &[u8; KEY_LEN], nonce: &[u8]) -> (XChaCha20, Blake2bMac<U32>) {
    let okm = kdf56(key, b"paseto-encryption-key", nonce);
    let (ek, n2) = okm.split_at(32);
    let ak = kdf32(key, b"paseto-auth-key-for-aead", nonce);

    let cipher = XChaCha20::new(Key::from_slice(ek), XNonce::from_slice(n2));
    let mac = Blake2bMac::new_from_slice(&ak).expect("32 bytes is a valid key length");
    (cipher, mac)
}

fn kdf56(key: &[u8], sep: &[u8], nonce: &[u8]) -> [u8; 56] {
    let mut mac =
        Blake2bMac::<U56>::new_from_slice(key).expect("32 bytes is a valid key length");
    mac.update(sep);
    mac.update(nonce);

    let mut out = [0; 56];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

fn kdf32(key: &[u8], sep: &[u8], nonce: &[u8]) -> [u8; 32] {
    let mut mac =
        Blake2bMac::<U32>::new_from_slice(key).expect("32 bytes is a valid key length");
    mac.update(sep);
    mac.update(nonce);

    let mut out = [0; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

fn pre_auth(
    mac: &mut Blake2bMac<U32>,
    header: &str,
    nonce: &[u8],
    ciphertext: &[u8],
    footer: &[u8],
) -> Result<(), PasetoError> {
    // the trailing empty piece holds the slot v4 reserves for implicit
    // assertions, which this engine does not accept
    pae::pre_auth_encode(
        &[header.as_bytes(), nonce, ciphertext, footer, b""],
        PreAuthEncodeDigest(mac),
    )
}
