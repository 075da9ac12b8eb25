use aes::Aes256;
use cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr64BE;
use digest::Mac;
use hmac::Hmac;
use pasetod_core::pae;
use pasetod_core::provider::LocalVersion;
use pasetod_core::version::Version;
use pasetod_core::{InvalidToken, PasetoError, ProviderError};
use sha2::Sha384;

use super::{random_bytes, PreAuthEncodeDigest, V1};

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 32;
const TAG_LEN: usize = 48;

impl LocalVersion for V1 {
    const VERSION: Version = Version::V1;

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

/// Nonce = HMAC-SHA-384 of the message under a random seed, truncated to
/// 32 bytes; a (nonce, message) pair never repeats even if the seed does.
fn derive_nonce(seed: &[u8; NONCE_LEN], message: &[u8]) -> [u8; NONCE_LEN] {
    let mut mac: Hmac<Sha384> =
        Mac::new_from_slice(seed).expect("any key length is valid for hmac");
    mac.update(message);

    let mut nonce = [0; NONCE_LEN];
    nonce.copy_from_slice(&mac.finalize().into_bytes()[..NONCE_LEN]);
    nonce
}

/// Derive the per-token cipher and MAC: HKDF-SHA-384 salted with the first
/// half of the nonce, the second half as the CTR IV.
fn split_key(key: &[u8; KEY_LEN], nonce: &[u8]) -> (Ctr64BE<Aes256>, Hmac<Sha384>) {
    let (salt, iv) = nonce.split_at(16);
    let iv: &[u8; 16] = iv.try_into().expect("nonce is 32 bytes");

    let ek = kdf(key, salt, b"paseto-encryption-key");
    let ak = kdf(key, salt, b"paseto-auth-key-for-aead");

    let cipher = Ctr64BE::<Aes256>::new((&ek).into(), iv.into());
    let mac = Mac::new_from_slice(&ak).expect("any key length is valid for hmac");
    (cipher, mac)
}

fn kdf(key: &[u8], salt: &[u8], info: &[u8]) -> [u8; 32] {
    let mut okm = [0; 32];
    hkdf::Hkdf::<Sha384>::new(Some(salt), key)
        .expand(info, &mut okm)
        .expect("32 bytes is a valid hkdf output length");
    okm
}

fn pre_auth(
    mac: &mut Hmac<Sha384>,
    header: &str,
    nonce: &[u8],
    ciphertext: &[u8],
    footer: &[u8],
) -> Result<(), PasetoError> {
    pae::pre_auth_encode(
        &[header.as_bytes(), nonce, ciphertext, footer],
        PreAuthEncodeDigest(mac),
    )
}
