use pasetod_core::pae::WriteBytes;
use pasetod_core::{PasetoError, ProviderError};

mod local;
mod public;

/// The v4 protocol suite.
pub struct V4;

fn random_bytes<const N: usize>() -> Result<[u8; N], PasetoError> {
    let mut bytes = [0; N];
    getrandom::fill(&mut bytes).map_err(|_| PasetoError::Provider(ProviderError::Crypto))?;
    Ok(bytes)
}

/// Streams the pre-authentication encoding straight into a MAC context.
struct PreAuthEncodeDigest<'a, M: digest::Update>(pub &'a mut M);

impl<M: digest::Update> WriteBytes for PreAuthEncodeDigest<'_, M> {
    fn write(&mut self, slice: &[u8]) {
        self.0.update(slice);
    }
}
