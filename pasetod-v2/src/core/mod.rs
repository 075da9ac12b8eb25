use pasetod_core::{PasetoError, ProviderError};

mod local;
mod public;

/// The v2 protocol suite.
pub struct V2;

fn random_bytes<const N: usize>() -> Result<[u8; N], PasetoError> {
    let mut bytes = [0; N];
    getrandom::fill(&mut bytes).map_err(|_| PasetoError::Provider(ProviderError::Crypto))?;
    Ok(bytes)
}
