//! Pre-authentication encoding.
//!
//! Every MAC and signature in the protocol is computed over this encoding
//! rather than a bare concatenation: an 8-byte little-endian piece count,
//! then each piece prefixed with its 8-byte little-endian length. No two
//! distinct piece sequences share an encoding, so an attacker cannot move
//! bytes between the header, message, and footer without breaking the tag.

use crate::{PasetoError, ProviderError};

/// A byte sink for [`pre_auth_encode`].
///
/// Implemented for `Vec<u8>` for buffering, and by the version crates for
/// streaming directly into a MAC or digest context.
pub trait WriteBytes {
    fn write(&mut self, slice: &[u8]);
}

impl WriteBytes for Vec<u8> {
    fn write(&mut self, slice: &[u8]) {
        self.extend_from_slice(slice);
    }
}

impl<W: WriteBytes> WriteBytes for &mut W {
    fn write(&mut self, slice: &[u8]) {
        W::write(self, slice);
    }
}

/// Stream the pre-authentication encoding of `pieces` into `out`.
///
/// Fails if a length does not fit the 8-byte prefix; nothing is ever
/// silently truncated.
pub fn pre_auth_encode(pieces: &[&[u8]], mut out: impl WriteBytes) -> Result<(), PasetoError> {
    let count = le64(pieces.len())?;
    out.write(&count);
    for piece in pieces {
        let len = le64(piece.len())?;
        out.write(&len);
        out.write(piece);
    }
    Ok(())
}

/// [`pre_auth_encode`] into a fresh buffer.
pub fn pre_auth_encode_vec(pieces: &[&[u8]]) -> Result<Vec<u8>, PasetoError> {
    let mut out = Vec::new();
    pre_auth_encode(pieces, &mut out)?;
    Ok(out)
}

fn le64(value: usize) -> Result<[u8; 8], PasetoError> {
    u64::try_from(value)
        .map(u64::to_le_bytes)
        .map_err(|_| PasetoError::Provider(ProviderError::Oversized))
}

#[cfg(test)]
mod tests {
    use super::pre_auth_encode_vec;

    fn pae(pieces: &[&[u8]]) -> Vec<u8> {
        pre_auth_encode_vec(pieces).unwrap()
    }

    #[test]
    fn known_encodings() {
        assert_eq!(pae(&[]), b"\x00\x00\x00\x00\x00\x00\x00\x00");

        assert_eq!(
            pae(&[b""]),
            b"\x01\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00"
        );

        assert_eq!(
            pae(&[b"test"]),
            b"\x01\x00\x00\x00\x00\x00\x00\x00\x04\x00\x00\x00\x00\x00\x00\x00test"
        );
    }

    #[test]
    fn adjacent_pieces_do_not_collide() {
        assert_ne!(pae(&[b"a", b"bc"]), pae(&[b"ab", b"c"]));
        assert_ne!(pae(&[b"ab"]), pae(&[b"a", b"b"]));
    }
}
