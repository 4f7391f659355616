//! HKDF-SHA256 subkey derivation.
//!
//! All operational keys descend from the master key through
//! `HKDF(ikm = master key, salt = unique id, info = purpose)`. The two
//! purpose labels keep the cipher and checksum keys independent even though
//! they share the same master key and salt; their exact bytes are part of
//! the wire contract and must never change.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{VaultError, VaultResult};

/// Info label for cipher-key derivation.
pub(crate) const PURPOSE_AES_KEY: &[u8] = b"AES";

/// Info label for checksum-key derivation.
pub(crate) const PURPOSE_CHECKSUM_KEY: &[u8] = b"CHECKSUM";

/// Derives `length` bytes of key material for `purpose`.
pub(crate) fn derive_key(
    master_key: &[u8],
    unique_id: &[u8],
    purpose: &[u8],
    length: usize,
) -> VaultResult<Zeroizing<Vec<u8>>> {
    let hkdf = Hkdf::<Sha256>::new(Some(unique_id), master_key);
    let mut key = Zeroizing::new(vec![0u8; length]);
    hkdf.expand(purpose, &mut key)
        .map_err(|_| VaultError::KeyDerivation)?;
    Ok(key)
}
