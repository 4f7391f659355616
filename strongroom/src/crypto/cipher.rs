//! AES-CTR stream transforms for sealed blocks.
//!
//! CTR turns AES into a stream cipher: ciphertext length equals plaintext
//! length, and the IV can be public as long as it is never reused under the
//! same key. Callers guarantee that by drawing a fresh random IV on every
//! write. The counter is the full 16-byte block interpreted big-endian,
//! matching the stored-blob format.

use aes::cipher::{KeyIvInit, StreamCipher};
use aes::{Aes128, Aes192, Aes256};

use crate::error::{VaultError, VaultResult};
use crate::format::EncryptionAlgorithm;

/// AES block size, bytes; also the IV length for every supported cipher.
pub(crate) const BLOCK_SIZE: usize = 16;

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type Aes192Ctr = ctr::Ctr128BE<Aes192>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// XORs the keystream for `algorithm` over `data` in place.
///
/// CTR is an involution: the same call encrypts and decrypts.
pub(crate) fn apply_keystream(
    algorithm: EncryptionAlgorithm,
    key: &[u8],
    iv: &[u8],
    data: &mut [u8],
) -> VaultResult<()> {
    match algorithm {
        EncryptionAlgorithm::None => Ok(()),
        EncryptionAlgorithm::Aes128 => {
            let mut cipher =
                Aes128Ctr::new_from_slices(key, iv).map_err(|_| VaultError::KeyDerivation)?;
            cipher.apply_keystream(data);
            Ok(())
        }
        EncryptionAlgorithm::Aes192 => {
            let mut cipher =
                Aes192Ctr::new_from_slices(key, iv).map_err(|_| VaultError::KeyDerivation)?;
            cipher.apply_keystream(data);
            Ok(())
        }
        EncryptionAlgorithm::Aes256 => {
            let mut cipher =
                Aes256Ctr::new_from_slices(key, iv).map_err(|_| VaultError::KeyDerivation)?;
            cipher.apply_keystream(data);
            Ok(())
        }
    }
}
