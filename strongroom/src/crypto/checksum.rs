//! Keyed integrity tags for sealed blocks.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{VaultError, VaultResult};
use crate::format::ChecksumAlgorithm;

type HmacSha256 = Hmac<Sha256>;

/// Computes the tag for `data` under `key`.
pub(crate) fn compute_tag(
    algorithm: ChecksumAlgorithm,
    key: &[u8],
    data: &[u8],
) -> VaultResult<Vec<u8>> {
    match algorithm {
        ChecksumAlgorithm::HmacSha256 => {
            let mut mac =
                <HmacSha256 as Mac>::new_from_slice(key).map_err(|_| VaultError::KeyDerivation)?;
            mac.update(data);
            Ok(mac.finalize().into_bytes().to_vec())
        }
    }
}

/// Compares a received tag against the expected one in constant time.
pub(crate) fn verify_tag(expected: &[u8], received: &[u8]) -> bool {
    expected.ct_eq(received).into()
}
