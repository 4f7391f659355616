//! Encrypt-then-MAC block codec.
//!
//! Sealed layout: `IV || ciphertext || tag`, with the tag computed over
//! `IV || ciphertext`. Binding the IV into the authenticated data means IV
//! substitution is detected like any other tamper. Decoding verifies before
//! it decrypts; a blob that fails verification is rejected without ever
//! touching the cipher.

use std::fmt;

use zeroize::Zeroizing;

use crate::crypto::{checksum, cipher, kdf};
use crate::error::{VaultError, VaultResult};
use crate::format::{ChecksumAlgorithm, EncryptionAlgorithm, Format};

/// Symmetric codec resolved once per vault from its format descriptor.
///
/// Holds the parsed algorithm choices and both derived subkeys, so item
/// operations never re-parse names or re-run the KDF.
pub(crate) struct BlockCodec {
    encryption: EncryptionAlgorithm,
    checksum: ChecksumAlgorithm,
    cipher_key: Zeroizing<Vec<u8>>,
    checksum_key: Zeroizing<Vec<u8>>,
}

impl BlockCodec {
    /// Resolves algorithm names and derives both subkeys.
    ///
    /// Fails fast: an unsupported name in either field surfaces here, at
    /// vault construction, not on first use.
    pub(crate) fn new(format: &Format, master_key: &[u8]) -> VaultResult<Self> {
        let encryption = EncryptionAlgorithm::parse(&format.encryption)?;
        let checksum = ChecksumAlgorithm::parse(&format.checksum)?;

        let (cipher_key, checksum_key) = if encryption == EncryptionAlgorithm::None {
            (Zeroizing::new(Vec::new()), Zeroizing::new(Vec::new()))
        } else {
            (
                kdf::derive_key(
                    master_key,
                    &format.unique_id,
                    kdf::PURPOSE_AES_KEY,
                    encryption.key_length(),
                )?,
                kdf::derive_key(
                    master_key,
                    &format.unique_id,
                    kdf::PURPOSE_CHECKSUM_KEY,
                    checksum.key_length(),
                )?,
            )
        };

        Ok(Self {
            encryption,
            checksum,
            cipher_key,
            checksum_key,
        })
    }

    /// Seals `plaintext` into its stored representation.
    ///
    /// With encryption `none` this is the identity function; otherwise a
    /// fresh random IV is drawn for every call.
    pub(crate) fn encode(&self, plaintext: &[u8]) -> VaultResult<Vec<u8>> {
        if self.encryption == EncryptionAlgorithm::None {
            return Ok(plaintext.to_vec());
        }

        let iv_length = cipher::BLOCK_SIZE;
        let tag_length = self.checksum.tag_length();
        let authenticated = iv_length + plaintext.len();

        let mut blob = vec![0u8; authenticated + tag_length];
        getrandom::getrandom(&mut blob[..iv_length]).expect("getrandom failed");
        blob[iv_length..authenticated].copy_from_slice(plaintext);

        let (iv, rest) = blob.split_at_mut(iv_length);
        let (body, _) = rest.split_at_mut(plaintext.len());
        cipher::apply_keystream(self.encryption, &self.cipher_key, iv, body)?;

        let tag = checksum::compute_tag(self.checksum, &self.checksum_key, &blob[..authenticated])?;
        blob[authenticated..].copy_from_slice(&tag);
        Ok(blob)
    }

    /// Opens a stored blob, verifying integrity before decrypting.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Integrity`] for truncated blobs and for any
    /// tag mismatch; the ciphertext is discarded undecrypted in both cases.
    pub(crate) fn decode(&self, blob: &[u8]) -> VaultResult<Vec<u8>> {
        if self.encryption == EncryptionAlgorithm::None {
            return Ok(blob.to_vec());
        }

        let iv_length = cipher::BLOCK_SIZE;
        let tag_length = self.checksum.tag_length();
        if blob.len() < iv_length + tag_length {
            return Err(VaultError::Integrity);
        }

        let authenticated = blob.len() - tag_length;
        let expected =
            checksum::compute_tag(self.checksum, &self.checksum_key, &blob[..authenticated])?;
        if !checksum::verify_tag(&expected, &blob[authenticated..]) {
            return Err(VaultError::Integrity);
        }

        let (iv, ciphertext) = blob[..authenticated].split_at(iv_length);
        let mut plaintext = ciphertext.to_vec();
        cipher::apply_keystream(self.encryption, &self.cipher_key, iv, &mut plaintext)?;
        Ok(plaintext)
    }
}

impl fmt::Debug for BlockCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockCodec")
            .field("encryption", &self.encryption)
            .field("checksum", &self.checksum)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::OsRng;
    use rand::RngCore;

    use super::*;

    fn test_format(encryption: &str) -> Format {
        Format {
            version: "1".to_owned(),
            encryption: encryption.to_owned(),
            checksum: "hmac-sha-256".to_owned(),
            unique_id: vec![0x5A; 32],
        }
    }

    fn test_codec(encryption: &str) -> BlockCodec {
        BlockCodec::new(&test_format(encryption), b"master key for codec tests!!")
            .expect("codec")
    }

    #[test]
    fn round_trips_every_supported_suite() {
        for encryption in ["none", "aes-128", "aes-192", "aes-256"] {
            let codec = test_codec(encryption);
            let mut payload = vec![0u8; 300];
            OsRng.fill_bytes(&mut payload);

            let blob = codec.encode(&payload).expect("encode");
            let restored = codec.decode(&blob).expect("decode");
            assert_eq!(restored, payload, "suite {encryption}");
        }
    }

    #[test]
    fn sealed_layout_has_iv_and_tag_overhead() {
        let codec = test_codec("aes-256");
        let blob = codec.encode(b"hello").expect("encode");
        assert_eq!(blob.len(), 16 + 5 + 32);
    }

    #[test]
    fn none_is_the_identity() {
        let codec = test_codec("none");
        let blob = codec.encode(b"in the clear").expect("encode");
        assert_eq!(blob, b"in the clear");
        assert_eq!(codec.decode(&blob).expect("decode"), b"in the clear");
    }

    #[test]
    fn fresh_iv_every_encode() {
        let codec = test_codec("aes-256");
        let a = codec.encode(b"identical plaintext").expect("encode");
        let b = codec.encode(b"identical plaintext").expect("encode");
        assert_ne!(a, b);
    }

    #[test]
    fn any_corrupt_byte_is_detected() {
        let codec = test_codec("aes-256");
        let blob = codec.encode(b"tamper target").expect("encode");

        // One flip in each region: IV, ciphertext, tag.
        for index in [0, 16, blob.len() - 1] {
            let mut corrupt = blob.clone();
            corrupt[index] ^= 0x80;
            let result = codec.decode(&corrupt);
            assert!(
                matches!(result, Err(VaultError::Integrity)),
                "byte {index} should fail verification"
            );
        }
    }

    #[test]
    fn truncated_blob_is_rejected() {
        let codec = test_codec("aes-256");
        let blob = codec.encode(b"short").expect("encode");

        for len in [0, 1, 16, 47] {
            let result = codec.decode(&blob[..len]);
            assert!(
                matches!(result, Err(VaultError::Integrity)),
                "length {len} should be rejected"
            );
        }
    }

    #[test]
    fn wrong_master_key_fails_verification() {
        let format = test_format("aes-256");
        let sealer = BlockCodec::new(&format, b"the right master key...........").expect("codec");
        let opener = BlockCodec::new(&format, b"the wrong master key...........").expect("codec");

        let blob = sealer.encode(b"secret").expect("encode");
        assert!(matches!(opener.decode(&blob), Err(VaultError::Integrity)));
    }

    #[test]
    fn empty_plaintext_round_trips() {
        let codec = test_codec("aes-192");
        let blob = codec.encode(b"").expect("encode");
        assert_eq!(blob.len(), 16 + 32);
        assert_eq!(codec.decode(&blob).expect("decode"), b"");
    }

    #[test]
    fn unknown_names_fail_at_construction() {
        let err = BlockCodec::new(&test_format("aes-512"), b"irrelevant master key bytes!")
            .expect_err("unknown cipher");
        assert!(matches!(err, VaultError::UnsupportedAlgorithm { .. }));

        let mut format = test_format("aes-256");
        format.checksum = "hmac-sha-1".to_owned();
        let err = BlockCodec::new(&format, b"irrelevant master key bytes!")
            .expect_err("unknown checksum");
        assert!(matches!(err, VaultError::UnsupportedAlgorithm { .. }));
    }
}
