//! Master-key material and the credential sources that produce it.
//!
//! Every way of opening a vault reduces to the same contract: given the
//! vault's unique id, produce the master key. Two sources exist, a raw key
//! (token-based access) and a passphrase stretched with PBKDF2-HMAC-SHA256
//! against the unique id (interactive access). Key material is zeroized on
//! drop and redacted from debug output.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{VaultError, VaultResult};

/// Minimum length of a caller-supplied raw master key, bytes.
pub const MIN_KEY_LENGTH: usize = 16;

/// Minimum length of a vault passphrase, characters.
pub const MIN_PASSPHRASE_LENGTH: usize = 12;

/// Length of a passphrase-derived master key, bytes.
const DERIVED_KEY_LENGTH: usize = 32;

/// PBKDF2 work factor for passphrase stretching.
const PBKDF2_ITERATIONS: u32 = 100_000;

/// Root secret of a vault session.
///
/// Never persisted directly; every operational key is derived from it.
/// Zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey(Vec<u8>);

impl MasterKey {
    pub(crate) const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrows the raw key material.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

/// Source of the vault master key.
pub trait Credentials: Send + Sync {
    /// Produces the master key for the vault identified by `unique_id`.
    fn master_key(&self, unique_id: &[u8]) -> MasterKey;
}

/// Credentials wrapping a caller-provided raw key.
///
/// The unique id plays no role here; the key is used as supplied.
pub struct KeyCredentials {
    key: MasterKey,
}

impl KeyCredentials {
    /// Validates and wraps a raw master key.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidCredentials`] for keys shorter than
    /// [`MIN_KEY_LENGTH`].
    pub fn new(key: &[u8]) -> VaultResult<Self> {
        if key.len() < MIN_KEY_LENGTH {
            return Err(VaultError::InvalidCredentials {
                reason: "master key too short",
            });
        }
        Ok(Self {
            key: MasterKey::new(key.to_vec()),
        })
    }
}

impl Credentials for KeyCredentials {
    fn master_key(&self, _unique_id: &[u8]) -> MasterKey {
        self.key.clone()
    }
}

impl fmt::Debug for KeyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyCredentials([REDACTED])")
    }
}

/// Credentials deriving the master key from a passphrase.
///
/// PBKDF2-HMAC-SHA256 with the vault's unique id as salt, so the same
/// passphrase yields unrelated keys for different vaults.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PassphraseCredentials {
    passphrase: String,
}

impl PassphraseCredentials {
    /// Validates and wraps a passphrase.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidCredentials`] for passphrases shorter
    /// than [`MIN_PASSPHRASE_LENGTH`] characters.
    pub fn new(passphrase: &str) -> VaultResult<Self> {
        if passphrase.chars().count() < MIN_PASSPHRASE_LENGTH {
            return Err(VaultError::InvalidCredentials {
                reason: "passphrase too short",
            });
        }
        Ok(Self {
            passphrase: passphrase.to_owned(),
        })
    }
}

impl Credentials for PassphraseCredentials {
    fn master_key(&self, unique_id: &[u8]) -> MasterKey {
        let mut key = vec![0u8; DERIVED_KEY_LENGTH];
        pbkdf2::pbkdf2_hmac::<sha2::Sha256>(
            self.passphrase.as_bytes(),
            unique_id,
            PBKDF2_ITERATIONS,
            &mut key,
        );
        MasterKey::new(key)
    }
}

impl fmt::Debug for PassphraseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PassphraseCredentials([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_key_must_meet_minimum_length() {
        let err = KeyCredentials::new(&[0u8; 15]).expect_err("short key");
        assert!(matches!(err, VaultError::InvalidCredentials { .. }));
        KeyCredentials::new(&[0u8; 16]).expect("16 bytes is enough");
    }

    #[test]
    fn passphrase_must_meet_minimum_length() {
        let err = PassphraseCredentials::new("elevenchars").expect_err("short passphrase");
        assert!(matches!(err, VaultError::InvalidCredentials { .. }));
        PassphraseCredentials::new("twelve chars").expect("12 chars is enough");
    }

    #[test]
    fn raw_key_ignores_unique_id() {
        let credentials = KeyCredentials::new(&[7u8; 32]).expect("credentials");
        let a = credentials.master_key(&[1; 32]);
        let b = credentials.master_key(&[2; 32]);
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.as_bytes(), &[7u8; 32]);
    }

    #[test]
    fn passphrase_derivation_is_deterministic_per_salt() {
        let credentials = PassphraseCredentials::new("a sturdy passphrase").expect("credentials");
        let first = credentials.master_key(&[3; 32]);
        let again = credentials.master_key(&[3; 32]);
        let other_salt = credentials.master_key(&[4; 32]);

        assert_eq!(first.as_bytes(), again.as_bytes());
        assert_ne!(first.as_bytes(), other_salt.as_bytes());
        assert_eq!(first.as_bytes().len(), 32);
    }

    #[test]
    fn different_passphrases_yield_different_keys() {
        let a = PassphraseCredentials::new("passphrase one").expect("credentials");
        let b = PassphraseCredentials::new("passphrase two").expect("credentials");
        assert_ne!(
            a.master_key(&[5; 32]).as_bytes(),
            b.master_key(&[5; 32]).as_bytes()
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let key = MasterKey::new(b"super secret key".to_vec());
        assert_eq!(format!("{key:?}"), "MasterKey([REDACTED])");

        let credentials = PassphraseCredentials::new("do not print me").expect("credentials");
        assert!(!format!("{credentials:?}").contains("print"));
    }
}
