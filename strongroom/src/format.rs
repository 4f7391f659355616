//! Vault format descriptor and algorithm selection.
//!
//! The `format` item is stored in plaintext: it must be readable before any
//! key material exists, and nothing in it is secret. Algorithm names are
//! persisted as strings so that a vault written by a build with more
//! algorithms still parses here and fails with a precise
//! [`VaultError::UnsupportedAlgorithm`] instead of a serialization error.

use serde::{Deserialize, Serialize};

use crate::error::{VaultError, VaultResult};

/// Current (and only) vault format version.
pub const FORMAT_VERSION: &str = "1";

/// Length of the per-vault random identifier, bytes. The identifier doubles
/// as the KDF salt and must never change after creation.
pub const UNIQUE_ID_LENGTH: usize = 32;

/// Symmetric encryption choices for sealed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionAlgorithm {
    /// No encryption; items are stored verbatim with no integrity layer.
    None,
    /// AES-CTR with a 16-byte derived key.
    Aes128,
    /// AES-CTR with a 24-byte derived key.
    Aes192,
    /// AES-CTR with a 32-byte derived key.
    Aes256,
}

impl EncryptionAlgorithm {
    /// Names accepted in the `encryption` field of a format descriptor.
    pub const SUPPORTED: [&'static str; 4] = ["none", "aes-128", "aes-192", "aes-256"];

    /// Resolves an algorithm name from a format descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::UnsupportedAlgorithm`] naming the offending
    /// string for anything outside [`Self::SUPPORTED`].
    pub fn parse(name: &str) -> VaultResult<Self> {
        match name {
            "none" => Ok(Self::None),
            "aes-128" => Ok(Self::Aes128),
            "aes-192" => Ok(Self::Aes192),
            "aes-256" => Ok(Self::Aes256),
            other => Err(VaultError::UnsupportedAlgorithm {
                family: "encryption",
                name: other.to_owned(),
            }),
        }
    }

    /// Canonical name as persisted in the format descriptor.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Aes128 => "aes-128",
            Self::Aes192 => "aes-192",
            Self::Aes256 => "aes-256",
        }
    }

    /// Derived cipher key length in bytes; zero when encryption is off.
    #[must_use]
    pub const fn key_length(self) -> usize {
        match self {
            Self::None => 0,
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }
}

/// Keyed-MAC choices for sealed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    /// HMAC over SHA-256 with a 32-byte derived key.
    HmacSha256,
}

impl ChecksumAlgorithm {
    /// Names accepted in the `checksum` field of a format descriptor.
    pub const SUPPORTED: [&'static str; 1] = ["hmac-sha-256"];

    /// Resolves an algorithm name from a format descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::UnsupportedAlgorithm`] naming the offending
    /// string for anything outside [`Self::SUPPORTED`].
    pub fn parse(name: &str) -> VaultResult<Self> {
        match name {
            "hmac-sha-256" => Ok(Self::HmacSha256),
            other => Err(VaultError::UnsupportedAlgorithm {
                family: "checksum",
                name: other.to_owned(),
            }),
        }
    }

    /// Canonical name as persisted in the format descriptor.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HmacSha256 => "hmac-sha-256",
        }
    }

    /// Derived MAC key length, bytes.
    #[must_use]
    pub const fn key_length(self) -> usize {
        match self {
            Self::HmacSha256 => 32,
        }
    }

    /// Length of the tag appended to sealed blocks, bytes.
    #[must_use]
    pub const fn tag_length(self) -> usize {
        match self {
            Self::HmacSha256 => 32,
        }
    }
}

/// Persisted plaintext descriptor of a vault's version and algorithms.
///
/// Serialized as JSON under the reserved `format` item; the `uniqueID`
/// field is standard base64, matching the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    /// Format version, fixed at [`FORMAT_VERSION`].
    pub version: String,
    /// Encryption algorithm name, one of
    /// [`EncryptionAlgorithm::SUPPORTED`].
    pub encryption: String,
    /// Checksum algorithm name, one of [`ChecksumAlgorithm::SUPPORTED`].
    pub checksum: String,
    /// Per-vault random salt, [`UNIQUE_ID_LENGTH`] bytes once created.
    #[serde(rename = "uniqueID", with = "base64_bytes")]
    pub unique_id: Vec<u8>,
}

impl Format {
    /// Fresh-vault defaults: `aes-256` + `hmac-sha-256`, no unique id yet
    /// (creation fills it in).
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: FORMAT_VERSION.to_owned(),
            encryption: EncryptionAlgorithm::Aes256.name().to_owned(),
            checksum: ChecksumAlgorithm::HmacSha256.name().to_owned(),
            unique_id: Vec::new(),
        }
    }

    /// Replaces the unique id with fresh random bytes.
    ///
    /// Called exactly once, at vault creation.
    pub(crate) fn generate_unique_id(&mut self) {
        let mut id = vec![0u8; UNIQUE_ID_LENGTH];
        getrandom::getrandom(&mut id).expect("getrandom failed");
        self.unique_id = id;
    }
}

impl Default for Format {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text).map_err(serde::de::Error::custom)
    }
}
