//! Error taxonomy for vault operations.

use thiserror::Error;

use strongroom_store::StoreError;

/// Convenience alias for fallible vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Errors returned by vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The requested item does not exist in the vault. An expected outcome
    /// for `get` and `open` callers, not a crash.
    #[error("item not found: {id}")]
    NotFound {
        /// Identifier of the missing item.
        id: String,
    },

    /// MAC verification failed while decoding an encrypted block. During
    /// `open` this is the primary signal of wrong credentials.
    #[error("cannot read encrypted block: incorrect checksum")]
    Integrity,

    /// The format descriptor names an algorithm this build does not
    /// recognize.
    #[error("unsupported {family} format: {name}")]
    UnsupportedAlgorithm {
        /// Algorithm family the name belongs to (`encryption` or
        /// `checksum`).
        family: &'static str,
        /// The offending algorithm name.
        name: String,
    },

    /// The storage backend cannot export a connection descriptor.
    #[error("storage does not support connection info")]
    UnsupportedBackend,

    /// Attempted to delete one of the reserved vault items.
    #[error("item cannot be deleted: {id}")]
    ProtectedItem {
        /// The reserved identifier.
        id: String,
    },

    /// The access token is malformed or carries unusable credentials. One
    /// generic message for every token-shape failure; the token is the
    /// secret, so errors must not describe which part of it was wrong.
    #[error("invalid vault token")]
    InvalidToken,

    /// Key derivation could not produce the requested output.
    #[error("key derivation failed")]
    KeyDerivation,

    /// Supplied credential material fails minimum-strength validation.
    #[error("invalid credentials: {reason}")]
    InvalidCredentials {
        /// What the material failed to satisfy.
        reason: &'static str,
    },

    /// The underlying block storage failed.
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// JSON (de)serialization of a structured item failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
