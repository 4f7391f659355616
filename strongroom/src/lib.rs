//! Authenticated secrets vault over untrusted blob storage.
//!
//! A vault protects a small set of named items, chiefly the connection and
//! format descriptor of the repository it guards, on top of a flat block
//! store it does not trust. Every working key is derived from a single
//! master secret:
//!
//! ```text
//! credentials ──► master key ──HKDF-SHA256(salt=uniqueID, info=purpose)──►
//!     cipher key (AES-CTR)          checksum key (HMAC-SHA256)
//! ```
//!
//! Items are sealed with encrypt-then-MAC: the stored blob is
//! `IV || ciphertext || MAC`, where the MAC covers `IV || ciphertext` and is
//! verified in constant time before any decryption. The `none` encryption
//! mode stores plaintext verbatim with no integrity layer.
//!
//! Three reserved items bootstrap the vault: `format` (plaintext algorithm
//! descriptor), `checksum` (an encrypted sentinel of random bytes whose
//! successful decode proves the credentials are right), and `repo` (the
//! encrypted repository configuration). [`Vault::token`] exports a portable
//! string that reconstitutes both the storage location and the master key;
//! [`Vault::open_with_token`] turns it back into an open vault.

mod credentials;
mod crypto;
mod error;
mod format;
mod repo;
mod token;
mod vault;

pub use credentials::{
    Credentials, KeyCredentials, MasterKey, PassphraseCredentials, MIN_KEY_LENGTH,
    MIN_PASSPHRASE_LENGTH,
};
pub use error::{VaultError, VaultResult};
pub use format::{ChecksumAlgorithm, EncryptionAlgorithm, Format, FORMAT_VERSION, UNIQUE_ID_LENGTH};
pub use repo::{Repository, RepositoryConfig, RepositoryFormat};
pub use vault::{Vault, CHECKSUM_ITEM_ID, FORMAT_ITEM_ID, REPOSITORY_ITEM_ID};
