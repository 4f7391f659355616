//! The vault: named sealed items over an untrusted block store.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use strongroom_store::BlobStorage;

use crate::credentials::{Credentials, KeyCredentials, MasterKey};
use crate::crypto::codec::BlockCodec;
use crate::error::{VaultError, VaultResult};
use crate::format::{Format, FORMAT_VERSION};
use crate::repo::{Repository, RepositoryConfig, RepositoryFormat};
use crate::token;

/// Reserved item holding the plaintext format descriptor.
pub const FORMAT_ITEM_ID: &str = "format";

/// Reserved item holding the encrypted credential-verification sentinel.
pub const CHECKSUM_ITEM_ID: &str = "checksum";

/// Reserved item holding the encrypted repository configuration.
pub const REPOSITORY_ITEM_ID: &str = "repo";

/// Sentinel payload length, bytes. The content is random and never
/// interpreted; only its successful decode matters.
const SENTINEL_LENGTH: usize = 512;

fn is_reserved_name(item_id: &str) -> bool {
    matches!(
        item_id,
        FORMAT_ITEM_ID | CHECKSUM_ITEM_ID | REPOSITORY_ITEM_ID
    )
}

/// Secure storage for a small set of named secrets.
///
/// A vault is a plain value: three immutable-after-construction fields plus
/// the codec resolved from them. It performs no locking and no retries;
/// concurrent use is whatever the storage backend supports.
pub struct Vault {
    storage: Arc<dyn BlobStorage>,
    master_key: MasterKey,
    format: Format,
    codec: BlockCodec,
}

impl Vault {
    fn assemble(
        storage: Arc<dyn BlobStorage>,
        master_key: MasterKey,
        format: Format,
    ) -> VaultResult<Self> {
        let codec = BlockCodec::new(&format, master_key.as_bytes())?;
        Ok(Self {
            storage,
            master_key,
            format,
            codec,
        })
    }

    /// Creates a new vault on `storage` and records the repository it
    /// protects.
    ///
    /// Writes the three reserved items: the plaintext `format` descriptor
    /// (with a fresh unique id and version forced to [`FORMAT_VERSION`]),
    /// the encrypted `checksum` sentinel, and the encrypted `repo`
    /// configuration pointing at `repository_storage`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::UnsupportedBackend`] if `repository_storage`
    /// cannot export a connection descriptor,
    /// [`VaultError::UnsupportedAlgorithm`] for unknown names in `format`,
    /// and storage or serialization errors from persisting the reserved
    /// items.
    ///
    /// # Panics
    ///
    /// Panics if the system random number generator fails.
    pub fn create(
        storage: Arc<dyn BlobStorage>,
        format: &Format,
        credentials: &dyn Credentials,
        repository_storage: &dyn BlobStorage,
        repository_format: RepositoryFormat,
    ) -> VaultResult<Self> {
        let repository_connection = repository_storage
            .connection_info()
            .ok_or(VaultError::UnsupportedBackend)?;

        let mut format = format.clone();
        format.version = FORMAT_VERSION.to_owned();
        format.generate_unique_id();
        tracing::debug!(
            vault = %hex::encode(&format.unique_id[..4]),
            encryption = %format.encryption,
            checksum = %format.checksum,
            "creating vault"
        );

        let master_key = credentials.master_key(&format.unique_id);
        let vault = Self::assemble(storage, master_key, format)?;

        let format_bytes = serde_json::to_vec(&vault.format)?;
        vault.storage.put_block(FORMAT_ITEM_ID, &format_bytes)?;

        let mut sentinel = vec![0u8; SENTINEL_LENGTH];
        getrandom::getrandom(&mut sentinel).expect("getrandom failed");
        vault.put(CHECKSUM_ITEM_ID, &sentinel)?;

        vault.put_json(
            REPOSITORY_ITEM_ID,
            &RepositoryConfig {
                connection: repository_connection,
                format: repository_format,
            },
        )?;

        Ok(vault)
    }

    /// Opens an existing vault.
    ///
    /// Decoding the `checksum` sentinel is the credential check: a wrong
    /// master key surfaces as [`VaultError::Integrity`] and the vault is
    /// not opened.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::NotFound`] if the `format` item is absent,
    /// [`VaultError::Integrity`] for wrong credentials, and storage or
    /// serialization errors from reading the reserved items.
    pub fn open(storage: Arc<dyn BlobStorage>, credentials: &dyn Credentials) -> VaultResult<Self> {
        let format_bytes = storage
            .get_block(FORMAT_ITEM_ID)?
            .ok_or_else(|| VaultError::NotFound {
                id: FORMAT_ITEM_ID.to_owned(),
            })?;
        let format: Format = serde_json::from_slice(&format_bytes)?;
        tracing::debug!(
            vault = %hex::encode(&format.unique_id[..format.unique_id.len().min(4)]),
            "opening vault"
        );

        let master_key = credentials.master_key(&format.unique_id);
        let vault = Self::assemble(storage, master_key, format)?;
        vault.get(CHECKSUM_ITEM_ID)?;
        Ok(vault)
    }

    /// Opens a vault from a portable access token.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidToken`] for any malformed token
    /// (encoding, structure, or unusable key) without detailing which;
    /// storage construction and the subsequent open fail with their own
    /// errors.
    pub fn open_with_token(token_text: &str) -> VaultResult<Self> {
        let (connection, key) = token::decode(token_text)?;
        let storage = strongroom_store::open(&connection)?;
        let credentials = KeyCredentials::new(&key).map_err(|_| VaultError::InvalidToken)?;
        Self::open(storage, &credentials)
    }

    /// Exports a portable token encoding the storage location and master
    /// key.
    ///
    /// The token grants full vault access; treat it like the key it
    /// contains.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::UnsupportedBackend`] if the vault's storage
    /// cannot export a connection descriptor.
    pub fn token(&self) -> VaultResult<String> {
        let connection = self
            .storage
            .connection_info()
            .ok_or(VaultError::UnsupportedBackend)?;
        token::encode(&connection, self.master_key.as_bytes())
    }

    /// Saves `content` under `item_id`, sealed per the vault format.
    ///
    /// Overwrites silently; last writer wins.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the backend.
    pub fn put(&self, item_id: &str, content: &[u8]) -> VaultResult<()> {
        let blob = self.codec.encode(content)?;
        self.storage.put_block(item_id, &blob)?;
        Ok(())
    }

    /// Returns the contents of `item_id`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::NotFound`] if the item is absent and
    /// [`VaultError::Integrity`] if its blob fails verification.
    pub fn get(&self, item_id: &str) -> VaultResult<Vec<u8>> {
        let blob = self
            .storage
            .get_block(item_id)?
            .ok_or_else(|| VaultError::NotFound {
                id: item_id.to_owned(),
            })?;
        self.codec.decode(&blob)
    }

    /// Lists identifiers of items whose name starts with `prefix`,
    /// reserved items included.
    ///
    /// # Errors
    ///
    /// The first enumeration error aborts the listing and is returned.
    pub fn list(&self, prefix: &str) -> VaultResult<Vec<String>> {
        let mut items = Vec::new();
        for entry in self.storage.list_blocks(prefix) {
            items.push(entry?);
        }
        Ok(items)
    }

    /// Deletes `item_id`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::ProtectedItem`] for the three reserved names;
    /// otherwise delegates to the backend.
    pub fn remove(&self, item_id: &str) -> VaultResult<()> {
        if is_reserved_name(item_id) {
            return Err(VaultError::ProtectedItem {
                id: item_id.to_owned(),
            });
        }
        self.storage.delete_block(item_id)?;
        Ok(())
    }

    /// Reads `item_id` and JSON-decodes it into `T`.
    ///
    /// # Errors
    ///
    /// Propagates [`Vault::get`] errors and JSON decoding failures.
    pub fn get_json<T: DeserializeOwned>(&self, item_id: &str) -> VaultResult<T> {
        let content = self.get(item_id)?;
        Ok(serde_json::from_slice(&content)?)
    }

    /// JSON-encodes `content` and saves it under `item_id`.
    ///
    /// # Errors
    ///
    /// Propagates JSON encoding failures and [`Vault::put`] errors.
    pub fn put_json<T: Serialize>(&self, item_id: &str, content: &T) -> VaultResult<()> {
        let encoded = serde_json::to_vec(content)?;
        self.put(item_id, &encoded)
    }

    fn repository_config(&self) -> VaultResult<RepositoryConfig> {
        self.get_json(REPOSITORY_ITEM_ID)
    }

    /// Returns the format descriptor of the repository this vault protects.
    ///
    /// # Errors
    ///
    /// Propagates errors from reading the `repo` item.
    pub fn repository_format(&self) -> VaultResult<RepositoryFormat> {
        Ok(self.repository_config()?.format)
    }

    /// Opens the repository whose configuration is stored in this vault.
    ///
    /// # Errors
    ///
    /// Propagates errors from reading the `repo` item and from
    /// constructing the repository's storage backend.
    pub fn open_repository(&self) -> VaultResult<Repository> {
        let config = self.repository_config()?;
        let storage = strongroom_store::open(&config.connection)?;
        Ok(Repository::new(storage, config.format))
    }

    /// The vault's format descriptor.
    #[must_use]
    pub const fn format(&self) -> &Format {
        &self.format
    }

    /// The per-vault random identifier, also the KDF salt.
    #[must_use]
    pub fn unique_id(&self) -> &[u8] {
        &self.format.unique_id
    }
}

impl fmt::Debug for Vault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vault")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}
