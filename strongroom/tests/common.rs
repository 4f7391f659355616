//! Common test utilities shared across integration tests.

use strongroom::{Credentials, KeyCredentials, RepositoryFormat};
use strongroom_store::{BlobStorage, BlockIter, MemoryStorage, StoreResult};

/// In-memory storage that cannot describe its own connection, exercising
/// the paths that require the capability.
pub struct AnonymousStore {
    inner: MemoryStorage,
}

impl AnonymousStore {
    /// Creates an empty anonymous store.
    pub fn new() -> Self {
        Self {
            inner: MemoryStorage::new(),
        }
    }
}

impl Default for AnonymousStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStorage for AnonymousStore {
    fn put_block(&self, id: &str, data: &[u8]) -> StoreResult<()> {
        self.inner.put_block(id, data)
    }

    fn get_block(&self, id: &str) -> StoreResult<Option<Vec<u8>>> {
        self.inner.get_block(id)
    }

    fn delete_block(&self, id: &str) -> StoreResult<()> {
        self.inner.delete_block(id)
    }

    fn list_blocks(&self, prefix: &str) -> BlockIter<'_> {
        self.inner.list_blocks(prefix)
    }
}

/// Fixed raw-key credentials used across the integration tests.
pub fn test_credentials() -> impl Credentials {
    KeyCredentials::new(&[0x42u8; 32]).expect("test key")
}

/// Repository format descriptor used across the integration tests.
pub fn test_repository_format() -> RepositoryFormat {
    RepositoryFormat {
        version: "1".to_owned(),
        object_format: "sha256-128k".to_owned(),
        max_block_size: 16 << 20,
    }
}
