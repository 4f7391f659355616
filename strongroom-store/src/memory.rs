//! Map-backed block store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::connection::ConnectionInfo;
use crate::error::StoreResult;
use crate::{BlobStorage, BlockIter};

/// Thread-safe in-memory block store.
///
/// Listing order is deterministic (lexicographic). Used primarily by tests
/// and as the reference implementation of the [`BlobStorage`] contract.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blocks: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStorage for MemoryStorage {
    fn put_block(&self, id: &str, data: &[u8]) -> StoreResult<()> {
        self.blocks
            .write()
            .unwrap()
            .insert(id.to_owned(), data.to_vec());
        Ok(())
    }

    fn get_block(&self, id: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.blocks.read().unwrap().get(id).cloned())
    }

    fn delete_block(&self, id: &str) -> StoreResult<()> {
        self.blocks.write().unwrap().remove(id);
        Ok(())
    }

    fn list_blocks(&self, prefix: &str) -> BlockIter<'_> {
        let ids: Vec<String> = self
            .blocks
            .read()
            .unwrap()
            .keys()
            .filter(|id| id.starts_with(prefix))
            .cloned()
            .collect();
        Box::new(ids.into_iter().map(Ok))
    }

    fn connection_info(&self) -> Option<ConnectionInfo> {
        Some(ConnectionInfo::Memory)
    }
}
