//! Serializable descriptors of where a block store lives.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::filesystem::FilesystemStorage;
use crate::memory::MemoryStorage;
use crate::BlobStorage;

/// Description of a block store location, sufficient to reconstruct a
/// backend handle with [`open`].
///
/// The serialized form is a tagged JSON object, e.g.
/// `{"type":"filesystem","path":"/var/lib/vault"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConnectionInfo {
    /// In-memory store. A handle opened from this descriptor starts empty;
    /// memory contents are not shared between handles.
    Memory,

    /// Directory-backed store.
    Filesystem {
        /// Root directory holding one file per block.
        path: PathBuf,
    },
}

/// Constructs a live backend from its connection descriptor.
///
/// # Errors
///
/// Returns an error if the described backend cannot be initialized (for the
/// filesystem backend, if the root directory cannot be created).
pub fn open(info: &ConnectionInfo) -> StoreResult<Arc<dyn BlobStorage>> {
    match info {
        ConnectionInfo::Memory => {
            tracing::debug!("opening in-memory block store");
            Ok(Arc::new(MemoryStorage::new()))
        }
        ConnectionInfo::Filesystem { path } => {
            Ok(Arc::new(FilesystemStorage::open(path.clone())?))
        }
    }
}
