//! Block storage backends for Strongroom.
//!
//! A vault sees its storage as a flat namespace of named binary blocks with
//! overwrite-on-put semantics. This crate defines that contract
//! ([`BlobStorage`]) and ships two backends:
//!
//! * [`MemoryStorage`]: map-backed, primarily for tests;
//! * [`FilesystemStorage`]: one file per block under a root directory,
//!   written atomically.
//!
//! Backends that can describe their own location implement the optional
//! [`BlobStorage::connection_info`] capability; the resulting
//! [`ConnectionInfo`] is serializable and can be turned back into a live
//! backend with [`open`].

mod connection;
mod error;
mod filesystem;
mod memory;

pub use connection::{open, ConnectionInfo};
pub use error::{StoreError, StoreResult};
pub use filesystem::FilesystemStorage;
pub use memory::MemoryStorage;

/// Iterator over block identifiers produced by a listing.
///
/// Enumeration failures are yielded in-band; the first `Err` ends the
/// sequence.
pub type BlockIter<'a> = Box<dyn Iterator<Item = StoreResult<String>> + Send + 'a>;

/// Flat namespace of named binary blocks.
///
/// Implementations must be safe for concurrent use; the vault layer performs
/// no locking of its own. Retry policy for transient failures is the
/// backend's concern.
pub trait BlobStorage: Send + Sync {
    /// Writes `data` under `id`, replacing any existing block.
    ///
    /// # Errors
    ///
    /// Returns an error if the block cannot be persisted.
    fn put_block(&self, id: &str, data: &[u8]) -> StoreResult<()>;

    /// Reads the block named `id`, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails; absence is not an error.
    fn get_block(&self, id: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Deletes the block named `id`. Deleting an absent block is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn delete_block(&self, id: &str) -> StoreResult<()>;

    /// Enumerates identifiers of blocks whose name starts with `prefix`,
    /// in lexicographic order.
    fn list_blocks(&self, prefix: &str) -> BlockIter<'_>;

    /// Descriptor from which an equivalent backend can be reconstructed,
    /// if this backend supports that.
    fn connection_info(&self) -> Option<ConnectionInfo> {
        None
    }
}
