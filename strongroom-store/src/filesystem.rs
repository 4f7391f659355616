//! Directory-backed block store.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::connection::ConnectionInfo;
use crate::error::{StoreError, StoreResult};
use crate::{BlobStorage, BlockIter};

/// Block store keeping each block as a regular file under a root directory.
///
/// Writes go through a hidden temporary file followed by a rename, so a
/// crashed writer never leaves a partially written block behind. Block
/// identifiers map directly to file names and are restricted to ASCII
/// alphanumerics plus `-`, `_` and non-leading `.`.
#[derive(Debug)]
pub struct FilesystemStorage {
    root: PathBuf,
}

impl FilesystemStorage {
    /// Opens a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::io(&root, source))?;
        tracing::debug!(root = %root.display(), "opened filesystem block store");
        Ok(Self { root })
    }

    fn block_path(&self, id: &str) -> StoreResult<PathBuf> {
        if valid_block_id(id) {
            Ok(self.root.join(id))
        } else {
            Err(StoreError::InvalidId { id: id.to_owned() })
        }
    }
}

fn valid_block_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl BlobStorage for FilesystemStorage {
    fn put_block(&self, id: &str, data: &[u8]) -> StoreResult<()> {
        let path = self.block_path(id)?;
        let staging = self.root.join(format!(".w-{id}"));
        fs::write(&staging, data).map_err(|source| StoreError::io(&staging, source))?;
        fs::rename(&staging, &path).map_err(|source| StoreError::io(&path, source))?;
        Ok(())
    }

    fn get_block(&self, id: &str) -> StoreResult<Option<Vec<u8>>> {
        let path = self.block_path(id)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::io(&path, source)),
        }
    }

    fn delete_block(&self, id: &str) -> StoreResult<()> {
        let path = self.block_path(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::io(&path, source)),
        }
    }

    fn list_blocks(&self, prefix: &str) -> BlockIter<'_> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(source) => {
                let failure = StoreError::io(&self.root, source);
                return Box::new(std::iter::once(Err(failure)));
            }
        };

        let mut ids = Vec::new();
        let mut failure = None;
        for entry in entries {
            match entry {
                Ok(entry) => {
                    if let Some(name) = entry.file_name().to_str() {
                        if name.starts_with(prefix) && valid_block_id(name) {
                            ids.push(name.to_owned());
                        }
                    }
                }
                Err(source) => {
                    failure = Some(StoreError::io(&self.root, source));
                    break;
                }
            }
        }
        ids.sort_unstable();

        Box::new(ids.into_iter().map(Ok).chain(failure.into_iter().map(Err)))
    }

    fn connection_info(&self) -> Option<ConnectionInfo> {
        Some(ConnectionInfo::Filesystem {
            path: self.root.clone(),
        })
    }
}
