//! Repository configuration protected by the vault.
//!
//! The vault guards the credentials and location of exactly one
//! repository. The `repo` reserved item stores a [`RepositoryConfig`];
//! opening it yields a [`Repository`] handle bound to a live storage
//! backend.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use strongroom_store::{BlobStorage, ConnectionInfo};

/// Content-addressing parameters of the protected repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryFormat {
    /// Repository layout version.
    pub version: String,

    /// Object hashing and splitting scheme.
    #[serde(rename = "objectFormat")]
    pub object_format: String,

    /// Upper bound on a single stored block, bytes.
    #[serde(rename = "maxBlockSize")]
    pub max_block_size: u32,
}

/// What the vault remembers about its repository: where it lives and how
/// its objects are formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Connection descriptor for the repository's storage backend.
    pub connection: ConnectionInfo,

    /// Content-addressing parameters.
    pub format: RepositoryFormat,
}

/// An opened repository: live storage plus its format descriptor.
pub struct Repository {
    storage: Arc<dyn BlobStorage>,
    format: RepositoryFormat,
}

impl Repository {
    pub(crate) fn new(storage: Arc<dyn BlobStorage>, format: RepositoryFormat) -> Self {
        Self { storage, format }
    }

    /// The repository's content-addressing parameters.
    #[must_use]
    pub const fn format(&self) -> &RepositoryFormat {
        &self.format
    }

    /// The repository's storage backend.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn BlobStorage> {
        &self.storage
    }
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}
