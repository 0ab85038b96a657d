use std::io;
use std::path::{Path, PathBuf};

use skan_core::MalformedInputError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("not found: {0}")]
    NotFound(PathBuf),
    #[error("output directory does not exist: {0}")]
    DirectoryMissing(PathBuf),
    #[error("cannot override standard file {0}")]
    ProtectedFile(String),
    #[error(transparent)]
    MalformedInput(#[from] MalformedInputError),
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid manifest {path}: {source}")]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SyncError {
    /// Map an IO error on `path`, turning a missing path into [`SyncError::NotFound`].
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            SyncError::NotFound(path.to_path_buf())
        } else {
            SyncError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Whether this error aborts the whole run rather than a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SyncError::NotFound(_)
                | SyncError::DirectoryMissing(_)
                | SyncError::InvalidManifest { .. }
        )
    }
}
