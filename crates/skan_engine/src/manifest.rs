use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use skan_core::naming::MANIFEST_FILENAME;
use skan_logging::{skan_debug, skan_info, skan_warn};

use crate::persist::AtomicFileWriter;
use crate::SyncError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedManifest {
    files: Vec<String>,
}

/// In-memory record of the generated files in an output directory.
///
/// Names are kept in insertion order and never repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestStore {
    files: Vec<String>,
}

impl ManifestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path_in(output_dir: &Path) -> PathBuf {
        output_dir.join(MANIFEST_FILENAME)
    }

    /// Read `manifest.json` from `output_dir`. A missing file is [`SyncError::NotFound`].
    pub fn load(output_dir: &Path) -> Result<Self, SyncError> {
        let path = Self::path_in(output_dir);
        let content = fs::read_to_string(&path).map_err(|err| SyncError::io(&path, err))?;
        let persisted: PersistedManifest =
            serde_json::from_str(&content).map_err(|source| SyncError::InvalidManifest {
                path: path.clone(),
                source,
            })?;

        let mut store = Self::new();
        let total = persisted.files.len();
        for name in persisted.files {
            store.record_file(name);
        }
        if store.len() != total {
            skan_warn!(
                "Dropped {} duplicate entries from manifest {:?}",
                total - store.len(),
                path
            );
        }
        skan_info!("Loaded manifest {:?} with {} files", path, store.len());
        Ok(store)
    }

    /// Load the manifest, first writing an empty one if `output_dir` has none.
    pub fn initialize(output_dir: &Path) -> Result<Self, SyncError> {
        let path = Self::path_in(output_dir);
        match fs::metadata(&path) {
            Ok(_) => Self::load(output_dir),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let store = Self::new();
                store.persist(output_dir)?;
                skan_info!("Created empty manifest {:?}", path);
                Ok(store)
            }
            Err(err) => Err(SyncError::io(&path, err)),
        }
    }

    /// Append `name` unless it is already recorded. Returns whether it was added.
    pub fn record_file(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            skan_debug!("Manifest already lists {}", name);
            return false;
        }
        self.files.push(name);
        true
    }

    /// Overwrite `manifest.json` in `output_dir` with the current file list.
    pub fn persist(&self, output_dir: &Path) -> Result<PathBuf, SyncError> {
        let persisted = PersistedManifest {
            files: self.files.clone(),
        };
        let content = serde_json::to_string(&persisted).map_err(|source| {
            SyncError::InvalidManifest {
                path: Self::path_in(output_dir),
                source,
            }
        })?;
        let writer = AtomicFileWriter::new(output_dir.to_path_buf());
        let path = writer.write(MANIFEST_FILENAME, &content)?;
        skan_debug!("Persisted manifest {:?} with {} files", path, self.files.len());
        Ok(path)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|f| f == name)
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn retain(&mut self, keep: impl FnMut(&String) -> bool) {
        self.files.retain(keep);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
