use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::SyncError;

/// Check that the output directory exists. It is never created here.
pub fn require_output_dir(dir: &Path) -> Result<(), SyncError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        _ => Err(SyncError::DirectoryMissing(dir.to_path_buf())),
    }
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, SyncError> {
        require_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let io_err = |source: io::Error| SyncError::Io {
            path: target.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(content.as_bytes()).map_err(io_err)?;
        tmp.flush().map_err(io_err)?;
        tmp.as_file_mut().sync_all().map_err(io_err)?;

        tmp.persist(&target).map_err(|e| io_err(e.error))?;
        Ok(target)
    }
}
