use std::fmt;

use skan_logging::{skan_debug, skan_error, skan_info};

use crate::SyncError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Init,
    CleanupStale,
    GenerateAndWrite,
    Done,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStage::Init => write!(f, "init"),
            RunStage::CleanupStale => write!(f, "cleanup"),
            RunStage::GenerateAndWrite => write!(f, "generate"),
            RunStage::Done => write!(f, "done"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    StageChanged(RunStage),
    /// A stale generated file was deleted from the output directory.
    FileRemoved { filename: String },
    /// `source` was converted and written to the output directory as `output`.
    FileWritten { source: String, output: String },
    /// A source entry that is not an HTML page.
    FileSkipped { filename: String },
    FileFailed { filename: String, message: String },
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: SyncEvent);
}

/// Forwards every event to the logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&self, event: SyncEvent) {
        match event {
            SyncEvent::StageChanged(stage) => skan_info!("Stage: {}", stage),
            SyncEvent::FileRemoved { filename } => skan_info!("Removed stale file {}", filename),
            SyncEvent::FileWritten { source, output } => {
                skan_info!("Wrote {} -> {}", source, output)
            }
            SyncEvent::FileSkipped { filename } => skan_debug!("Skipped {}", filename),
            SyncEvent::FileFailed { filename, message } => {
                skan_error!("Failed {}: {}", filename, message)
            }
        }
    }
}

#[derive(Debug)]
pub struct FileFailure {
    pub filename: String,
    pub error: SyncError,
}

/// Outcome of one sync run. Fatal errors are returned instead of a report.
#[derive(Debug, Default)]
pub struct RunReport {
    pub removed: Vec<String>,
    pub written: Vec<String>,
    pub skipped: Vec<String>,
    pub failures: Vec<FileFailure>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn fail(&mut self, sink: &dyn ProgressSink, filename: String, error: SyncError) {
        sink.emit(SyncEvent::FileFailed {
            filename: filename.clone(),
            message: error.to_string(),
        });
        self.failures.push(FileFailure { filename, error });
    }
}
