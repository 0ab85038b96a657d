//! Skan engine: directory sync, manifest persistence and per-file conversion IO.
mod cleanup;
mod config;
mod decode;
mod engine;
mod error;
mod manifest;
mod persist;
mod types;

pub use cleanup::cleanup_stale;
pub use config::SyncConfig;
pub use decode::{decode_source, DecodeError};
pub use engine::{write_output, SyncEngine};
pub use error::SyncError;
pub use manifest::ManifestStore;
pub use persist::{require_output_dir, AtomicFileWriter};
pub use types::{FileFailure, LogSink, ProgressSink, RunReport, RunStage, SyncEvent};
