use std::io;
use std::path::{Path, PathBuf};

use skan_core::naming::{extension_of, is_standard_file, output_filename, HTML_EXTENSION};
use skan_core::{convert_document, Document};
use skan_logging::{skan_debug, skan_error, skan_info, skan_warn};
use tokio::fs;
use tokio::task::{self, JoinSet};

use crate::cleanup::cleanup_stale;
use crate::decode::decode_source;
use crate::persist::{require_output_dir, AtomicFileWriter};
use crate::{ManifestStore, ProgressSink, RunReport, RunStage, SyncConfig, SyncError, SyncEvent};

/// Converts a source directory of generated HTML pages into the output
/// directory and keeps the output manifest in step with what was written.
#[derive(Debug, Clone)]
pub struct SyncEngine {
    config: SyncConfig,
}

impl SyncEngine {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Run `Init -> CleanupStale -> GenerateAndWrite -> Done` once.
    ///
    /// A missing manifest, source directory or output directory aborts the
    /// run with an error. Everything else fails a single file and is
    /// collected in the returned report.
    pub async fn run(&self, sink: &dyn ProgressSink) -> Result<RunReport, SyncError> {
        let output_dir = &self.config.output_dir;
        let mut report = RunReport::default();

        sink.emit(SyncEvent::StageChanged(RunStage::Init));
        let mut manifest = ManifestStore::load(output_dir)?;

        sink.emit(SyncEvent::StageChanged(RunStage::CleanupStale));
        cleanup_stale(output_dir, &mut manifest, &mut report, sink).await?;

        sink.emit(SyncEvent::StageChanged(RunStage::GenerateAndWrite));
        self.generate(&mut manifest, &mut report, sink).await?;

        sink.emit(SyncEvent::StageChanged(RunStage::Done));
        skan_info!(
            "Sync finished: {} removed, {} written, {} skipped, {} failed",
            report.removed.len(),
            report.written.len(),
            report.skipped.len(),
            report.failures.len()
        );
        Ok(report)
    }

    async fn generate(
        &self,
        manifest: &mut ManifestStore,
        report: &mut RunReport,
        sink: &dyn ProgressSink,
    ) -> Result<(), SyncError> {
        let source_dir = &self.config.source_dir;
        let output_dir = &self.config.output_dir;
        require_output_dir(output_dir)?;

        let mut entries = fs::read_dir(source_dir)
            .await
            .map_err(|err| SyncError::io(source_dir, err))?;
        let mut tasks = JoinSet::new();

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| SyncError::io(source_dir, err))?
        {
            let Ok(filename) = entry.file_name().into_string() else {
                skan_warn!("Ignoring non UTF-8 entry {:?} in source directory", entry.path());
                continue;
            };
            match entry.file_type().await {
                Ok(file_type) if file_type.is_file() => {}
                Ok(_) => {
                    skan_debug!("Ignoring {} which is not a regular file", filename);
                    continue;
                }
                Err(err) => {
                    report.fail(sink, filename, SyncError::io(&entry.path(), err));
                    continue;
                }
            }

            let source_dir = source_dir.clone();
            let output_dir = output_dir.clone();
            tasks.spawn(async move {
                let result = convert_file(source_dir, output_dir, filename.clone()).await;
                (filename, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (filename, result) = match joined {
                Ok(outcome) => outcome,
                Err(err) => {
                    skan_error!("Conversion task did not complete: {}", err);
                    continue;
                }
            };

            match result {
                Ok(Some(output)) => {
                    manifest.record_file(output.clone());
                    if let Err(err) = manifest.persist(output_dir) {
                        if err.is_fatal() {
                            tasks.abort_all();
                            return Err(err);
                        }
                        report.fail(sink, filename, err);
                        continue;
                    }
                    sink.emit(SyncEvent::FileWritten {
                        source: filename,
                        output: output.clone(),
                    });
                    report.written.push(output);
                }
                Ok(None) => {
                    sink.emit(SyncEvent::FileSkipped {
                        filename: filename.clone(),
                    });
                    report.skipped.push(filename);
                }
                Err(err @ SyncError::DirectoryMissing(_)) => {
                    tasks.abort_all();
                    return Err(err);
                }
                Err(err) => report.fail(sink, filename, err),
            }
        }
        Ok(())
    }
}

/// Read, convert and write one source page. Returns the output name, or
/// `None` for entries that are not HTML pages.
async fn convert_file(
    source_dir: PathBuf,
    output_dir: PathBuf,
    filename: String,
) -> Result<Option<String>, SyncError> {
    if extension_of(&filename) != HTML_EXTENSION {
        return Ok(None);
    }

    let path = source_dir.join(&filename);
    let bytes = fs::read(&path)
        .await
        .map_err(|err| SyncError::io(&path, err))?;
    let content = decode_source(&bytes).map_err(|err| SyncError::Io {
        path: path.clone(),
        source: io::Error::new(io::ErrorKind::InvalidData, err),
    })?;

    let document = Document::new(filename, content, source_dir);
    let converted = convert_document(&document)?;
    write_output(&output_dir, &document.filename, converted)
        .await
        .map(Some)
}

/// Write converted content for `filename` into `output_dir` under its remapped name.
///
/// The directory must already exist, and a remapped name that is a standard
/// file is refused. Returns the name that was written.
pub async fn write_output(
    output_dir: &Path,
    filename: &str,
    content: String,
) -> Result<String, SyncError> {
    match fs::metadata(output_dir).await {
        Ok(meta) if meta.is_dir() => {}
        _ => return Err(SyncError::DirectoryMissing(output_dir.to_path_buf())),
    }

    let output_name = output_filename(filename);
    if is_standard_file(&output_name) {
        return Err(SyncError::ProtectedFile(output_name));
    }

    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    let name = output_name.clone();
    task::spawn_blocking(move || writer.write(&name, &content))
        .await
        .map_err(|err| SyncError::Io {
            path: output_dir.join(&output_name),
            source: io::Error::other(err),
        })??;
    Ok(output_name)
}
