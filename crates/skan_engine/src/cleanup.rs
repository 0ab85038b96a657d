use std::collections::HashSet;
use std::path::Path;

use skan_core::naming::is_standard_file;
use skan_logging::{skan_debug, skan_warn};
use tokio::fs;

use crate::{ManifestStore, ProgressSink, RunReport, SyncError, SyncEvent};

/// Delete generated files left over from the previous run.
///
/// Only regular files listed in `manifest` are candidates, and standard files
/// are never touched; anything the manifest does not list is left alone.
/// Afterwards the manifest keeps just the entries still present in
/// `output_dir` and is persisted.
pub async fn cleanup_stale(
    output_dir: &Path,
    manifest: &mut ManifestStore,
    report: &mut RunReport,
    sink: &dyn ProgressSink,
) -> Result<(), SyncError> {
    let mut entries = fs::read_dir(output_dir)
        .await
        .map_err(|err| SyncError::io(output_dir, err))?;
    let mut remaining = HashSet::new();

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|err| SyncError::io(output_dir, err))?
    {
        let Ok(name) = entry.file_name().into_string() else {
            skan_warn!("Ignoring non UTF-8 entry {:?} in output directory", entry.path());
            continue;
        };

        if !manifest.contains(&name) || is_standard_file(&name) {
            remaining.insert(name);
            continue;
        }

        let is_file = match entry.file_type().await {
            Ok(file_type) => file_type.is_file(),
            Err(err) => {
                report.fail(sink, name.clone(), SyncError::io(&entry.path(), err));
                remaining.insert(name);
                continue;
            }
        };
        if !is_file {
            skan_debug!("Keeping manifest entry {} which is not a regular file", name);
            remaining.insert(name);
            continue;
        }

        match fs::remove_file(entry.path()).await {
            Ok(()) => {
                sink.emit(SyncEvent::FileRemoved {
                    filename: name.clone(),
                });
                report.removed.push(name);
            }
            Err(err) => {
                report.fail(sink, name.clone(), SyncError::io(&entry.path(), err));
                remaining.insert(name);
            }
        }
    }

    manifest.retain(|name| remaining.contains(name));
    manifest.persist(output_dir)?;
    Ok(())
}
