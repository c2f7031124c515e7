//! Discovery and background parsing of distribution files under a data root.
//!
//! Files are parsed in parallel on the blocking pool. Cancellation is checked
//! between files; a cancelled scan returns no files at all so callers never
//! resolve against a partial set.

use super::document::read_distribution_file;
use super::models::DistributionFile;
use crate::services::config::ResolverSettings;
use crate::types::{DistributionError, DistributionResult};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use walkdir::WalkDir;

/// SkyPatcher keeps NPC patches in this subdirectory of its config folder.
const SKYPATCHER_NPC_DIR: &str = "npc";

/// Progress events for the caller's progress display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "event", content = "data")]
pub enum ScanEvent {
    #[serde(rename_all = "camelCase")]
    Started { total_files: usize },
    #[serde(rename_all = "camelCase")]
    Parsed { current: usize, file_name: String },
    #[serde(rename_all = "camelCase")]
    Finished { files: usize, parse_errors: usize },
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanStatus {
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub status: ScanStatus,
    pub files: Vec<DistributionFile>,
}

impl ScanOutcome {
    fn cancelled() -> Self {
        Self {
            status: ScanStatus::Cancelled,
            files: Vec::new(),
        }
    }
}

fn is_cancelled(cancel_flag: &AtomicBool) -> bool {
    cancel_flag.load(Ordering::Relaxed)
}

fn emit(progress: Option<&Sender<ScanEvent>>, event: ScanEvent) {
    if let Some(sender) = progress {
        // A dropped receiver only means nobody is listening any more.
        let _ = sender.send(event);
    }
}

/// List SPID (`*_DISTR.ini`) and SkyPatcher NPC (`SkyPatcher/npc/**/*.ini`)
/// files under `root`, sorted by lower-cased path.
pub fn discover_distribution_files(
    root: &Path,
    settings: &ResolverSettings,
) -> DistributionResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(DistributionError::Io(format!(
            "Data path is not a directory: {}",
            root.display()
        )));
    }

    let spid_suffix = settings.spid_suffix.to_lowercase();
    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(settings.max_scan_depth)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            if !name.ends_with(".ini") {
                return false;
            }
            name.ends_with(&spid_suffix) || is_skypatcher_npc_path(root, path, settings)
        })
        .collect();

    found.sort_by_key(|path| path.to_string_lossy().to_lowercase());
    Ok(found)
}

fn is_skypatcher_npc_path(root: &Path, path: &Path, settings: &ResolverSettings) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let dirs: Vec<String> = relative
        .parent()
        .map(|parent| {
            parent
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_lowercase())
                .collect()
        })
        .unwrap_or_default();

    let sky_dir = settings.skypatcher_dir_name.to_lowercase();
    dirs.windows(2)
        .any(|pair| pair[0] == sky_dir && pair[1] == SKYPATCHER_NPC_DIR)
}

/// Parse already-discovered files. Unreadable files are logged and skipped.
pub fn parse_files_blocking(
    paths: &[PathBuf],
    root: &Path,
    settings: &ResolverSettings,
    cancel_flag: &AtomicBool,
    progress: Option<&Sender<ScanEvent>>,
) -> ScanOutcome {
    emit(
        progress,
        ScanEvent::Started {
            total_files: paths.len(),
        },
    );

    let parsed_count = AtomicUsize::new(0);
    let results: Vec<Option<DistributionFile>> = paths
        .par_iter()
        .map(|path| {
            if is_cancelled(cancel_flag) {
                return None;
            }
            match read_distribution_file(path, root, settings) {
                Ok(file) => {
                    let current = parsed_count.fetch_add(1, Ordering::Relaxed) + 1;
                    emit(
                        progress,
                        ScanEvent::Parsed {
                            current,
                            file_name: file.file_name.clone(),
                        },
                    );
                    Some(file)
                }
                Err(e) => {
                    log::warn!("Skipping distribution file {}: {e}", path.display());
                    None
                }
            }
        })
        .collect();

    if is_cancelled(cancel_flag) {
        log::info!("Distribution scan cancelled; discarding partial results");
        emit(progress, ScanEvent::Cancelled);
        return ScanOutcome::cancelled();
    }

    let files: Vec<DistributionFile> = results.into_iter().flatten().collect();
    let parse_errors = files.iter().map(|file| file.parse_errors.len()).sum();
    emit(
        progress,
        ScanEvent::Finished {
            files: files.len(),
            parse_errors,
        },
    );

    ScanOutcome {
        status: ScanStatus::Completed,
        files,
    }
}

/// Discover and parse on the blocking pool.
pub async fn scan_distribution_files(
    root: PathBuf,
    settings: ResolverSettings,
    cancel_flag: Arc<AtomicBool>,
    progress: Option<Sender<ScanEvent>>,
) -> DistributionResult<ScanOutcome> {
    tokio::task::spawn_blocking(move || {
        let paths = discover_distribution_files(&root, &settings)?;
        if is_cancelled(&cancel_flag) {
            emit(progress.as_ref(), ScanEvent::Cancelled);
            return Ok(ScanOutcome::cancelled());
        }
        Ok(parse_files_blocking(
            &paths,
            &root,
            &settings,
            &cancel_flag,
            progress.as_ref(),
        ))
    })
    .await
    .map_err(|error| DistributionError::Internal(format!("Scan worker failed: {error}")))?
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod tests;
