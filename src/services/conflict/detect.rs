use super::{detect_conflicts, ConflictDetectionResult};
use crate::services::config::ResolverSettings;
use crate::services::distribution::document::detect_dialect;
use crate::services::distribution::scanner::{discover_distribution_files, parse_files_blocking};
use crate::services::distribution::{parse_distribution_text, read_distribution_file, DistributionFile};
use crate::services::records::RecordStore;
use crate::types::errors::DistributionResult;
use std::path::Path;
use std::sync::atomic::AtomicBool;

/// Check a file already on disk against every other distribution file under
/// `data_root`.
pub fn detect_conflicts_for_path(
    candidate_path: &Path,
    data_root: &Path,
    store: &dyn RecordStore,
    settings: &ResolverSettings,
) -> DistributionResult<ConflictDetectionResult> {
    let candidate = read_distribution_file(candidate_path, data_root, settings)?;
    let existing = collect_existing_files(data_root, settings)?;
    detect_conflicts(&candidate, &existing, store, settings)
}

/// Check unsaved content that would be written to `relative_path` under
/// `data_root`.
pub fn detect_conflicts_for_text(
    relative_path: &str,
    text: &str,
    data_root: &Path,
    store: &dyn RecordStore,
    settings: &ResolverSettings,
) -> DistributionResult<ConflictDetectionResult> {
    let relative_path = relative_path.replace('\\', "/");
    let full_path = data_root.join(&relative_path);
    let dialect = detect_dialect(&full_path, text, settings);
    let candidate = parse_distribution_text(&full_path, &relative_path, dialect, text);

    let existing = collect_existing_files(data_root, settings)?;
    detect_conflicts(&candidate, &existing, store, settings)
}

/// Discover and parse every distribution file under `data_root`.
pub fn collect_existing_files(
    data_root: &Path,
    settings: &ResolverSettings,
) -> DistributionResult<Vec<DistributionFile>> {
    let paths = discover_distribution_files(data_root, settings)?;
    let cancel = AtomicBool::new(false);
    let outcome = parse_files_blocking(&paths, data_root, settings, &cancel, None);
    Ok(outcome.files)
}
