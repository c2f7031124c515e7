//! Whole-file parsing: decoding, dialect detection and per-line dispatch.

use super::line::{parse_line, section_header};
use super::models::{DistributionDialect, DistributionFile, FormType};
use crate::services::config::ResolverSettings;
use crate::types::{DistributionError, DistributionResult};
use std::fs;
use std::path::Path;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Parse already-decoded text. Never fails; malformed lines land in
/// `parse_errors` and parsing continues with the next line.
pub fn parse_distribution_text(
    full_path: &Path,
    relative_path: &str,
    dialect: DistributionDialect,
    text: &str,
) -> DistributionFile {
    let file_name = full_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut lines = Vec::new();
    let mut entries = Vec::new();
    let mut parse_errors = Vec::new();
    let mut current_section: Option<String> = None;

    for (idx, raw) in text.lines().enumerate() {
        if let Some(name) = section_header(raw.trim()) {
            current_section = Some(name.to_string());
        }

        let parsed = parse_line(dialect, idx + 1, raw, current_section.as_deref());
        lines.push(parsed.line);
        entries.extend(parsed.entries);
        parse_errors.extend(parsed.errors);
    }

    let outfit_distribution_count = entries
        .iter()
        .filter(|entry| entry.filter.form_type == FormType::Outfit)
        .count();

    if !parse_errors.is_empty() {
        log::info!(
            "{}: {} malformed line(s) skipped",
            full_path.display(),
            parse_errors.len()
        );
    }

    DistributionFile {
        file_name,
        full_path: full_path.to_path_buf(),
        relative_path: relative_path.to_string(),
        dialect,
        lines,
        entries,
        parse_errors,
        outfit_distribution_count,
    }
}

/// Read, decode and parse one file. `root` is only used for `relative_path`.
pub fn read_distribution_file(
    path: &Path,
    root: &Path,
    settings: &ResolverSettings,
) -> DistributionResult<DistributionFile> {
    let bytes = fs::read(path)
        .map_err(|e| DistributionError::Io(format!("Failed to read {}: {e}", path.display())))?;
    let text = decode_distribution_bytes(&bytes);

    let dialect = detect_dialect(path, &text, settings);
    let relative_path = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/");

    Ok(parse_distribution_text(path, &relative_path, dialect, &text))
}

/// UTF-8 (BOM optional) first; legacy files saved by old editors fall back to
/// Windows-1252.
pub fn decode_distribution_bytes(bytes: &[u8]) -> String {
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    match std::str::from_utf8(content) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (cow, _encoding, _had_errors) = encoding_rs::WINDOWS_1252.decode(content);
            cow.into_owned()
        }
    }
}

/// Path first (`SkyPatcher` directory component, `_DISTR.ini` suffix), then a
/// content sniff for files dropped elsewhere.
pub fn detect_dialect(path: &Path, text: &str, settings: &ResolverSettings) -> DistributionDialect {
    let in_skypatcher_dir = path.components().any(|component| {
        component
            .as_os_str()
            .to_string_lossy()
            .eq_ignore_ascii_case(&settings.skypatcher_dir_name)
    });
    if in_skypatcher_dir {
        return DistributionDialect::SkyPatcher;
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if file_name.ends_with(&settings.spid_suffix.to_lowercase()) {
        return DistributionDialect::Spid;
    }

    let looks_like_skypatcher = text.lines().map(str::trim).any(|line| {
        let lower = line.to_ascii_lowercase();
        lower.starts_with("filterby") || lower.contains(":outfitdefault=")
    });
    if looks_like_skypatcher {
        DistributionDialect::SkyPatcher
    } else {
        DistributionDialect::Spid
    }
}

#[cfg(test)]
#[path = "tests/document_tests.rs"]
mod tests;
