//! Single-line entry point. Classifies the physical line, then hands data
//! lines to the dialect-specific parser.

use super::models::{
    DistributionDialect, DistributionEntry, DistributionLine, FormType, LineKind,
};
use super::{skypatcher, spid};
use crate::types::DistributionParseError;

#[derive(Debug, Clone)]
pub struct ParsedLine {
    pub line: DistributionLine,
    pub entries: Vec<DistributionEntry>,
    pub errors: Vec<DistributionParseError>,
}

impl ParsedLine {
    pub(crate) fn structural(line: DistributionLine) -> Self {
        Self {
            line,
            entries: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn failed(mut line: DistributionLine, error: DistributionParseError) -> Self {
        line.kind = if line.key.is_some() {
            LineKind::KeyValue
        } else {
            LineKind::Other
        };
        Self {
            line,
            entries: Vec::new(),
            errors: vec![error],
        }
    }

    /// Attach entries and derive the outfit bookkeeping on the line.
    pub(crate) fn with_entries(mut line: DistributionLine, entries: Vec<DistributionEntry>) -> Self {
        let outfit_ids: Vec<String> = entries
            .iter()
            .filter(|entry| entry.filter.form_type == FormType::Outfit)
            .map(|entry| entry.filter.form_identifier.clone())
            .collect();
        line.is_outfit_distribution = !outfit_ids.is_empty();
        line.referenced_outfit_ids = outfit_ids;
        Self {
            line,
            entries,
            errors: Vec::new(),
        }
    }
}

/// Parse one physical line. `section` is the enclosing `[Section]`, if any.
pub fn parse_line(
    dialect: DistributionDialect,
    line_number: usize,
    raw_text: &str,
    section: Option<&str>,
) -> ParsedLine {
    let mut line = DistributionLine {
        line_number,
        raw_text: raw_text.to_string(),
        kind: LineKind::Other,
        section_name: section.map(ToString::to_string),
        key: None,
        value: None,
        is_outfit_distribution: false,
        referenced_outfit_ids: Vec::new(),
    };

    let trimmed = raw_text.trim();

    if trimmed.is_empty() {
        line.kind = LineKind::Blank;
        return ParsedLine::structural(line);
    }

    if trimmed.starts_with(';') || trimmed.starts_with('#') {
        line.kind = LineKind::Comment;
        return ParsedLine::structural(line);
    }

    if let Some(name) = section_header(trimmed) {
        line.kind = LineKind::Section;
        line.section_name = Some(name.to_string());
        return ParsedLine::structural(line);
    }

    let data = strip_inline_comment(trimmed);
    let Some((key, value)) = data.split_once('=') else {
        let error = DistributionParseError::new(line_number, raw_text, "expected `key = value`");
        log::debug!("{error}");
        return ParsedLine::failed(line, error);
    };

    line.kind = LineKind::KeyValue;
    line.key = Some(key.trim().to_string());
    line.value = Some(value.trim().to_string());

    match dialect {
        DistributionDialect::Spid => spid::parse_spid_line(line, data),
        DistributionDialect::SkyPatcher => skypatcher::parse_skypatcher_line(line, data),
    }
}

pub(crate) fn section_header(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

fn strip_inline_comment(text: &str) -> &str {
    match text.find(';') {
        Some(idx) => text[..idx].trim_end(),
        None => text,
    }
}

#[cfg(test)]
#[path = "tests/line_tests.rs"]
mod tests;
