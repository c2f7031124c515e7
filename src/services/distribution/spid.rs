//! SPID positional lines:
//! `FormType = FormOrEditorID|StringFilters|FormFilters|LevelFilters|Traits|CountOrPackageIdx|Chance`

use super::grammar::{
    is_none_cell, parse_chance, parse_filter_section, parse_level_filters, parse_trait_filters,
};
use super::line::ParsedLine;
use super::models::{DistributionEntry, DistributionLine, FormType, SpidDistributionFilter};
use crate::types::DistributionParseError;

pub const SPID_CELL_COUNT: usize = 7;

pub(crate) fn parse_spid_line(line: DistributionLine, data: &str) -> ParsedLine {
    let key = line.key.clone().unwrap_or_default();
    let value = line.value.clone().unwrap_or_default();

    let Some(form_type) = FormType::parse(&key) else {
        log::debug!(
            "line {}: `{key}` is not a distributable form type, kept as plain key/value",
            line.line_number
        );
        return ParsedLine::structural(line);
    };

    match parse_cells(form_type, &value, data) {
        Ok(filter) => {
            let entry = DistributionEntry {
                line_number: line.line_number,
                filter,
            };
            ParsedLine::with_entries(line, vec![entry])
        }
        Err(reason) => {
            let error = DistributionParseError::new(line.line_number, &line.raw_text, reason);
            log::debug!("{error}");
            ParsedLine::failed(line, error)
        }
    }
}

fn parse_cells(
    form_type: FormType,
    value: &str,
    data: &str,
) -> Result<SpidDistributionFilter, String> {
    let cells: Vec<&str> = value.split('|').map(str::trim).collect();
    if cells.len() > SPID_CELL_COUNT {
        return Err(format!(
            "expected at most {SPID_CELL_COUNT} cells, found {}",
            cells.len()
        ));
    }

    let cell = |idx: usize| cells.get(idx).copied().unwrap_or("");

    let identifier = cell(0);
    if is_none_cell(identifier) {
        return Err("missing form or editor id".to_string());
    }

    let mut filter = SpidDistributionFilter::new(form_type, identifier);
    filter.string_filters =
        parse_filter_section(cell(1)).map_err(|reason| format!("string filters: {reason}"))?;
    filter.form_filters =
        parse_filter_section(cell(2)).map_err(|reason| format!("form filters: {reason}"))?;
    filter.level_filters =
        parse_level_filters(cell(3)).map_err(|reason| format!("level filters: {reason}"))?;
    filter.trait_filters =
        parse_trait_filters(cell(4)).map_err(|reason| format!("trait filters: {reason}"))?;
    filter.count_or_package_idx = (!is_none_cell(cell(5))).then(|| cell(5).to_string());
    filter.chance = parse_chance(cell(6));
    filter.raw_line = data.to_string();

    Ok(filter)
}

#[cfg(test)]
#[path = "tests/spid_tests.rs"]
mod tests;
