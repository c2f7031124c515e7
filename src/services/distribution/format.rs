//! Render parsed entries back to SPID text.
//!
//! SkyPatcher lines are rendered in SPID form as well; the filter model is the
//! same, and the preview pane only needs one canonical spelling. Record ids
//! are rewritten to `0xID~Plugin` because `|` is the SPID cell separator.

use super::grammar::{format_trait_filters, split_rank_suffix};
use super::models::{FilterPart, FilterSection, SpidDistributionFilter, DEFAULT_CHANCE, NONE_TOKEN};
use super::spid::SPID_CELL_COUNT;
use crate::services::records::FormKey;

pub fn format_spid_line(filter: &SpidDistributionFilter) -> String {
    let mut cells: Vec<String> = Vec::with_capacity(SPID_CELL_COUNT);
    cells.push(spid_token(&filter.form_identifier));
    cells.push(format_section(&filter.string_filters));
    cells.push(format_section(&filter.form_filters));
    cells.push(
        filter
            .level_filters
            .as_ref()
            .map(|level| level.raw.clone())
            .unwrap_or_else(|| NONE_TOKEN.to_string()),
    );
    cells.push(format_trait_filters(&filter.trait_filters));
    cells.push(
        filter
            .count_or_package_idx
            .clone()
            .unwrap_or_else(|| NONE_TOKEN.to_string()),
    );
    cells.push(filter.chance.to_string());

    // Trailing defaults are implied by the format.
    let default_chance = DEFAULT_CHANCE.to_string();
    while cells.len() > 1 {
        let last = cells.last().map(String::as_str);
        let is_default = last == Some(NONE_TOKEN)
            || (cells.len() == SPID_CELL_COUNT && last == Some(default_chance.as_str()));
        if is_default {
            cells.pop();
        } else {
            break;
        }
    }

    format!("{} = {}", filter.form_type.as_str(), cells.join("|"))
}

pub fn format_section(section: &FilterSection) -> String {
    if section.is_empty() {
        return NONE_TOKEN.to_string();
    }

    section
        .expressions
        .iter()
        .map(|expression| {
            expression
                .parts
                .iter()
                .map(format_part)
                .collect::<Vec<_>>()
                .join("+")
        })
        .chain(section.global_exclusions.iter().map(format_part))
        .collect::<Vec<_>>()
        .join(",")
}

fn format_part(part: &FilterPart) -> String {
    let sign = if part.is_negated { "-" } else { "" };
    let (name, rank) = split_rank_suffix(&part.value);
    match rank {
        Some(range) => format!("{sign}{}({range})", spid_token(name)),
        None => format!("{sign}{}", spid_token(&part.value)),
    }
}

fn spid_token(value: &str) -> String {
    FormKey::parse(value)
        .map(|key| key.to_spid_string())
        .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
