//! SkyPatcher NPC lines: `:`-joined `key=value` clauses.
//!
//! Each filter key contributes either an OR-list (`...Or`, lists of NPCs,
//! races, classes, outfits), one AND-term per item (plain faction, keyword and
//! editor-id keys) or global exclusions (`...Excluded`). Keys are AND-ed
//! together, so the collected lists are expanded into disjunctive normal form
//! to fit [`FilterSection`].

use super::grammar::{is_none_cell, parse_chance, parse_level_filters};
use super::line::ParsedLine;
use super::models::{
    DistributionEntry, DistributionLine, FilterExpression, FilterPart, FilterSection, FormType,
    SpidDistributionFilter, TraitFilters,
};
use crate::types::DistributionParseError;

/// Upper bound on DNF expansion; larger products are reported as malformed.
const MAX_EXPANDED_EXPRESSIONS: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Form,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combine {
    /// Any item may match.
    Or,
    /// Every item must match.
    And,
    /// No item may match.
    Exclude,
}

/// Collected conjunction of OR-lists for one filter section.
#[derive(Debug, Default)]
struct SectionBuilder {
    conjuncts: Vec<Vec<FilterPart>>,
    exclusions: Vec<FilterPart>,
}

impl SectionBuilder {
    fn add(&mut self, combine: Combine, items: Vec<FilterPart>) {
        match combine {
            Combine::Or => self.conjuncts.push(items),
            Combine::And => self.conjuncts.extend(items.into_iter().map(|item| vec![item])),
            Combine::Exclude => self.exclusions.extend(items.into_iter().map(|mut item| {
                item.is_negated = true;
                item
            })),
        }
    }

    fn build(self) -> Result<FilterSection, String> {
        let mut expressions: Vec<Vec<FilterPart>> = if self.conjuncts.is_empty() {
            Vec::new()
        } else {
            vec![Vec::new()]
        };

        for or_list in &self.conjuncts {
            let mut next = Vec::with_capacity(expressions.len() * or_list.len());
            for prefix in &expressions {
                for item in or_list {
                    let mut parts = prefix.clone();
                    parts.push(item.clone());
                    next.push(parts);
                }
            }
            if next.len() > MAX_EXPANDED_EXPRESSIONS {
                return Err(format!(
                    "filter combination expands past {MAX_EXPANDED_EXPRESSIONS} expressions"
                ));
            }
            expressions = next;
        }

        Ok(FilterSection {
            expressions: expressions
                .into_iter()
                .map(|parts| FilterExpression { parts })
                .collect(),
            global_exclusions: self.exclusions,
        })
    }
}

#[derive(Debug, Default)]
struct LineState {
    form: SectionBuilder,
    strings: SectionBuilder,
    traits: TraitFilters,
    level_min: Option<String>,
    level_max: Option<String>,
    chance: Option<u8>,
    distributions: Vec<(FormType, String)>,
}

fn filter_key(key: &str) -> Option<(Slot, Combine)> {
    let mapping = match key {
        "filterbynpcs" | "filterbynpcsor" => (Slot::Form, Combine::Or),
        "filterbynpcsexcluded" => (Slot::Form, Combine::Exclude),
        "filterbyfactions" => (Slot::Form, Combine::And),
        "filterbyfactionsor" => (Slot::Form, Combine::Or),
        "filterbyfactionsexcluded" => (Slot::Form, Combine::Exclude),
        "filterbykeywords" => (Slot::Form, Combine::And),
        "filterbykeywordsor" => (Slot::Form, Combine::Or),
        "filterbykeywordsexcluded" => (Slot::Form, Combine::Exclude),
        "filterbyraces" | "filterbyracesor" => (Slot::Form, Combine::Or),
        "filterbyracesexcluded" => (Slot::Form, Combine::Exclude),
        "filterbyclasses" | "filterbyclassesor" => (Slot::Form, Combine::Or),
        "filterbyclassesexcluded" => (Slot::Form, Combine::Exclude),
        "filterbyoutfits" | "filterbyoutfitsor" => (Slot::Form, Combine::Or),
        "filterbyoutfitsexcluded" => (Slot::Form, Combine::Exclude),
        "filterbyeditoridcontains" => (Slot::String, Combine::And),
        "filterbyeditoridcontainsor" => (Slot::String, Combine::Or),
        "filterbyeditoridcontainsexcluded" => (Slot::String, Combine::Exclude),
        _ => return None,
    };
    Some(mapping)
}

fn distribution_key(key: &str) -> Option<FormType> {
    let form_type = match key {
        "outfitdefault" => FormType::Outfit,
        "outfitsleep" => FormType::SleepOutfit,
        "keywordstoadd" => FormType::Keyword,
        "spellstoadd" => FormType::Spell,
        "perkstoadd" => FormType::Perk,
        _ => return None,
    };
    Some(form_type)
}

fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

pub(crate) fn parse_skypatcher_line(line: DistributionLine, data: &str) -> ParsedLine {
    match parse_clauses(data) {
        Ok(state) if state.distributions.is_empty() => {
            log::debug!(
                "line {}: SkyPatcher line without a distribution key",
                line.line_number
            );
            ParsedLine::structural(line)
        }
        Ok(state) => match build_entries(line.line_number, data, state) {
            Ok(entries) => ParsedLine::with_entries(line, entries),
            Err(reason) => fail(line, reason),
        },
        Err(reason) => fail(line, reason),
    }
}

fn fail(line: DistributionLine, reason: String) -> ParsedLine {
    let error = DistributionParseError::new(line.line_number, &line.raw_text, reason);
    log::debug!("{error}");
    ParsedLine::failed(line, error)
}

fn parse_clauses(data: &str) -> Result<LineState, String> {
    let mut state = LineState::default();

    for clause in data.split(':').map(str::trim).filter(|c| !c.is_empty()) {
        let Some((raw_key, value)) = clause.split_once('=') else {
            return Err(format!("clause \"{clause}\" is missing '='"));
        };
        let key = raw_key.trim().to_ascii_lowercase();
        let value = value.trim();

        if let Some((slot, combine)) = filter_key(&key) {
            let items: Vec<FilterPart> = split_list(value)
                .into_iter()
                .map(|item| match slot {
                    Slot::Form => FilterPart::new(item, false),
                    Slot::String => FilterPart::editor_id_contains(item),
                })
                .collect();
            if items.is_empty() {
                return Err(format!("`{raw_key}` has no values"));
            }
            let builder = match slot {
                Slot::Form => &mut state.form,
                Slot::String => &mut state.strings,
            };
            builder.add(combine, items);
            continue;
        }

        if let Some(form_type) = distribution_key(&key) {
            let targets = split_list(value);
            if targets.is_empty() {
                return Err(format!("`{raw_key}` has no target"));
            }
            state
                .distributions
                .extend(targets.into_iter().map(|t| (form_type, t.to_string())));
            continue;
        }

        match key.as_str() {
            "filterbygender" => {
                state.traits.is_female = match value.to_ascii_lowercase().as_str() {
                    "female" => Some(true),
                    "male" => Some(false),
                    other => return Err(format!("unknown gender \"{other}\"")),
                };
            }
            "filterbylevelmin" => state.level_min = Some(value.to_string()),
            "filterbylevelmax" => state.level_max = Some(value.to_string()),
            "chance" => state.chance = Some(parse_chance(value)),
            _ => log::debug!("ignoring SkyPatcher key `{raw_key}`"),
        }
    }

    Ok(state)
}

fn build_entries(
    line_number: usize,
    data: &str,
    state: LineState,
) -> Result<Vec<DistributionEntry>, String> {
    let form_filters = state.form.build()?;
    let string_filters = state.strings.build()?;

    let level_cell = match (&state.level_min, &state.level_max) {
        (None, None) => String::new(),
        (min, max) => format!(
            "{}/{}",
            min.as_deref().unwrap_or(""),
            max.as_deref().unwrap_or("")
        ),
    };
    let level_filters = parse_level_filters(&level_cell)?;

    let entries = state
        .distributions
        .into_iter()
        .filter(|(_, target)| !is_none_cell(target))
        .map(|(form_type, target)| {
            let mut filter = SpidDistributionFilter::new(form_type, target);
            filter.string_filters = string_filters.clone();
            filter.form_filters = form_filters.clone();
            filter.level_filters = level_filters.clone();
            filter.trait_filters = state.traits;
            filter.chance = state.chance.unwrap_or(filter.chance);
            filter.raw_line = data.to_string();
            DistributionEntry {
                line_number,
                filter,
            }
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
#[path = "tests/skypatcher_tests.rs"]
mod tests;
