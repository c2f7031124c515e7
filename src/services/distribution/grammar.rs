//! Filter-cell grammar shared by both dialects.
//!
//! ```text
//! section := group (',' group)*
//! group   := part ('+' part)*
//! part    := '-'? token
//! ```
//!
//! A group holding exactly one negated part is a global exclusion: it is
//! applied as AND-NOT after every OR/AND expression has been evaluated.
//! Tokens are never validated here; unknown names surface later as
//! unresolved references. Only structural faults return `Err(reason)`.

use super::models::{
    FilterExpression, FilterPart, FilterSection, LevelConstraint, LevelFilters, LevelTarget,
    RangeFilter, TraitFilters, DEFAULT_CHANCE, NONE_TOKEN,
};
use crate::services::records::SKILL_COUNT;
use regex::Regex;
use std::sync::LazyLock;

static SKILL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(w)?(\d+)\(\s*(-?\d*)\s*(?:/\s*(-?\d*)\s*)?\)$").expect("valid skill regex")
});
static LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?\d*)\s*(?:/\s*(-?\d*))?$").expect("valid level regex"));
static RANK_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\(\s*(-?\d*)\s*(?:/\s*(-?\d*)\s*)?\)$").expect("valid rank regex")
});

pub fn is_none_cell(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell.eq_ignore_ascii_case(NONE_TOKEN)
}

pub fn parse_filter_section(cell: &str) -> Result<FilterSection, String> {
    if is_none_cell(cell) {
        return Ok(FilterSection::default());
    }

    let mut groups: Vec<Vec<FilterPart>> = Vec::new();

    for group in cell.split(',') {
        let group = group.trim();
        if group.is_empty() {
            // Trailing or doubled commas are common in hand-edited files.
            continue;
        }

        let tokens: Vec<&str> = group.split('+').map(str::trim).collect();
        if tokens.iter().any(|token| token.is_empty()) {
            return Err(format!("empty operand around '+' in \"{group}\""));
        }

        groups.push(
            tokens
                .into_iter()
                .map(parse_part)
                .collect::<Result<Vec<_>, _>>()?,
        );
    }

    // Only the trailing run of lone negated groups are global exclusions.
    let trailing = groups
        .iter()
        .rev()
        .take_while(|parts| is_exclusion_group(parts))
        .count();
    let exclusions = groups.split_off(groups.len() - trailing);

    Ok(FilterSection {
        expressions: groups
            .into_iter()
            .map(|parts| FilterExpression { parts })
            .collect(),
        global_exclusions: exclusions.into_iter().flatten().collect(),
    })
}

fn is_exclusion_group(parts: &[FilterPart]) -> bool {
    parts.len() == 1 && parts[0].is_negated
}

fn parse_part(token: &str) -> Result<FilterPart, String> {
    let (is_negated, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest.trim()),
        None => (false, token),
    };

    if body.is_empty() {
        return Err("negation without operand".to_string());
    }
    if body.starts_with('-') {
        return Err(format!("repeated negation in \"{token}\""));
    }

    Ok(FilterPart::new(body, is_negated))
}

/// Split `Faction(0/2)` into the reference and its rank range.
pub fn split_rank_suffix(value: &str) -> (&str, Option<RangeFilter>) {
    let Some(caps) = RANK_SUFFIX_RE.captures(value) else {
        return (value, None);
    };
    let (Ok(min), Ok(max)) = (
        parse_bound(caps.get(2).map(|m| m.as_str())),
        parse_bound(caps.get(3).map(|m| m.as_str())),
    ) else {
        return (value, None);
    };

    let name = caps.get(1).map(|m| m.as_str()).unwrap_or(value);
    (name.trim(), Some(RangeFilter { min, max }))
}

fn parse_bound(raw: Option<&str>) -> Result<Option<i32>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse::<i32>()
            .map(Some)
            .map_err(|_| format!("invalid number \"{text}\"")),
    }
}

/// Level cell: `,`-separated constraints that must all hold.
///
/// `5/20`, `5`, `5/`, `/20` constrain actor level; `14(50/100)` or `14(50)`
/// constrain skill 14. Weighted skills (`w14(...)`) are accepted but impose no
/// constraint because they only make sense against the runtime skill curve.
pub fn parse_level_filters(cell: &str) -> Result<Option<LevelFilters>, String> {
    if is_none_cell(cell) {
        return Ok(None);
    }

    let mut constraints = Vec::new();

    for item in cell.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        if let Some(caps) = SKILL_RE.captures(item) {
            let index: usize = caps[2]
                .parse()
                .map_err(|_| format!("invalid skill index in \"{item}\""))?;
            if index >= SKILL_COUNT {
                return Err(format!("skill index {index} out of range in \"{item}\""));
            }
            let range = RangeFilter {
                min: parse_bound(caps.get(3).map(|m| m.as_str()))?,
                max: parse_bound(caps.get(4).map(|m| m.as_str()))?,
            };
            check_range(item, &range)?;
            if caps.get(1).is_some() {
                continue;
            }
            constraints.push(LevelConstraint {
                target: LevelTarget::Skill(index as u8),
                range,
            });
            continue;
        }

        let caps = LEVEL_RE
            .captures(item)
            .ok_or_else(|| format!("unrecognised level filter \"{item}\""))?;
        let range = RangeFilter {
            min: parse_bound(caps.get(1).map(|m| m.as_str()))?,
            max: parse_bound(caps.get(2).map(|m| m.as_str()))?,
        };
        if range.min.is_none() && range.max.is_none() {
            return Err(format!("level filter \"{item}\" has no bounds"));
        }
        check_range(item, &range)?;
        constraints.push(LevelConstraint {
            target: LevelTarget::ActorLevel,
            range,
        });
    }

    Ok(Some(LevelFilters {
        raw: cell.trim().to_string(),
        constraints,
    }))
}

fn check_range(item: &str, range: &RangeFilter) -> Result<(), String> {
    match (range.min, range.max) {
        (Some(min), Some(max)) if min > max => {
            Err(format!("minimum exceeds maximum in \"{item}\""))
        }
        _ => Ok(()),
    }
}

/// Trait cell: `/`-separated single-letter codes, `-` negates.
/// `F` female, `M` male, `U` unique, `S` summonable, `C` child, `L` leveled,
/// `T` teammate, `D` dead.
pub fn parse_trait_filters(cell: &str) -> Result<TraitFilters, String> {
    let mut traits = TraitFilters::default();
    if is_none_cell(cell) {
        return Ok(traits);
    }

    for code in cell.split('/').map(str::trim).filter(|code| !code.is_empty()) {
        let (negated, letter) = match code.strip_prefix('-') {
            Some(rest) => (true, rest.trim()),
            None => (false, code),
        };

        let (slot, value) = match letter.to_ascii_uppercase().as_str() {
            "F" if !negated => (&mut traits.is_female, true),
            "M" if !negated => (&mut traits.is_female, false),
            "U" => (&mut traits.is_unique, !negated),
            "S" => (&mut traits.is_summonable, !negated),
            "C" => (&mut traits.is_child, !negated),
            "L" => (&mut traits.is_leveled, !negated),
            "T" => (&mut traits.is_teammate, !negated),
            "D" => (&mut traits.is_dead, !negated),
            _ => return Err(format!("unknown trait code \"{code}\"")),
        };

        if matches!(*slot, Some(existing) if existing != value) {
            return Err(format!("contradictory trait code \"{code}\""));
        }
        *slot = Some(value);
    }

    Ok(traits)
}

pub fn format_trait_filters(traits: &TraitFilters) -> String {
    if traits.is_empty() {
        return NONE_TOKEN.to_string();
    }

    let mut codes = Vec::new();
    if let Some(female) = traits.is_female {
        codes.push(if female { "F" } else { "M" }.to_string());
    }
    let flags = [
        ("U", traits.is_unique),
        ("S", traits.is_summonable),
        ("C", traits.is_child),
        ("L", traits.is_leveled),
        ("T", traits.is_teammate),
        ("D", traits.is_dead),
    ];
    for (letter, flag) in flags {
        match flag {
            Some(true) => codes.push(letter.to_string()),
            Some(false) => codes.push(format!("-{letter}")),
            None => {}
        }
    }

    codes.join("/")
}

/// Chance cell. Non-numeric input defaults to 100; numbers clamp into 0..=100.
pub fn parse_chance(cell: &str) -> u8 {
    if is_none_cell(cell) {
        return DEFAULT_CHANCE;
    }

    match cell.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value.round().clamp(0.0, 100.0) as u8,
        _ => DEFAULT_CHANCE,
    }
}

#[cfg(test)]
#[path = "tests/grammar_tests.rs"]
mod tests;
