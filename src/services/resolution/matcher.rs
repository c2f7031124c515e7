//! Filter matcher: decides whether one resolved filter applies to one NPC.
//!
//! **Semantics:**
//! 1. Sections are ANDed: string, form, level, trait
//! 2. Inside a section, expressions are ORed and parts within an expression ANDed
//! 3. A negated part matches when its positive form does not
//! 4. A global exclusion that matches rejects the NPC outright
//! 5. An empty section always matches; chance never affects the outcome

use crate::services::distribution::grammar::split_rank_suffix;
use crate::services::distribution::{
    FilterPart, FilterSection, LevelFilters, LevelTarget, SpidDistributionFilter, TraitFilters,
};
use crate::services::records::{ModKey, NpcFilterData};

// ─── Entry Point ─────────────────────────────────────────────────────────────

/// Evaluate a filter whose references were already resolved.
pub fn matches_filter(npc: &NpcFilterData, filter: &SpidDistributionFilter) -> bool {
    matches_section(&filter.string_filters, |part| string_part_matches(npc, part))
        && matches_section(&filter.form_filters, |part| form_part_matches(npc, part))
        && matches_level_filters(npc, filter.level_filters.as_ref())
        && matches_trait_filters(npc, &filter.trait_filters)
}

/// Generic section evaluation. `part_matches` answers for the positive form
/// of a part; negation is applied here.
pub(crate) fn matches_section(
    section: &FilterSection,
    part_matches: impl Fn(&FilterPart) -> bool,
) -> bool {
    let included = section.expressions.is_empty()
        || section.expressions.iter().any(|expression| {
            expression
                .parts
                .iter()
                .all(|part| part_matches(part) != part.is_negated)
        });

    included && !section.global_exclusions.iter().any(&part_matches)
}

// ─── String Filters ──────────────────────────────────────────────────────────

fn string_part_matches(npc: &NpcFilterData, part: &FilterPart) -> bool {
    if part.editor_id_only {
        let pattern = part.value.to_lowercase();
        return npc
            .editor_id
            .as_deref()
            .is_some_and(|editor_id| wildcard_matches(&pattern, &editor_id.to_lowercase()));
    }
    if part.has_wildcard() {
        let pattern = part.value.to_lowercase();
        return npc
            .match_keys()
            .iter()
            .any(|key| wildcard_matches(&pattern, key));
    }
    npc.has_match_key(&part.value)
}

/// `*` matches any run of characters. Both inputs must already be lower-cased.
pub fn wildcard_matches(pattern: &str, candidate: &str) -> bool {
    let segments: Vec<&str> = pattern.split('*').collect();
    let last = segments.len() - 1;
    let mut pos = 0;

    for (idx, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            continue;
        }
        if idx == 0 {
            if !candidate.starts_with(segment) {
                return false;
            }
            pos = segment.len();
        } else if idx == last {
            return candidate.len() >= pos + segment.len() && candidate.ends_with(segment);
        } else {
            match candidate[pos..].find(segment) {
                Some(found) => pos += found + segment.len(),
                None => return false,
            }
        }
    }

    // A pattern without '*' is an exact comparison.
    last > 0 || pos == candidate.len()
}

// ─── Form Filters ────────────────────────────────────────────────────────────

fn form_part_matches(npc: &NpcFilterData, part: &FilterPart) -> bool {
    if part.is_mod_file_ref {
        let (name, _) = split_rank_suffix(&part.value);
        return ModKey::parse(name).is_some_and(|mod_key| {
            npc.form_key.mod_key == mod_key || npc.source_mod == mod_key
        });
    }

    let Some(id) = &part.resolved_form_id else {
        return false;
    };

    match &part.rank_range {
        Some(range) => npc.faction_rank(id).is_some_and(|rank| range.contains(rank)),
        None => npc.references(id),
    }
}

// ─── Level & Trait Filters ───────────────────────────────────────────────────

fn matches_level_filters(npc: &NpcFilterData, filters: Option<&LevelFilters>) -> bool {
    let Some(filters) = filters else {
        return true;
    };

    filters.constraints.iter().all(|constraint| {
        let value = match constraint.target {
            LevelTarget::ActorLevel => i32::from(npc.level),
            LevelTarget::Skill(idx) => npc
                .skill_values
                .get(usize::from(idx))
                .map(|v| i32::from(*v))
                .unwrap_or(0),
        };
        constraint.range.contains(value)
    })
}

fn matches_trait_filters(npc: &NpcFilterData, filters: &TraitFilters) -> bool {
    let traits = &npc.traits;
    [
        (filters.is_female, traits.female),
        (filters.is_unique, traits.unique),
        (filters.is_summonable, traits.summonable),
        (filters.is_child, traits.child),
        (filters.is_leveled, traits.leveled),
        (filters.is_teammate, traits.teammate),
        (filters.is_dead, traits.dead),
    ]
    .iter()
    .all(|(wanted, actual)| wanted.is_none_or(|wanted| wanted == *actual))
}

#[cfg(test)]
#[path = "tests/matcher_tests.rs"]
mod tests;
