//! Binds filter tokens to records through the [`RecordStore`].
//!
//! Produces a resolved copy; parsed filters stay untouched. Tokens that do not
//! resolve are returned to the caller, and the matcher treats them as parts
//! that never match.

use crate::services::distribution::grammar::split_rank_suffix;
use crate::services::distribution::{FilterPart, FormType, SpidDistributionFilter};
use crate::services::records::{FormKey, ModKey, RecordStore};
use std::collections::BTreeSet;

/// A keyword handed out by a `Keyword =` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordGrant {
    pub editor_id: String,
    pub id: Option<FormKey>,
}

/// Explicit FormKeys are taken as written; anything else is an editor id.
fn resolve_identifier(token: &str, store: &dyn RecordStore) -> Option<FormKey> {
    FormKey::parse(token).or_else(|| store.resolve_editor_id(token).map(|(key, _)| key))
}

/// Returns the resolved filter and every token that failed to resolve.
pub fn resolve_filter_references(
    filter: &SpidDistributionFilter,
    store: &dyn RecordStore,
    load_order: &BTreeSet<ModKey>,
) -> (SpidDistributionFilter, Vec<String>) {
    let mut resolved = filter.clone();
    let mut unresolved = Vec::new();

    resolved.resolved_form_id = resolve_identifier(&filter.form_identifier, store);
    // Keywords that do not exist yet are created by the distributor, so only
    // other form types need a real record behind the identifier.
    if resolved.resolved_form_id.is_none() && filter.form_type != FormType::Keyword {
        unresolved.push(filter.form_identifier.clone());
    }

    for part in resolved.form_filters.parts_mut() {
        if !resolve_form_part(part, store, load_order) {
            unresolved.push(part.value.clone());
        }
    }

    (resolved, unresolved)
}

fn resolve_form_part(
    part: &mut FilterPart,
    store: &dyn RecordStore,
    load_order: &BTreeSet<ModKey>,
) -> bool {
    let (name, rank_range) = split_rank_suffix(&part.value);
    let name = name.to_string();
    part.rank_range = rank_range;

    if let Some(mod_key) = ModKey::parse(&name) {
        part.is_mod_file_ref = true;
        return load_order.contains(&mod_key);
    }

    match resolve_identifier(&name, store) {
        Some(key) => {
            part.resolved_form_id = Some(key);
            true
        }
        None => false,
    }
}

/// Keyword name and id distributed by a resolved `Keyword =` entry.
pub fn keyword_grant(filter: &SpidDistributionFilter, store: &dyn RecordStore) -> KeywordGrant {
    let editor_id = filter
        .resolved_form_id
        .as_ref()
        .and_then(|id| store.lookup_keyword(id))
        .unwrap_or_else(|| filter.form_identifier.clone());

    KeywordGrant {
        editor_id,
        id: filter.resolved_form_id.clone(),
    }
}

#[cfg(test)]
#[path = "tests/references_tests.rs"]
mod tests;
