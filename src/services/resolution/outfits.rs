//! NPC outfit resolution: who gets which outfit, and from which line.

use super::keywords::{resolve_keywords, KeywordRule};
use super::matcher::matches_filter;
use super::models::{NpcOutfitAssignment, OutfitDistribution, ResolutionReport, ResolutionWarning};
use super::references::{keyword_grant, resolve_filter_references};
use crate::services::config::models::ResolverSettings;
use crate::services::distribution::{DistributionFile, FormType, SpidDistributionFilter};
use crate::services::records::{FormKey, RecordStore};
use crate::types::errors::{DistributionError, DistributionResult};
use rayon::prelude::*;

/// An outfit entry ready for matching.
struct OutfitRule<'a> {
    file: &'a DistributionFile,
    line_number: usize,
    filter: SpidDistributionFilter,
    outfit_id: FormKey,
    outfit_editor_id: Option<String>,
    processing_order: usize,
}

/// Files in processing order: the SkyPatcher group, then the SPID group, each
/// by file name and then path.
pub fn order_files<'a>(
    files: impl IntoIterator<Item = &'a DistributionFile>,
) -> Vec<&'a DistributionFile> {
    let mut ordered: Vec<&DistributionFile> = files.into_iter().collect();
    ordered.sort_by_cached_key(|file| file.sort_key());
    ordered
}

/// Resolve every NPC's final outfit across all given files.
///
/// The input order of `files` does not matter. Unresolved tokens become
/// warnings; only an unavailable record store is an error.
pub fn resolve_outfits<'a>(
    files: impl IntoIterator<Item = &'a DistributionFile>,
    store: &dyn RecordStore,
    settings: &ResolverSettings,
) -> DistributionResult<ResolutionReport> {
    if !store.is_initialized() {
        return Err(DistributionError::StoreUnavailable(
            "plugin records have not been loaded".to_string(),
        ));
    }

    let ordered = order_files(files);
    let load_order = store.load_order_mod_keys();
    let mut warnings = Vec::new();
    let mut keyword_rules = Vec::new();
    let mut outfit_rules = Vec::new();

    for file in ordered.iter().copied() {
        for entry in file.resolution_entries() {
            let (filter, unresolved) = resolve_filter_references(&entry.filter, store, &load_order);
            for token in unresolved {
                log::warn!(
                    "{}:{}: unresolved reference '{}'",
                    file.file_name,
                    entry.line_number,
                    token
                );
                warnings.push(ResolutionWarning::UnresolvedReference {
                    file_name: file.file_name.clone(),
                    line_number: entry.line_number,
                    token,
                });
            }

            match filter.form_type {
                FormType::Keyword => {
                    let grant = keyword_grant(&filter, store);
                    keyword_rules.push(KeywordRule { filter, grant });
                }
                FormType::Outfit => {
                    let Some(outfit_id) = filter.resolved_form_id.clone() else {
                        continue;
                    };
                    outfit_rules.push(OutfitRule {
                        file,
                        line_number: entry.line_number,
                        outfit_editor_id: store.lookup_outfit(&outfit_id),
                        outfit_id,
                        filter,
                        processing_order: outfit_rules.len() + 1,
                    });
                }
                _ => {}
            }
        }
    }

    let mut npcs = store.all_npcs();
    npcs.sort_by(|a, b| a.form_key.cmp(&b.form_key));
    npcs.dedup_by(|a, b| a.form_key == b.form_key);

    let keyword_state = resolve_keywords(npcs, &keyword_rules, settings.max_keyword_iterations);
    if !keyword_state.converged {
        warnings.push(ResolutionWarning::KeywordCycle {
            iterations: keyword_state.iterations,
            unsettled_npcs: keyword_state.unsettled_npcs,
        });
    }

    let assignments: Vec<NpcOutfitAssignment> = keyword_state
        .npcs
        .par_iter()
        .filter_map(|npc| {
            let mut distributions: Vec<OutfitDistribution> = outfit_rules
                .iter()
                .filter(|rule| matches_filter(npc, &rule.filter))
                .map(|rule| OutfitDistribution {
                    file_path: rule.file.full_path.clone(),
                    file_name: rule.file.file_name.clone(),
                    dialect: rule.file.dialect,
                    line_number: rule.line_number,
                    outfit_id: rule.outfit_id.clone(),
                    outfit_editor_id: rule.outfit_editor_id.clone(),
                    chance: rule.filter.chance,
                    processing_order: rule.processing_order,
                    is_winner: false,
                })
                .collect();

            if distributions.is_empty() && !settings.include_unmatched_npcs {
                return None;
            }

            // Rules are already in processing order, so the last match wins.
            if let Some(winner) = distributions.last_mut() {
                winner.is_winner = true;
            }
            let winner = distributions.last();
            let has_conflict = distributions.len() > 1;

            Some(NpcOutfitAssignment {
                npc_id: npc.form_key.clone(),
                editor_id: npc.editor_id.clone(),
                name: npc.name.clone(),
                source_mod: npc.source_mod.clone(),
                final_outfit_id: winner.map(|w| w.outfit_id.clone()),
                final_outfit_editor_id: winner.and_then(|w| w.outfit_editor_id.clone()),
                has_conflict,
                distributions,
            })
        })
        .collect();

    log::info!(
        "Resolved outfits for {} NPCs from {} files ({} outfit entries, {} keyword entries, {} warnings)",
        assignments.len(),
        ordered.len(),
        outfit_rules.len(),
        keyword_rules.len(),
        warnings.len()
    );

    Ok(ResolutionReport {
        assignments,
        warnings,
        keyword_iterations: keyword_state.iterations,
    })
}

#[cfg(test)]
#[path = "tests/outfits_tests.rs"]
mod tests;
