//! Outfit conflict detection for a candidate distribution file.
//!
//! Resolves the existing file set with and without the candidate and reports
//! every NPC whose outfit the candidate would fight over. When the candidate
//! would not win at its natural position, a file name that does is suggested.

pub mod detect;
pub mod naming;

use crate::services::config::models::ResolverSettings;
use crate::services::distribution::{DistributionDialect, DistributionFile};
use crate::services::records::{FormKey, RecordStore};
use crate::services::resolution::{resolve_outfits, NpcOutfitAssignment};
use crate::types::errors::DistributionResult;
use naming::suggest_winning_file_name;
use serde::Serialize;
use std::collections::BTreeMap;

pub use detect::{detect_conflicts_for_path, detect_conflicts_for_text};

/// One NPC the candidate and an existing file both dress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcConflictInfo {
    pub npc_id: FormKey,
    pub display_name: Option<String>,
    /// File currently providing the NPC's outfit.
    pub existing_file_name: String,
    pub existing_outfit_name: Option<String>,
    pub new_outfit_name: Option<String>,
    /// Whether the candidate wins at its natural position.
    pub candidate_wins: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictDetectionResult {
    pub has_conflicts: bool,
    pub resolved_by_filename: bool,
    pub summary: String,
    /// Only set when the candidate does not already win by name.
    pub suggested_file_name: Option<String>,
    pub conflicts: Vec<NpcConflictInfo>,
}

fn is_same_file(a: &DistributionFile, b: &DistributionFile) -> bool {
    a.full_path == b.full_path
        || (a.dialect == b.dialect && a.relative_path.eq_ignore_ascii_case(&b.relative_path))
}

/// Compare a candidate against the already discovered files.
///
/// An existing entry for the candidate itself (same path) is ignored, so the
/// candidate can be a file being edited. NPCs whose current outfit already
/// equals the candidate's are not conflicts.
pub fn detect_conflicts(
    candidate: &DistributionFile,
    existing: &[DistributionFile],
    store: &dyn RecordStore,
    settings: &ResolverSettings,
) -> DistributionResult<ConflictDetectionResult> {
    let others: Vec<&DistributionFile> = existing
        .iter()
        .filter(|file| !is_same_file(file, candidate))
        .collect();

    let targeted_only = ResolverSettings {
        include_unmatched_npcs: false,
        ..settings.clone()
    };
    let baseline = resolve_outfits(others.iter().copied(), store, &targeted_only)?;
    let combined = resolve_outfits(
        others.iter().copied().chain(std::iter::once(candidate)),
        store,
        &targeted_only,
    )?;

    let current: BTreeMap<&FormKey, &NpcOutfitAssignment> = baseline
        .assignments
        .iter()
        .map(|assignment| (&assignment.npc_id, assignment))
        .collect();

    let mut conflicts = Vec::new();
    let mut outranked_by: Option<DistributionDialect> = None;
    for assignment in &combined.assignments {
        let Some(own) = assignment
            .distributions
            .iter()
            .rev()
            .find(|d| d.file_path == candidate.full_path)
        else {
            continue;
        };
        let Some(existing_winner) = current.get(&assignment.npc_id).and_then(|a| a.winner()) else {
            continue;
        };
        if existing_winner.outfit_id == own.outfit_id {
            continue;
        }

        let candidate_wins = assignment
            .winner()
            .is_some_and(|winner| winner.file_path == candidate.full_path);
        if !candidate_wins
            && existing_winner.dialect.precedence() > candidate.dialect.precedence()
        {
            outranked_by = Some(existing_winner.dialect);
        }

        conflicts.push(NpcConflictInfo {
            npc_id: assignment.npc_id.clone(),
            display_name: assignment.display_name(),
            existing_file_name: existing_winner.file_name.clone(),
            existing_outfit_name: Some(existing_winner.outfit_label()),
            new_outfit_name: Some(own.outfit_label()),
            candidate_wins,
        });
    }

    let has_conflicts = !conflicts.is_empty();
    let resolved_by_filename = conflicts.iter().all(|conflict| conflict.candidate_wins);
    let suggested_file_name = (!resolved_by_filename && outranked_by.is_none()).then(|| {
        suggest_winning_file_name(
            &candidate.file_name,
            others
                .iter()
                .filter(|file| file.dialect == candidate.dialect)
                .map(|file| file.file_name.as_str()),
        )
    });

    let summary = build_summary(
        candidate,
        &conflicts,
        resolved_by_filename,
        suggested_file_name.as_deref(),
        outranked_by,
        settings.conflict_summary_limit,
    );

    if has_conflicts {
        log::info!(
            "{}: {} outfit conflicts (resolved by filename: {})",
            candidate.file_name,
            conflicts.len(),
            resolved_by_filename
        );
    }

    Ok(ConflictDetectionResult {
        has_conflicts,
        resolved_by_filename,
        summary,
        suggested_file_name,
        conflicts,
    })
}

/// Human-readable list of affected NPCs, capped at `limit` names.
/// `outranked_by` names a dialect whose files always load after the candidate.
pub fn build_summary(
    candidate: &DistributionFile,
    conflicts: &[NpcConflictInfo],
    resolved_by_filename: bool,
    suggested_file_name: Option<&str>,
    outranked_by: Option<DistributionDialect>,
    limit: usize,
) -> String {
    if conflicts.is_empty() {
        return format!(
            "{} does not change the outfit of any NPC dressed by another file.",
            candidate.file_name
        );
    }

    let names: Vec<String> = conflicts
        .iter()
        .take(limit.max(1))
        .map(|conflict| {
            let who = conflict
                .display_name
                .clone()
                .unwrap_or_else(|| conflict.npc_id.to_string());
            format!("{who} ({})", conflict.existing_file_name)
        })
        .collect();

    let mut summary = format!(
        "{} {} an outfit from another file: {}",
        conflicts.len(),
        if conflicts.len() == 1 {
            "NPC already receives"
        } else {
            "NPCs already receive"
        },
        names.join(", ")
    );
    let hidden = conflicts.len().saturating_sub(names.len());
    if hidden > 0 {
        summary.push_str(&format!(" and {hidden} more"));
    }
    summary.push('.');

    if resolved_by_filename {
        summary.push_str(&format!(
            " {} loads after them and wins.",
            candidate.file_name
        ));
    } else if let Some(dialect) = outranked_by {
        summary.push_str(&format!(
            " {} files always load after {} files, so renaming {} cannot make it win.",
            dialect.label(),
            candidate.dialect.label(),
            candidate.file_name
        ));
    } else if let Some(suggested) = suggested_file_name {
        summary.push_str(&format!(" Rename it to {suggested} to make it load last."));
    }

    summary
}

#[cfg(test)]
#[path = "tests/conflict_tests.rs"]
mod tests;
