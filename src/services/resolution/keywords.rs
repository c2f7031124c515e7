//! Keyword fixed point.
//!
//! `Keyword =` entries can be gated on keywords other entries hand out, so the
//! grants are applied in passes until nothing changes. Each pass evaluates
//! every NPC against the snapshots produced by the previous pass, which keeps
//! the outcome independent of NPC and entry order.

use super::matcher::matches_filter;
use super::references::KeywordGrant;
use crate::services::distribution::SpidDistributionFilter;
use crate::services::records::NpcFilterData;
use rayon::prelude::*;

/// A resolved `Keyword =` entry and what it grants.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub filter: SpidDistributionFilter,
    pub grant: KeywordGrant,
}

#[derive(Debug, Clone)]
pub struct KeywordResolution {
    pub npcs: Vec<NpcFilterData>,
    /// Passes run, including the final one that observed no change.
    pub iterations: usize,
    pub converged: bool,
    /// NPCs still changing when the iteration cap was hit.
    pub unsettled_npcs: usize,
}

/// Apply keyword rules until a fixed point or `max_iterations` passes.
pub fn resolve_keywords(
    npcs: Vec<NpcFilterData>,
    rules: &[KeywordRule],
    max_iterations: usize,
) -> KeywordResolution {
    let mut current = npcs;

    if rules.is_empty() {
        return KeywordResolution {
            npcs: current,
            iterations: 0,
            converged: true,
            unsettled_npcs: 0,
        };
    }

    let max_iterations = max_iterations.max(1);
    let mut last_changed = 0;

    for pass in 1..=max_iterations {
        let next: Vec<(NpcFilterData, bool)> = current
            .par_iter()
            .map(|npc| {
                let grants = rules
                    .iter()
                    .filter(|rule| matches_filter(npc, &rule.filter))
                    .map(|rule| (rule.grant.editor_id.as_str(), rule.grant.id.as_ref()));

                match npc.with_granted_keywords(grants) {
                    Some(updated) => (updated, true),
                    None => (npc.clone(), false),
                }
            })
            .collect();

        last_changed = next.iter().filter(|(_, changed)| *changed).count();
        current = next.into_iter().map(|(npc, _)| npc).collect();

        log::debug!("Keyword pass {pass}: {last_changed} NPCs gained keywords");

        if last_changed == 0 {
            return KeywordResolution {
                npcs: current,
                iterations: pass,
                converged: true,
                unsettled_npcs: 0,
            };
        }
    }

    log::warn!(
        "Keyword resolution stopped after {max_iterations} passes with {last_changed} NPCs still changing"
    );

    KeywordResolution {
        npcs: current,
        iterations: max_iterations,
        converged: false,
        unsettled_npcs: last_changed,
    }
}

#[cfg(test)]
#[path = "tests/keywords_tests.rs"]
mod tests;
