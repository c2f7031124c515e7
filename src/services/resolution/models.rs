use crate::services::distribution::DistributionDialect;
use crate::services::records::{FormKey, ModKey};
use serde::Serialize;
use std::path::PathBuf;

/// One matching outfit distribution for one NPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitDistribution {
    pub file_path: PathBuf,
    pub file_name: String,
    pub dialect: DistributionDialect,
    pub line_number: usize,
    pub outfit_id: FormKey,
    pub outfit_editor_id: Option<String>,
    pub chance: u8,
    pub processing_order: usize,
    pub is_winner: bool,
}

impl OutfitDistribution {
    /// Editor id when known, otherwise the record id.
    pub fn outfit_label(&self) -> String {
        self.outfit_editor_id
            .clone()
            .unwrap_or_else(|| self.outfit_id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcOutfitAssignment {
    pub npc_id: FormKey,
    pub editor_id: Option<String>,
    pub name: Option<String>,
    pub source_mod: ModKey,
    pub final_outfit_id: Option<FormKey>,
    pub final_outfit_editor_id: Option<String>,
    pub distributions: Vec<OutfitDistribution>,
    pub has_conflict: bool,
}

impl NpcOutfitAssignment {
    pub fn winner(&self) -> Option<&OutfitDistribution> {
        self.distributions.iter().find(|d| d.is_winner)
    }

    pub fn display_name(&self) -> Option<String> {
        self.name.clone().or_else(|| self.editor_id.clone())
    }
}

/// Non-fatal problems found while resolving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ResolutionWarning {
    #[serde(rename_all = "camelCase")]
    UnresolvedReference {
        file_name: String,
        line_number: usize,
        token: String,
    },
    #[serde(rename_all = "camelCase")]
    KeywordCycle {
        iterations: usize,
        unsettled_npcs: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionReport {
    /// Sorted by NPC id.
    pub assignments: Vec<NpcOutfitAssignment>,
    pub warnings: Vec<ResolutionWarning>,
    pub keyword_iterations: usize,
}

impl ResolutionReport {
    pub fn assignment_for(&self, npc_id: &FormKey) -> Option<&NpcOutfitAssignment> {
        self.assignments
            .binary_search_by(|assignment| assignment.npc_id.cmp(npc_id))
            .ok()
            .map(|idx| &self.assignments[idx])
    }
}
