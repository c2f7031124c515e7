use serde::{Deserialize, Serialize};

/// Tunables for discovery, resolution and conflict reporting.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverSettings {
    /// Passes allowed before keyword resolution reports a cycle.
    pub max_keyword_iterations: usize,
    /// NPC names listed in a conflict summary before "and N more".
    pub conflict_summary_limit: usize,
    /// Emit NPCs that no distribution matched (with no final outfit).
    pub include_unmatched_npcs: bool,
    /// File-name suffix identifying SPID files.
    pub spid_suffix: String,
    /// Directory name that holds SkyPatcher configuration.
    pub skypatcher_dir_name: String,
    /// Maximum directory depth searched under the data root.
    pub max_scan_depth: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            max_keyword_iterations: 10,
            conflict_summary_limit: 10,
            include_unmatched_npcs: false,
            spid_suffix: "_DISTR.ini".into(),
            skypatcher_dir_name: "SkyPatcher".into(),
            max_scan_depth: 8,
        }
    }
}

impl ResolverSettings {
    /// Clamp values that would make resolution meaningless.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        self.max_keyword_iterations = self.max_keyword_iterations.max(1);
        self.conflict_summary_limit = self.conflict_summary_limit.max(1);
        self.max_scan_depth = self.max_scan_depth.max(1);
        if self.spid_suffix.trim().is_empty() {
            self.spid_suffix = defaults.spid_suffix;
        }
        if self.skypatcher_dir_name.trim().is_empty() {
            self.skypatcher_dir_name = defaults.skypatcher_dir_name;
        }
        self
    }
}
