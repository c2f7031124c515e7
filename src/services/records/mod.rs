//! Record access seam.
//!
//! The binary plugin reader lives outside this crate. Everything the core needs
//! from it goes through [`RecordStore`]; the store is never mutated by the core.

pub mod form_key;
pub mod memory;
pub mod npc;

pub use form_key::{FormKey, ModKey};
pub use memory::InMemoryRecordStore;
pub use npc::{FactionMembership, NpcFilterData, NpcFilterDataBuilder, NpcTraits, SKILL_COUNT};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordKind {
    Npc,
    Keyword,
    Faction,
    Race,
    Class,
    CombatStyle,
    VoiceType,
    Outfit,
    Perk,
    Spell,
    Location,
    FormList,
    Other,
}

pub trait RecordStore: Send + Sync {
    /// `false` until the host has finished loading plugins.
    fn is_initialized(&self) -> bool {
        true
    }

    fn lookup_editor_id(&self, kind: RecordKind, id: &FormKey) -> Option<String>;

    /// Resolve an editor id (case-insensitive) to its record and kind.
    fn resolve_editor_id(&self, editor_id: &str) -> Option<(FormKey, RecordKind)>;

    fn all_npcs(&self) -> Vec<NpcFilterData>;

    fn load_order_mod_keys(&self) -> BTreeSet<ModKey>;

    fn lookup_keyword(&self, id: &FormKey) -> Option<String> {
        self.lookup_editor_id(RecordKind::Keyword, id)
    }

    fn lookup_faction(&self, id: &FormKey) -> Option<String> {
        self.lookup_editor_id(RecordKind::Faction, id)
    }

    fn lookup_race(&self, id: &FormKey) -> Option<String> {
        self.lookup_editor_id(RecordKind::Race, id)
    }

    fn lookup_class(&self, id: &FormKey) -> Option<String> {
        self.lookup_editor_id(RecordKind::Class, id)
    }

    fn lookup_combat_style(&self, id: &FormKey) -> Option<String> {
        self.lookup_editor_id(RecordKind::CombatStyle, id)
    }

    fn lookup_voice_type(&self, id: &FormKey) -> Option<String> {
        self.lookup_editor_id(RecordKind::VoiceType, id)
    }

    fn lookup_outfit(&self, id: &FormKey) -> Option<String> {
        self.lookup_editor_id(RecordKind::Outfit, id)
    }
}

#[cfg(test)]
#[path = "tests/records_tests.rs"]
mod tests;
