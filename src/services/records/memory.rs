use super::{FormKey, ModKey, NpcFilterData, RecordKind, RecordStore};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Store backed by records the host has already loaded into memory.
#[derive(Debug, Clone)]
pub struct InMemoryRecordStore {
    initialized: bool,
    records: BTreeMap<FormKey, (RecordKind, String)>,
    by_editor_id: HashMap<String, FormKey>,
    npcs: Vec<NpcFilterData>,
    mods: BTreeSet<ModKey>,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            initialized: true,
            records: BTreeMap::new(),
            by_editor_id: HashMap::new(),
            npcs: Vec::new(),
            mods: BTreeSet::new(),
        }
    }

    /// A store whose host has not finished loading; resolution refuses it.
    pub fn uninitialized() -> Self {
        Self {
            initialized: false,
            ..Self::new()
        }
    }

    pub fn add_mod(&mut self, mod_key: ModKey) -> &mut Self {
        self.mods.insert(mod_key);
        self
    }

    pub fn add_record(&mut self, kind: RecordKind, id: FormKey, editor_id: &str) -> &mut Self {
        self.mods.insert(id.mod_key.clone());
        self.by_editor_id
            .insert(editor_id.to_lowercase(), id.clone());
        self.records.insert(id, (kind, editor_id.to_string()));
        self
    }

    /// Registers the NPC record too, so its editor id resolves in form filters.
    pub fn add_npc(&mut self, npc: NpcFilterData) -> &mut Self {
        if let Some(editor_id) = npc.editor_id.clone() {
            self.add_record(RecordKind::Npc, npc.form_key.clone(), &editor_id);
        }
        self.mods.insert(npc.source_mod.clone());
        self.npcs.push(npc);
        self
    }
}

impl RecordStore for InMemoryRecordStore {
    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn lookup_editor_id(&self, kind: RecordKind, id: &FormKey) -> Option<String> {
        self.records
            .get(id)
            .filter(|(record_kind, _)| *record_kind == kind)
            .map(|(_, editor_id)| editor_id.clone())
    }

    fn resolve_editor_id(&self, editor_id: &str) -> Option<(FormKey, RecordKind)> {
        let id = self.by_editor_id.get(&editor_id.trim().to_lowercase())?;
        let (kind, _) = self.records.get(id)?;
        Some((id.clone(), *kind))
    }

    fn all_npcs(&self) -> Vec<NpcFilterData> {
        self.npcs.clone()
    }

    fn load_order_mod_keys(&self) -> BTreeSet<ModKey> {
        self.mods.clone()
    }
}
