//! Read-only NPC attribute snapshot used by the filter matcher.

use super::form_key::{FormKey, ModKey};
use serde::Serialize;
use std::collections::BTreeSet;

/// Number of skill slots carried per NPC (18 vanilla skills plus spare slots).
pub const SKILL_COUNT: usize = 24;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcTraits {
    pub female: bool,
    pub unique: bool,
    pub summonable: bool,
    pub child: bool,
    pub leveled: bool,
    pub teammate: bool,
    pub dead: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactionMembership {
    pub faction: FormKey,
    pub rank: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcFilterData {
    pub form_key: FormKey,
    pub editor_id: Option<String>,
    pub name: Option<String>,
    pub source_mod: ModKey,
    /// Keyword editor ids, including virtual keywords granted during resolution.
    pub keywords: BTreeSet<String>,
    pub keyword_ids: BTreeSet<FormKey>,
    pub factions: Vec<FactionMembership>,
    pub race_id: Option<FormKey>,
    pub class_id: Option<FormKey>,
    pub combat_style_id: Option<FormKey>,
    pub voice_type_id: Option<FormKey>,
    pub default_outfit_id: Option<FormKey>,
    pub location_id: Option<FormKey>,
    pub perk_ids: BTreeSet<FormKey>,
    pub form_list_ids: BTreeSet<FormKey>,
    pub template_id: Option<FormKey>,
    pub traits: NpcTraits,
    pub level: u16,
    pub skill_values: [u8; SKILL_COUNT],
    match_keys: BTreeSet<String>,
}

impl NpcFilterData {
    pub fn builder(form_key: FormKey) -> NpcFilterDataBuilder {
        NpcFilterDataBuilder::new(form_key)
    }

    /// Lower-cased strings that string filters compare against.
    pub fn match_keys(&self) -> &BTreeSet<String> {
        &self.match_keys
    }

    pub fn has_match_key(&self, value: &str) -> bool {
        self.match_keys.contains(&value.to_lowercase())
    }

    pub fn has_keyword(&self, editor_id: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| keyword.eq_ignore_ascii_case(editor_id))
    }

    pub fn faction_rank(&self, faction: &FormKey) -> Option<i32> {
        self.factions
            .iter()
            .find(|membership| &membership.faction == faction)
            .map(|membership| membership.rank)
    }

    /// Whether `id` is any record this NPC references directly.
    pub fn references(&self, id: &FormKey) -> bool {
        &self.form_key == id
            || self.race_id.as_ref() == Some(id)
            || self.class_id.as_ref() == Some(id)
            || self.combat_style_id.as_ref() == Some(id)
            || self.voice_type_id.as_ref() == Some(id)
            || self.default_outfit_id.as_ref() == Some(id)
            || self.location_id.as_ref() == Some(id)
            || self.template_id.as_ref() == Some(id)
            || self.keyword_ids.contains(id)
            || self.perk_ids.contains(id)
            || self.form_list_ids.contains(id)
            || self.faction_rank(id).is_some()
    }

    /// Copy of this snapshot with extra keywords merged in. Returns `None` when
    /// nothing new was added, so callers can detect a fixed point cheaply.
    pub fn with_granted_keywords<'a>(
        &self,
        grants: impl IntoIterator<Item = (&'a str, Option<&'a FormKey>)>,
    ) -> Option<Self> {
        let mut next = self.clone();
        let mut changed = false;

        for (editor_id, id) in grants {
            if !next.has_keyword(editor_id) {
                next.keywords.insert(editor_id.to_string());
                changed = true;
            }
            if let Some(id) = id {
                changed |= next.keyword_ids.insert(id.clone());
            }
        }

        if !changed {
            return None;
        }

        next.match_keys = compute_match_keys(&next);
        Some(next)
    }
}

fn compute_match_keys(npc: &NpcFilterData) -> BTreeSet<String> {
    npc.editor_id
        .iter()
        .chain(npc.name.iter())
        .chain(npc.keywords.iter())
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
        .collect()
}

pub struct NpcFilterDataBuilder {
    data: NpcFilterData,
}

impl NpcFilterDataBuilder {
    fn new(form_key: FormKey) -> Self {
        let source_mod = form_key.mod_key.clone();
        Self {
            data: NpcFilterData {
                form_key,
                editor_id: None,
                name: None,
                source_mod,
                keywords: BTreeSet::new(),
                keyword_ids: BTreeSet::new(),
                factions: Vec::new(),
                race_id: None,
                class_id: None,
                combat_style_id: None,
                voice_type_id: None,
                default_outfit_id: None,
                location_id: None,
                perk_ids: BTreeSet::new(),
                form_list_ids: BTreeSet::new(),
                template_id: None,
                traits: NpcTraits::default(),
                level: 1,
                skill_values: [0; SKILL_COUNT],
                match_keys: BTreeSet::new(),
            },
        }
    }

    pub fn editor_id(mut self, editor_id: impl Into<String>) -> Self {
        self.data.editor_id = Some(editor_id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.data.name = Some(name.into());
        self
    }

    /// Plugin that last overrides this NPC; defaults to the originating plugin.
    pub fn source_mod(mut self, source_mod: ModKey) -> Self {
        self.data.source_mod = source_mod;
        self
    }

    pub fn keyword(mut self, editor_id: impl Into<String>, id: Option<FormKey>) -> Self {
        self.data.keywords.insert(editor_id.into());
        if let Some(id) = id {
            self.data.keyword_ids.insert(id);
        }
        self
    }

    pub fn faction(mut self, faction: FormKey, rank: i32) -> Self {
        self.data.factions.push(FactionMembership { faction, rank });
        self
    }

    pub fn race(mut self, id: FormKey) -> Self {
        self.data.race_id = Some(id);
        self
    }

    pub fn class(mut self, id: FormKey) -> Self {
        self.data.class_id = Some(id);
        self
    }

    pub fn combat_style(mut self, id: FormKey) -> Self {
        self.data.combat_style_id = Some(id);
        self
    }

    pub fn voice_type(mut self, id: FormKey) -> Self {
        self.data.voice_type_id = Some(id);
        self
    }

    pub fn default_outfit(mut self, id: FormKey) -> Self {
        self.data.default_outfit_id = Some(id);
        self
    }

    pub fn location(mut self, id: FormKey) -> Self {
        self.data.location_id = Some(id);
        self
    }

    pub fn perk(mut self, id: FormKey) -> Self {
        self.data.perk_ids.insert(id);
        self
    }

    pub fn form_list(mut self, id: FormKey) -> Self {
        self.data.form_list_ids.insert(id);
        self
    }

    pub fn template(mut self, id: FormKey) -> Self {
        self.data.template_id = Some(id);
        self
    }

    pub fn traits(mut self, traits: NpcTraits) -> Self {
        self.data.traits = traits;
        self
    }

    pub fn level(mut self, level: u16) -> Self {
        self.data.level = level;
        self
    }

    /// Out-of-range indices are ignored.
    pub fn skill(mut self, index: usize, value: u8) -> Self {
        if let Some(slot) = self.data.skill_values.get_mut(index) {
            *slot = value;
        }
        self
    }

    pub fn build(mut self) -> NpcFilterData {
        self.data.match_keys = compute_match_keys(&self.data);
        self.data
    }
}
