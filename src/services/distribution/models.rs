//! Dialect-independent distribution model.
//!
//! Both SPID and SkyPatcher lines end up as a [`SpidDistributionFilter`]; the
//! matcher and resolver never look at the dialect again.

use crate::services::records::FormKey;
use crate::types::DistributionParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default (and maximum) chance when a line omits or garbles the chance cell.
pub const DEFAULT_CHANCE: u8 = 100;

/// Placeholder used by both dialects for an absent filter.
pub const NONE_TOKEN: &str = "NONE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DistributionDialect {
    Spid,
    SkyPatcher,
}

impl DistributionDialect {
    pub fn label(&self) -> &'static str {
        match self {
            DistributionDialect::Spid => "SPID",
            DistributionDialect::SkyPatcher => "SkyPatcher",
        }
    }

    /// Position of the dialect group in processing order. SkyPatcher patches
    /// records at load and SPID distributes on top of them, so SPID files come
    /// later and win.
    pub fn precedence(&self) -> u8 {
        match self {
            DistributionDialect::SkyPatcher => 0,
            DistributionDialect::Spid => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormType {
    Outfit,
    SleepOutfit,
    Keyword,
    Spell,
    Perk,
    Item,
    Shout,
    LevSpell,
    Package,
    Faction,
    DeathItem,
    Skin,
}

impl FormType {
    pub fn parse(token: &str) -> Option<Self> {
        let form_type = match token.trim().to_ascii_lowercase().as_str() {
            "outfit" => FormType::Outfit,
            "sleepoutfit" => FormType::SleepOutfit,
            "keyword" => FormType::Keyword,
            "spell" => FormType::Spell,
            "perk" => FormType::Perk,
            "item" => FormType::Item,
            "shout" => FormType::Shout,
            "levspell" => FormType::LevSpell,
            "package" => FormType::Package,
            "faction" => FormType::Faction,
            "deathitem" => FormType::DeathItem,
            "skin" => FormType::Skin,
            _ => return None,
        };
        Some(form_type)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::Outfit => "Outfit",
            FormType::SleepOutfit => "SleepOutfit",
            FormType::Keyword => "Keyword",
            FormType::Spell => "Spell",
            FormType::Perk => "Perk",
            FormType::Item => "Item",
            FormType::Shout => "Shout",
            FormType::LevSpell => "LevSpell",
            FormType::Package => "Package",
            FormType::Faction => "Faction",
            FormType::DeathItem => "DeathItem",
            FormType::Skin => "Skin",
        }
    }

    /// Only outfit and keyword lines feed the resolution engine.
    pub fn is_resolution_input(&self) -> bool {
        matches!(self, FormType::Outfit | FormType::Keyword)
    }
}

/// Inclusive numeric range used by faction ranks and level constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeFilter {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl RangeFilter {
    pub fn contains(&self, value: i32) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

impl fmt::Display for RangeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "{min}/{max}"),
            (Some(min), None) => write!(f, "{min}"),
            (None, Some(max)) => write!(f, "/{max}"),
            (None, None) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPart {
    pub value: String,
    pub is_negated: bool,
    pub resolved_form_id: Option<FormKey>,
    pub is_mod_file_ref: bool,
    /// Faction rank restriction written as `Faction(min/max)`.
    pub rank_range: Option<RangeFilter>,
    /// Compared against the NPC editor id alone (SkyPatcher `filterByEditorIdContains`).
    #[serde(default)]
    pub editor_id_only: bool,
}

impl FilterPart {
    pub fn new(value: impl Into<String>, is_negated: bool) -> Self {
        Self {
            value: value.into(),
            is_negated,
            resolved_form_id: None,
            is_mod_file_ref: false,
            rank_range: None,
            editor_id_only: false,
        }
    }

    /// Substring match on the editor id only.
    pub fn editor_id_contains(fragment: &str) -> Self {
        Self {
            editor_id_only: true,
            ..Self::new(format!("*{fragment}*"), false)
        }
    }

    pub fn has_wildcard(&self) -> bool {
        self.value.contains('*')
    }
}

impl fmt::Display for FilterPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negated {
            f.write_str("-")?;
        }
        f.write_str(&self.value)
    }
}

/// AND-combined parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterExpression {
    pub parts: Vec<FilterPart>,
}

/// OR-combined expressions, minus any global exclusion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSection {
    pub expressions: Vec<FilterExpression>,
    pub global_exclusions: Vec<FilterPart>,
}

impl FilterSection {
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty() && self.global_exclusions.is_empty()
    }

    pub fn parts(&self) -> impl Iterator<Item = &FilterPart> {
        self.expressions
            .iter()
            .flat_map(|expression| expression.parts.iter())
            .chain(self.global_exclusions.iter())
    }

    pub fn parts_mut(&mut self) -> impl Iterator<Item = &mut FilterPart> {
        self.expressions
            .iter_mut()
            .flat_map(|expression| expression.parts.iter_mut())
            .chain(self.global_exclusions.iter_mut())
    }
}

impl fmt::Display for FilterSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(NONE_TOKEN);
        }

        let groups: Vec<String> = self
            .expressions
            .iter()
            .map(|expression| {
                expression
                    .parts
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("+")
            })
            .chain(self.global_exclusions.iter().map(ToString::to_string))
            .collect();

        f.write_str(&groups.join(","))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitFilters {
    pub is_female: Option<bool>,
    pub is_unique: Option<bool>,
    pub is_summonable: Option<bool>,
    pub is_child: Option<bool>,
    pub is_leveled: Option<bool>,
    pub is_teammate: Option<bool>,
    pub is_dead: Option<bool>,
}

impl TraitFilters {
    pub fn is_empty(&self) -> bool {
        self.is_female.is_none()
            && self.is_unique.is_none()
            && self.is_summonable.is_none()
            && self.is_child.is_none()
            && self.is_leveled.is_none()
            && self.is_teammate.is_none()
            && self.is_dead.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelTarget {
    ActorLevel,
    Skill(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConstraint {
    pub target: LevelTarget,
    pub range: RangeFilter,
}

/// Level/skill cell. `raw` keeps the authored text for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelFilters {
    pub raw: String,
    pub constraints: Vec<LevelConstraint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpidDistributionFilter {
    pub form_type: FormType,
    pub form_identifier: String,
    pub resolved_form_id: Option<FormKey>,
    pub string_filters: FilterSection,
    pub form_filters: FilterSection,
    pub level_filters: Option<LevelFilters>,
    pub trait_filters: TraitFilters,
    pub count_or_package_idx: Option<String>,
    pub chance: u8,
    pub raw_line: String,
}

impl SpidDistributionFilter {
    pub fn new(form_type: FormType, form_identifier: impl Into<String>) -> Self {
        Self {
            form_type,
            form_identifier: form_identifier.into(),
            resolved_form_id: None,
            string_filters: FilterSection::default(),
            form_filters: FilterSection::default(),
            level_filters: None,
            trait_filters: TraitFilters::default(),
            count_or_package_idx: None,
            chance: DEFAULT_CHANCE,
            raw_line: String::new(),
        }
    }
}

/// One distribution parsed from a line; a SkyPatcher line may yield several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEntry {
    pub line_number: usize,
    pub filter: SpidDistributionFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    Blank,
    Comment,
    Section,
    KeyValue,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionLine {
    pub line_number: usize,
    pub raw_text: String,
    pub kind: LineKind,
    pub section_name: Option<String>,
    pub key: Option<String>,
    pub value: Option<String>,
    pub is_outfit_distribution: bool,
    pub referenced_outfit_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionFile {
    pub file_name: String,
    pub full_path: PathBuf,
    pub relative_path: String,
    pub dialect: DistributionDialect,
    pub lines: Vec<DistributionLine>,
    pub entries: Vec<DistributionEntry>,
    pub parse_errors: Vec<DistributionParseError>,
    pub outfit_distribution_count: usize,
}

impl DistributionFile {
    /// Entries the resolver consumes (outfits and keywords), in file order.
    pub fn resolution_entries(&self) -> impl Iterator<Item = &DistributionEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.filter.form_type.is_resolution_input())
    }

    /// Processing-order key: dialect group, then case-insensitive name and path.
    pub fn sort_key(&self) -> (u8, String, String) {
        (
            self.dialect.precedence(),
            self.file_name.to_lowercase(),
            self.full_path.to_string_lossy().to_lowercase(),
        )
    }
}
