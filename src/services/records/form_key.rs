//! Stable record identifiers: a plugin name plus a local form id.
//!
//! Plugin names compare case-insensitively (the game treats `Skyrim.esm` and
//! `skyrim.esm` as the same file) but keep their authored spelling for display.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

/// Local ids are 24 bits; the top byte is the runtime load-order index.
const LOCAL_ID_MASK: u32 = 0x00FF_FFFF;

static PLUGIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[^|~:]+\.(esp|esm|esl)$").expect("valid plugin regex"));
static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:0[xX])?([0-9A-Fa-f]{1,8})$").expect("valid hex regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModKey(String);

impl ModKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    /// Parse a bare plugin reference such as `Skyrim.esm`.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        PLUGIN_RE.is_match(token).then(|| Self::new(token))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    fn normalized(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl PartialEq for ModKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for ModKey {}

impl Hash for ModKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl PartialOrd for ModKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized().cmp(&other.normalized())
    }
}

impl fmt::Display for ModKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormKey {
    pub mod_key: ModKey,
    pub local_id: u32,
}

impl FormKey {
    pub fn new(mod_name: impl Into<String>, local_id: u32) -> Self {
        Self {
            mod_key: ModKey::new(mod_name),
            local_id: local_id & LOCAL_ID_MASK,
        }
    }

    /// Parse any of the identifier spellings found in distribution files:
    /// `0x800~Mod.esp`, `800~Mod.esp`, `Mod.esp|800`, `Mod.esp|0x800`, `000800:Mod.esp`.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();

        if let Some((id, plugin)) = token.split_once('~') {
            return Self::from_parts(plugin, id);
        }
        if let Some((plugin, id)) = token.split_once('|') {
            return Self::from_parts(plugin, id);
        }
        if let Some((id, plugin)) = token.split_once(':') {
            return Self::from_parts(plugin, id);
        }

        None
    }

    fn from_parts(plugin: &str, id: &str) -> Option<Self> {
        let mod_key = ModKey::parse(plugin)?;
        let caps = HEX_RE.captures(id.trim())?;
        let local_id = u32::from_str_radix(&caps[1], 16).ok()?;
        Some(Self {
            mod_key,
            local_id: local_id & LOCAL_ID_MASK,
        })
    }

    /// SPID spelling (`0x800~Mod.esp`).
    pub fn to_spid_string(&self) -> String {
        format!("0x{:X}~{}", self.local_id, self.mod_key)
    }

    /// SkyPatcher spelling (`Mod.esp|800`).
    pub fn to_skypatcher_string(&self) -> String {
        format!("{}|{:X}", self.mod_key, self.local_id)
    }
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}:{}", self.local_id, self.mod_key)
    }
}
