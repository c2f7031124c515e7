#![allow(dead_code)]

use distrib_studio_lib::services::distribution::{
    parse_distribution_text, DistributionDialect, DistributionFile,
};
use distrib_studio_lib::services::records::{
    FormKey, InMemoryRecordStore, ModKey, NpcFilterData, RecordKind,
};
use std::path::Path;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub fn skyrim(id: u32) -> FormKey {
    FormKey::new("Skyrim.esm", id)
}

pub const GUARD_ID: u32 = 0x13BBF;
pub const CAPTAIN_ID: u32 = 0x13BC0;
pub const BANDIT_ID: u32 = 0x1E7D5;
pub const BANDIT_CHIEF_ID: u32 = 0x1E7D6;

pub const OUTFIT_1: u32 = 0xD3E05;
pub const OUTFIT_2: u32 = 0xD3E06;
pub const ELITE_OUTFIT: u32 = 0xD3E07;

pub const BANDIT_FACTION: u32 = 0x1BCC0;

/// Guards, a captain and two bandits; one bandit carries a `Bandit` keyword.
pub fn store() -> InMemoryRecordStore {
    init_logger();
    let mut store = InMemoryRecordStore::new();
    store
        .add_mod(ModKey::new("Skyrim.esm"))
        .add_record(RecordKind::Outfit, skyrim(OUTFIT_1), "Outfit1")
        .add_record(RecordKind::Outfit, skyrim(OUTFIT_2), "Outfit2")
        .add_record(RecordKind::Outfit, skyrim(ELITE_OUTFIT), "EliteOutfit")
        .add_record(RecordKind::Faction, skyrim(BANDIT_FACTION), "BanditFaction");

    let npcs = [
        (GUARD_ID, "WhiterunGuard", "Whiterun Guard", false, false),
        (CAPTAIN_ID, "GuardCaptain", "Guard Captain", false, false),
        (BANDIT_ID, "BanditMelee", "Bandit", true, true),
        (BANDIT_CHIEF_ID, "BanditChief", "Bandit Chief", true, false),
    ];
    for (id, editor_id, name, in_faction, bandit_keyword) in npcs {
        let mut builder = NpcFilterData::builder(skyrim(id))
            .editor_id(editor_id)
            .name(name)
            .keyword("ActorTypeNPC", None);
        if in_faction {
            builder = builder.faction(skyrim(BANDIT_FACTION), 0);
        }
        if bandit_keyword {
            builder = builder.keyword("Bandit", None);
        }
        store.add_npc(builder.build());
    }

    store
}

pub fn spid(file_name: &str, text: &str) -> DistributionFile {
    parse_distribution_text(
        &Path::new("Data").join(file_name),
        file_name,
        DistributionDialect::Spid,
        text,
    )
}

pub fn skypatcher(file_name: &str, text: &str) -> DistributionFile {
    let relative = format!("SKSE/Plugins/SkyPatcher/npc/{file_name}");
    parse_distribution_text(
        &Path::new("Data").join(&relative),
        &relative,
        DistributionDialect::SkyPatcher,
        text,
    )
}
