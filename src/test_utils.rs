use crate::services::distribution::{parse_distribution_text, DistributionDialect, DistributionFile};
use crate::services::records::{
    FormKey, InMemoryRecordStore, ModKey, NpcFilterData, NpcTraits, RecordKind,
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
pub const BANDIT_ID: u32 = 0x1E7D5;
pub const LYDIA_ID: u32 = 0xA2C94;

pub const GUARD_OUTFIT: u32 = 0xD3E05;
pub const BANDIT_OUTFIT: u32 = 0xD3E06;
pub const ELITE_OUTFIT: u32 = 0xD3E07;

pub const WHITERUN_FACTION: u32 = 0x267EA;
pub const BANDIT_FACTION: u32 = 0x1BCC0;
pub const NPC_KEYWORD: u32 = 0x13794;

/// Small load order: a guard, a bandit and a unique housecarl.
pub fn fixture_store() -> InMemoryRecordStore {
    init_logger();
    let mut store = InMemoryRecordStore::new();

    store
        .add_mod(ModKey::new("Skyrim.esm"))
        .add_record(RecordKind::Outfit, skyrim(GUARD_OUTFIT), "GuardOutfit")
        .add_record(RecordKind::Outfit, skyrim(BANDIT_OUTFIT), "BanditOutfit")
        .add_record(RecordKind::Outfit, skyrim(ELITE_OUTFIT), "EliteOutfit")
        .add_record(RecordKind::Faction, skyrim(WHITERUN_FACTION), "CrimeFactionWhiterun")
        .add_record(RecordKind::Faction, skyrim(BANDIT_FACTION), "BanditFaction")
        .add_record(RecordKind::Keyword, skyrim(NPC_KEYWORD), "ActorTypeNPC");

    store
        .add_npc(
            NpcFilterData::builder(skyrim(GUARD_ID))
                .editor_id("WhiterunGuard")
                .name("Whiterun Guard")
                .keyword("ActorTypeNPC", Some(skyrim(NPC_KEYWORD)))
                .faction(skyrim(WHITERUN_FACTION), 1)
                .level(20)
                .build(),
        )
        .add_npc(
            NpcFilterData::builder(skyrim(BANDIT_ID))
                .editor_id("BanditMelee")
                .name("Bandit")
                .keyword("ActorTypeNPC", Some(skyrim(NPC_KEYWORD)))
                .faction(skyrim(BANDIT_FACTION), 0)
                .level(8)
                .build(),
        )
        .add_npc(
            NpcFilterData::builder(skyrim(LYDIA_ID))
                .editor_id("HousecarlWhiterun")
                .name("Lydia")
                .keyword("ActorTypeNPC", Some(skyrim(NPC_KEYWORD)))
                .faction(skyrim(WHITERUN_FACTION), 3)
                .traits(NpcTraits {
                    female: true,
                    unique: true,
                    ..NpcTraits::default()
                })
                .level(30)
                .build(),
        );

    store
}

pub fn spid_file(file_name: &str, text: &str) -> DistributionFile {
    parse_distribution_text(
        &Path::new("Data").join(file_name),
        file_name,
        DistributionDialect::Spid,
        text,
    )
}

pub fn skypatcher_file(file_name: &str, text: &str) -> DistributionFile {
    let relative = format!("SKSE/Plugins/SkyPatcher/npc/{file_name}");
    parse_distribution_text(
        &Path::new("Data").join(&relative),
        &relative,
        DistributionDialect::SkyPatcher,
        text,
    )
}
