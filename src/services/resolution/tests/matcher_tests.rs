use super::*;
use crate::services::distribution::{parse_line, DistributionDialect};
use crate::services::records::{FormKey, RecordStore};
use crate::services::resolution::references::resolve_filter_references;
use crate::test_utils::*;

fn resolved(line: &str) -> SpidDistributionFilter {
    resolved_in(DistributionDialect::Spid, line)
}

fn resolved_in(dialect: DistributionDialect, line: &str) -> SpidDistributionFilter {
    let store = fixture_store();
    let filter = parse_line(dialect, 1, line, None)
        .entries
        .into_iter()
        .next()
        .expect("line should parse")
        .filter;
    resolve_filter_references(&filter, &store, &store.load_order_mod_keys()).0
}

fn matching_ids(line: &str) -> Vec<FormKey> {
    matching_ids_in(DistributionDialect::Spid, line)
}

fn matching_ids_in(dialect: DistributionDialect, line: &str) -> Vec<FormKey> {
    let filter = resolved_in(dialect, line);
    let mut ids: Vec<FormKey> = fixture_store()
        .all_npcs()
        .into_iter()
        .filter(|npc| matches_filter(npc, &filter))
        .map(|npc| npc.form_key)
        .collect();
    ids.sort();
    ids
}

fn ids(raw: &[u32]) -> Vec<FormKey> {
    let mut ids: Vec<FormKey> = raw.iter().map(|id| skyrim(*id)).collect();
    ids.sort();
    ids
}

// ─── Wildcards ───────────────────────────────────────────────────────────────

#[test]
fn wildcard_anchoring() {
    assert!(wildcard_matches("*guard", "whiterunguard"));
    assert!(!wildcard_matches("*guard", "guardcaptain"));
    assert!(wildcard_matches("guard*", "guardcaptain"));
    assert!(!wildcard_matches("guard*", "whiterunguard"));
    assert!(wildcard_matches("*ard*cap*", "guardcaptain"));
    assert!(wildcard_matches("a*b", "ab"));
    assert!(!wildcard_matches("ab*b", "ab"));
    assert!(wildcard_matches("*", ""));
}

#[test]
fn wildcard_string_filter_matches_editor_id_suffix() {
    assert_eq!(matching_ids("Outfit = GuardOutfit|*Guard"), ids(&[GUARD_ID]));
}

#[test]
fn exact_string_filter_matches_name_or_keyword() {
    assert_eq!(matching_ids("Outfit = GuardOutfit|Lydia"), ids(&[LYDIA_ID]));
    assert_eq!(
        matching_ids("Outfit = GuardOutfit|actortypenpc"),
        ids(&[GUARD_ID, BANDIT_ID, LYDIA_ID])
    );
}

#[test]
fn editor_id_contains_ignores_names_and_keywords() {
    let skypatcher = |filter: &str| {
        matching_ids_in(
            DistributionDialect::SkyPatcher,
            &format!("filterByEditorIdContains={filter}:outfitDefault=Skyrim.esm|D3E05"),
        )
    };

    // Only the ActorTypeNPC keyword and the "Whiterun Guard" name contain these.
    assert!(skypatcher("ActorType").is_empty());
    assert!(skypatcher("n Gu").is_empty());
    assert_eq!(skypatcher("guard"), ids(&[GUARD_ID]));
    assert_eq!(skypatcher("Whiterun"), ids(&[GUARD_ID, LYDIA_ID]));
}

// ─── Boolean structure ───────────────────────────────────────────────────────

#[test]
fn global_exclusion_rejects_matching_npc() {
    assert_eq!(
        matching_ids("Outfit = GuardOutfit|ActorTypeNPC,-Bandit"),
        ids(&[GUARD_ID, LYDIA_ID])
    );
}

#[test]
fn leading_negated_group_is_an_alternative_not_an_exclusion() {
    assert_eq!(
        matching_ids("Outfit = GuardOutfit|-Bandit,ActorTypeNPC"),
        ids(&[GUARD_ID, BANDIT_ID, LYDIA_ID])
    );
}

#[test]
fn and_parts_must_all_hold() {
    assert_eq!(
        matching_ids("Outfit = GuardOutfit|ActorTypeNPC+Bandit"),
        ids(&[BANDIT_ID])
    );
    assert_eq!(
        matching_ids("Outfit = GuardOutfit|ActorTypeNPC+-Bandit"),
        ids(&[GUARD_ID, LYDIA_ID])
    );
}

#[test]
fn or_expressions_union() {
    assert_eq!(
        matching_ids("Outfit = GuardOutfit|Lydia,Bandit"),
        ids(&[BANDIT_ID, LYDIA_ID])
    );
}

#[test]
fn empty_filter_matches_everyone_regardless_of_chance() {
    assert_eq!(
        matching_ids("Outfit = GuardOutfit|NONE|NONE|NONE|NONE|NONE|0"),
        ids(&[GUARD_ID, BANDIT_ID, LYDIA_ID])
    );
}

// ─── Form filters ────────────────────────────────────────────────────────────

#[test]
fn faction_form_filter_and_rank_range() {
    assert_eq!(
        matching_ids("Outfit = GuardOutfit|NONE|CrimeFactionWhiterun"),
        ids(&[GUARD_ID, LYDIA_ID])
    );
    assert_eq!(
        matching_ids("Outfit = GuardOutfit|NONE|CrimeFactionWhiterun(2/3)"),
        ids(&[LYDIA_ID])
    );
}

#[test]
fn explicit_form_key_and_plugin_filters() {
    assert_eq!(
        matching_ids("Outfit = GuardOutfit|NONE|0x13BBF~Skyrim.esm"),
        ids(&[GUARD_ID])
    );
    assert_eq!(
        matching_ids("Outfit = GuardOutfit|NONE|Skyrim.esm"),
        ids(&[GUARD_ID, BANDIT_ID, LYDIA_ID])
    );
}

#[test]
fn unresolved_part_never_matches() {
    assert!(matching_ids("Outfit = GuardOutfit|NONE|MissingFaction").is_empty());
    assert!(matching_ids("Outfit = GuardOutfit|NONE|Missing.esp").is_empty());
    // Excluding something that does not exist excludes nobody.
    assert_eq!(
        matching_ids("Outfit = GuardOutfit|NONE|-MissingFaction"),
        ids(&[GUARD_ID, BANDIT_ID, LYDIA_ID])
    );
}

// ─── Levels & traits ─────────────────────────────────────────────────────────

#[test]
fn level_range_is_inclusive() {
    assert_eq!(
        matching_ids("Outfit = GuardOutfit|NONE|NONE|8/20"),
        ids(&[GUARD_ID, BANDIT_ID])
    );
    assert_eq!(matching_ids("Outfit = GuardOutfit|NONE|NONE|25"), ids(&[LYDIA_ID]));
}

#[test]
fn skill_constraint_reads_skill_values() {
    let npc = NpcFilterData::builder(skyrim(0x900))
        .editor_id("Archer")
        .skill(8, 60)
        .build();

    assert!(matches_filter(&npc, &resolved("Outfit = GuardOutfit|NONE|NONE|8(50/70)")));
    assert!(!matches_filter(&npc, &resolved("Outfit = GuardOutfit|NONE|NONE|8(61)")));
}

#[test]
fn trait_flags_must_equal_npc_booleans() {
    assert_eq!(matching_ids("Outfit = GuardOutfit|NONE|NONE|NONE|F/U"), ids(&[LYDIA_ID]));
    assert_eq!(
        matching_ids("Outfit = GuardOutfit|NONE|NONE|NONE|-U"),
        ids(&[GUARD_ID, BANDIT_ID])
    );
}
