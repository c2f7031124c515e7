use crate::services::distribution::line::{parse_line, ParsedLine};
use crate::services::distribution::models::{DistributionDialect, FormType};

fn parse(text: &str) -> ParsedLine {
    parse_line(DistributionDialect::SkyPatcher, 1, text, None)
}

#[test]
fn npc_list_becomes_or_expressions() {
    let parsed = parse(
        "filterByNpcs=Skyrim.esm|13BBF,Skyrim.esm|13BC0:outfitDefault=Skyrim.esm|D3E05",
    );

    let filter = &parsed.entries[0].filter;
    assert_eq!(filter.form_type, FormType::Outfit);
    assert_eq!(filter.form_filters.expressions.len(), 2);
    assert!(filter
        .form_filters
        .expressions
        .iter()
        .all(|expression| expression.parts.len() == 1));
    assert!(parsed.line.is_outfit_distribution);
}

#[test]
fn and_keys_are_expanded_into_dnf() {
    let parsed = parse(
        "filterByFactions=Skyrim.esm|1,Skyrim.esm|2:filterByRaces=Skyrim.esm|A,Skyrim.esm|B:outfitDefault=Skyrim.esm|D3E05",
    );

    let section = &parsed.entries[0].filter.form_filters;
    // (F1 AND F2) AND (RA OR RB) → two expressions of three parts
    assert_eq!(section.expressions.len(), 2);
    assert!(section.expressions.iter().all(|e| e.parts.len() == 3));
}

#[test]
fn excluded_keys_become_global_exclusions() {
    let parsed = parse(
        "filterByFactionsOr=Skyrim.esm|1:filterByNpcsExcluded=Skyrim.esm|13BBF:outfitDefault=Skyrim.esm|D3E05",
    );

    let section = &parsed.entries[0].filter.form_filters;
    assert_eq!(section.global_exclusions.len(), 1);
    assert!(section.global_exclusions[0].is_negated);
}

#[test]
fn editor_id_contains_becomes_wildcard_string_filter() {
    let parsed = parse("filterByEditorIdContains=Guard:outfitDefault=Skyrim.esm|D3E05");

    let part = &parsed.entries[0].filter.string_filters.expressions[0].parts[0];
    assert_eq!(part.value, "*Guard*");
    assert!(part.has_wildcard());
    assert!(part.editor_id_only);
}

#[test]
fn gender_level_and_chance_map_to_shared_slots() {
    let parsed = parse(
        "filterByGender=female:filterByLevelMin=10:filterByLevelMax=30:chance=40:outfitDefault=Skyrim.esm|D3E05",
    );

    let filter = &parsed.entries[0].filter;
    assert_eq!(filter.trait_filters.is_female, Some(true));
    let level = filter.level_filters.as_ref().unwrap();
    assert_eq!(level.constraints[0].range.min, Some(10));
    assert_eq!(level.constraints[0].range.max, Some(30));
    assert_eq!(filter.chance, 40);
}

#[test]
fn keywords_to_add_yields_one_entry_per_keyword() {
    let parsed = parse("filterByFactions=Skyrim.esm|1:keywordsToAdd=VK_A,VK_B");

    assert_eq!(parsed.entries.len(), 2);
    assert!(parsed
        .entries
        .iter()
        .all(|entry| entry.filter.form_type == FormType::Keyword));
    assert!(!parsed.line.is_outfit_distribution);
}

#[test]
fn line_without_distribution_is_structural_only() {
    let parsed = parse("filterByNpcs=Skyrim.esm|13BBF:setLevel=10");

    assert!(parsed.entries.is_empty());
    assert!(parsed.errors.is_empty());
}

#[test]
fn malformed_clauses_are_reported() {
    for case in [
        "filterByNpcs=Skyrim.esm|13BBF:outfitDefault",
        "filterByNpcs=:outfitDefault=Skyrim.esm|D3E05",
        "filterByGender=other:outfitDefault=Skyrim.esm|D3E05",
        "filterByLevelMin=high:outfitDefault=Skyrim.esm|D3E05",
    ] {
        let parsed = parse(case);
        assert!(parsed.entries.is_empty(), "{case}");
        assert_eq!(parsed.errors.len(), 1, "{case}");
    }
}
