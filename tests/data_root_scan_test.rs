mod common;

use common::*;
use distrib_studio_lib::services::config::ResolverSettings;
use distrib_studio_lib::services::conflict::detect_conflicts_for_text;
use distrib_studio_lib::services::distribution::{scan_distribution_files, ScanStatus};
use distrib_studio_lib::services::resolution::resolve_outfits;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn data_root() -> TempDir {
    let tmp = TempDir::new().unwrap();
    // BOM-prefixed SPID file.
    let mut guards = vec![0xEF, 0xBB, 0xBF];
    guards.extend_from_slice(b"; guards\nOutfit = Outfit1|*Guard\n");
    write(tmp.path(), "Guards_DISTR.ini", &guards);
    write(
        tmp.path(),
        "SKSE/Plugins/SkyPatcher/npc/Bandits/bandits.ini",
        b"filterByFactions=Skyrim.esm|1BCC0:outfitDefault=Skyrim.esm|D3E06\n",
    );
    write(tmp.path(), "Broken_DISTR.ini", b"Outfit = |oops\nOutfit = Outfit2|GuardCaptain\n");
    tmp
}

#[tokio::test]
async fn scanned_root_resolves_end_to_end() {
    let tmp = data_root();
    let store = store();
    let settings = ResolverSettings::default();

    let outcome = scan_distribution_files(
        tmp.path().to_path_buf(),
        settings.clone(),
        Arc::new(AtomicBool::new(false)),
        None,
    )
    .await
    .unwrap();

    assert_eq!(outcome.status, ScanStatus::Completed);
    assert_eq!(outcome.files.len(), 3);
    let parse_errors: usize = outcome.files.iter().map(|f| f.parse_errors.len()).sum();
    assert_eq!(parse_errors, 1);

    let report = resolve_outfits(&outcome.files, &store, &settings).unwrap();

    let guard = report.assignment_for(&skyrim(GUARD_ID)).unwrap();
    assert_eq!(guard.final_outfit_id, Some(skyrim(OUTFIT_1)));
    let captain = report.assignment_for(&skyrim(CAPTAIN_ID)).unwrap();
    assert_eq!(captain.final_outfit_id, Some(skyrim(OUTFIT_2)));
    let bandit = report.assignment_for(&skyrim(BANDIT_ID)).unwrap();
    assert_eq!(bandit.final_outfit_id, Some(skyrim(OUTFIT_2)));
    assert_eq!(report.assignments.len(), 4);
}

#[test]
fn unsaved_candidate_is_checked_against_scanned_root() {
    let tmp = data_root();
    let store = store();

    let result = detect_conflicts_for_text(
        "AA_Mine_DISTR.ini",
        "Outfit = EliteOutfit|WhiterunGuard\n",
        tmp.path(),
        &store,
        &ResolverSettings::default(),
    )
    .unwrap();

    assert!(result.has_conflicts);
    assert!(!result.resolved_by_filename);
    assert_eq!(result.conflicts[0].existing_file_name, "Guards_DISTR.ini");
    assert_eq!(
        result.suggested_file_name.as_deref(),
        Some("ZZZ_Mine_DISTR.ini")
    );
}
