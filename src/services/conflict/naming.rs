//! File names that move a candidate to the end of its dialect group.

/// Extra `Z`s tried beyond the initial guess before giving up.
const MAX_EXTRA_PREFIX: usize = 64;

/// Drop a leading sort prefix: two or more identical letters followed by `_`
/// (`AAA_MyOutfits.ini` → `MyOutfits.ini`).
pub fn strip_sort_prefix(file_name: &str) -> &str {
    let mut chars = file_name.char_indices();
    let Some((_, first)) = chars.next() else {
        return file_name;
    };
    if !first.is_ascii_alphabetic() {
        return file_name;
    }

    let mut run = 1;
    for (idx, ch) in chars {
        if ch.eq_ignore_ascii_case(&first) {
            run += 1;
            continue;
        }
        if ch == '_' && run >= 2 && idx + 1 < file_name.len() {
            return &file_name[idx + 1..];
        }
        break;
    }
    file_name
}

fn leading_z_run(file_name: &str) -> usize {
    file_name
        .chars()
        .take_while(|ch| ch.eq_ignore_ascii_case(&'z'))
        .count()
}

/// `Z…Z_<base>` with three more `Z`s than the longest run in the group, grown
/// until it sorts after every name in the group (case-insensitive).
pub fn suggest_winning_file_name<'a>(
    candidate: &str,
    group: impl IntoIterator<Item = &'a str>,
) -> String {
    let group: Vec<String> = group.into_iter().map(str::to_lowercase).collect();
    let base = strip_sort_prefix(candidate);
    let start = group.iter().map(|name| leading_z_run(name)).max().unwrap_or(0) + 3;

    let mut suggestion = format!("{}_{}", "Z".repeat(start), base);
    for count in start..=start + MAX_EXTRA_PREFIX {
        suggestion = format!("{}_{}", "Z".repeat(count), base);
        let key = suggestion.to_lowercase();
        if group.iter().all(|existing| key > *existing) {
            return suggestion;
        }
    }

    log::warn!("No Z prefix sorts '{candidate}' after its group; using '{suggestion}'");
    suggestion
}

#[cfg(test)]
#[path = "tests/naming_tests.rs"]
mod tests;
