use filetime::{set_file_mtime, FileTime};
use notedupe::config::Config;
use notedupe::duplicates::{select, DuplicateFinder, FinderError, NumberedMatch, Strategy};
use notedupe::scanner::ScanError;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const T: i64 = 1_700_000_000;

fn write_with_mtime(dir: &Path, name: &str, content: &[u8], secs: i64) {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(secs, 0)).unwrap();
}

fn names(group: &notedupe::duplicates::DuplicateGroup) -> Vec<String> {
    group.members().iter().map(|m| m.file_name()).collect()
}

#[test]
fn test_meeting_notes_end_to_end() {
    let dir = tempdir().unwrap();
    write_with_mtime(dir.path(), "Meeting Notes.md", &[b'a'; 500], T);
    write_with_mtime(dir.path(), "Meeting Notes 2.md", &[b'a'; 500], T + 60);
    write_with_mtime(dir.path(), "Ideas.md", b"unrelated", T);

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.total_files, 3);
    assert_eq!(report.groups.len(), 1);

    let group = &report.groups[0];
    assert_eq!(names(group), vec!["Meeting Notes 2.md", "Meeting Notes.md"]);
    assert!(group.all_identical());
    assert!(!names(group).contains(&"Ideas.md".to_string()));

    let kept = select(group, Strategy::KeepNewest).unwrap();
    assert_eq!(kept.file_name(), "Meeting Notes 2.md");
    assert_eq!(kept.modified_secs(), T + 60);
    assert_eq!(kept.size(), 500);
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.total_files, 0);
    assert!(report.groups.is_empty());
    assert_eq!(report.stats.groups_formed, 0);
}

#[test]
fn test_identical_content_unrelated_names_not_grouped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Alpha.md"), "same body").unwrap();
    fs::write(dir.path().join("Beta.md"), "same body").unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.total_files, 2);
    assert!(report.groups.is_empty());
    assert_eq!(report.stats.eliminated_unique, 2);
}

#[test]
fn test_different_content_same_name_grouped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Todo.md"), "- milk").unwrap();
    fs::write(dir.path().join("todo 3.md"), "- eggs\n- flour").unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    assert!(!report.groups[0].all_identical());
}

#[test]
fn test_scan_is_not_recursive() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("archive");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("Notes.md"), "a").unwrap();
    fs::write(sub.join("Notes.md"), "a").unwrap();
    fs::write(sub.join("Notes 2.md"), "a").unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.total_files, 1);
    assert!(report.groups.is_empty());
}

#[test]
fn test_hidden_and_foreign_files_ignored() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Notes.md"), "a").unwrap();
    fs::write(dir.path().join(".Notes 2.md"), "a").unwrap();
    fs::write(dir.path().join("Notes 3.txt"), "a").unwrap();
    fs::write(dir.path().join("Notes 4.MD"), "a").unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.total_files, 1);
    assert!(report.groups.is_empty());
}

#[test]
fn test_exclude_patterns() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Daily.md"), "a").unwrap();
    fs::write(dir.path().join("Daily 2.md"), "a").unwrap();
    fs::write(dir.path().join("Daily 3.md"), "a").unwrap();

    let config = Config::default().with_exclude_patterns(vec!["* 2.md".to_string()]);
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.total_files, 2);
    assert_eq!(names(&report.groups[0]), vec!["Daily 3.md", "Daily.md"]);
}

#[test]
fn test_exclude_patterns_are_plain_globs() {
    let dir = tempdir().unwrap();
    for name in ["#draft.md", "#draft 2.md", "!wip.md", "!wip 2.md"] {
        fs::write(dir.path().join(name), "a").unwrap();
    }

    let config = Config::default().with_exclude_patterns(vec!["#draft*".to_string()]);
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(report.total_files, 2);
    assert_eq!(names(&report.groups[0]), vec!["!wip 2.md", "!wip.md"]);

    let config = Config::default().with_exclude_patterns(vec!["!wip*".to_string()]);
    let report = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(report.total_files, 2);
    assert_eq!(report.groups.len(), 1);
}

#[test]
fn test_numbered_match_filename_mode() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Status 2.md"), "a").unwrap();
    fs::write(dir.path().join("Status b.md"), "b").unwrap();

    let by_key = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert!(by_key.groups.is_empty());

    let config = Config::default().with_numbered_match(NumberedMatch::RawFilename);
    let by_name = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(by_name.groups.len(), 1);
    assert_eq!(by_name.stats.numbered_matches, 1);
}

#[test]
fn test_sequential_and_parallel_agree() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        fs::write(dir.path().join(format!("Note {i}.md")), format!("body {i}")).unwrap();
        fs::write(dir.path().join(format!("Other{i}x.md")), "x").unwrap();
    }

    let seq = DuplicateFinder::new(Config::default().with_io_threads(1))
        .find_duplicates(dir.path())
        .unwrap();
    let par = DuplicateFinder::new(Config::default().with_io_threads(8))
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(seq.groups, par.groups);
    assert_eq!(seq.groups.len(), 1);
    assert_eq!(seq.groups[0].len(), 20);
}

#[test]
fn test_missing_directory_is_error() {
    let dir = tempdir().unwrap();
    let err = DuplicateFinder::with_defaults()
        .find_duplicates(&dir.path().join("nope"))
        .unwrap_err();

    assert!(matches!(
        err,
        FinderError::Scan(ScanError::DirectoryUnreadable { .. })
    ));
}

#[test]
fn test_file_as_directory_is_error() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("Notes.md");
    fs::write(&file, "a").unwrap();

    let err = DuplicateFinder::with_defaults()
        .find_duplicates(&file)
        .unwrap_err();

    assert!(matches!(err, FinderError::Scan(ScanError::NotADirectory(_))));
}

#[cfg(unix)]
#[test]
fn test_unlistable_directory_is_error() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("Notes.md"), "a").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = DuplicateFinder::with_defaults().find_duplicates(&locked);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(
        result,
        Err(FinderError::Scan(ScanError::DirectoryUnreadable { .. }))
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_kept_with_sentinel() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Notes.md"), "a").unwrap();
    let secret = dir.path().join("Notes 2.md");
    fs::write(&secret, "b").unwrap();
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read(&secret).is_ok() {
        return;
    }

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(report.total_files, 2);
    assert_eq!(report.unreadable_files, 1);
    assert!(report.has_file_errors());
    let sentinel = report.groups[0]
        .members()
        .iter()
        .find(|m| m.file_name() == "Notes 2.md")
        .unwrap();
    assert!(sentinel.has_sentinel_digest());
}
