use notedupe::duplicates::DuplicateFinder;
use notedupe::error::ExitCode;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_composed_and_decomposed_names_group() {
    let dir = tempdir().unwrap();
    // "Café" precomposed, and with a combining acute accent.
    fs::write(dir.path().join("Caf\u{e9}.md"), "a").unwrap();
    fs::write(dir.path().join("Cafe\u{301} 2.md"), "a").unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].anchor_key(), "caf\u{e9}");
}

#[test]
fn test_punctuation_and_case_ignored() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Q&A (draft).md"), "a").unwrap();
    fs::write(dir.path().join("qa draft.md"), "b").unwrap();
    fs::write(dir.path().join("QA DRAFT 12.md"), "c").unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].len(), 3);
}

#[test]
fn test_name_that_is_only_an_extension() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("2.md"), "a").unwrap();
    fs::write(dir.path().join("3.md"), "b").unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    // Both normalize to the empty key.
    assert_eq!(report.total_files, 2);
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].anchor_key(), "");
}

#[cfg(unix)]
#[test]
fn test_symlinked_copy_is_cataloged() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("Notes.md");
    fs::write(&target, "a").unwrap();
    std::os::unix::fs::symlink(&target, dir.path().join("Notes 2.md")).unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.total_files, 2);
    assert_eq!(report.groups.len(), 1);
    assert!(report.groups[0].all_identical());
}

#[cfg(unix)]
#[test]
fn test_dangling_link_makes_partial_result() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Notes.md"), "a").unwrap();
    fs::write(dir.path().join("Notes 2.md"), "a").unwrap();
    std::os::unix::fs::symlink(dir.path().join("missing.md"), dir.path().join("Notes 3.md"))
        .unwrap();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.total_files, 2);
    assert_eq!(report.skipped_files, 1);
    assert_eq!(ExitCode::for_report(&report), ExitCode::PartialSuccess);
}
