use filetime::{set_file_mtime, FileTime};
use notedupe::config::Config;
use notedupe::duplicates::{DuplicateFinder, ResolutionMethod, Resolver, Strategy};
use notedupe::oracle::{OracleError, SelectionOracle};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const T: i64 = 1_700_000_000;
const SYNC: &str = "# Sync\n- agenda\n- actions\n- notes\n";

/// Picks the candidate line whose path ends with `suffix`.
struct PickSuffix {
    suffix: Option<&'static str>,
    shown: RefCell<Vec<Vec<String>>>,
}

impl PickSuffix {
    fn new(suffix: Option<&'static str>) -> Self {
        Self {
            suffix,
            shown: RefCell::new(Vec::new()),
        }
    }
}

impl SelectionOracle for PickSuffix {
    fn choose(&self, lines: &[String]) -> Result<Option<String>, OracleError> {
        self.shown.borrow_mut().push(lines.to_vec());
        Ok(self.suffix.and_then(|s| {
            lines
                .iter()
                .find(|l| l.split('|').next().is_some_and(|p| p.ends_with(s)))
                .cloned()
        }))
    }
}

/// Always fails the way a missing chooser would.
struct Missing;

impl SelectionOracle for Missing {
    fn choose(&self, _lines: &[String]) -> Result<Option<String>, OracleError> {
        Err(OracleError::Unavailable {
            program: "fzf".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }
}

fn write_with_mtime(dir: &Path, name: &str, content: &str, secs: i64) {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(secs, 0)).unwrap();
}

fn vault() -> TempDir {
    let dir = tempdir().unwrap();
    write_with_mtime(dir.path(), "Meeting Notes.md", SYNC, T);
    write_with_mtime(dir.path(), "Meeting Notes 2.md", SYNC, T + 60);
    write_with_mtime(
        dir.path(),
        "meeting notes 3.md",
        "# Sync\n- agenda\n- actions\n- notes\n- follow-up from Tuesday\n",
        T + 30,
    );
    write_with_mtime(dir.path(), "Ideas.md", "nothing to see", T);
    dir
}

#[test]
fn test_resolve_keep_newest() {
    let dir = vault();
    let config = Config::default();
    let report = DuplicateFinder::new(config.clone())
        .find_duplicates(dir.path())
        .unwrap();

    let plan = Resolver::new(&config, PickSuffix::new(None)).resolve(&report);

    assert_eq!(plan.resolutions.len(), 1);
    let resolution = &plan.resolutions[0];
    assert_eq!(resolution.kept, Some(dir.path().join("Meeting Notes 2.md")));
    assert_eq!(resolution.method, ResolutionMethod::Automatic(Strategy::KeepNewest));
    assert_eq!(resolution.discard.len(), 2);
    // Four of five lines match positionally: 0.8 is under the 0.85 default.
    assert_eq!(plan.review_count(), 1);
    assert_eq!(
        resolution.diverged().next().unwrap().path,
        dir.path().join("meeting notes 3.md")
    );
}

#[test]
fn test_resolve_keep_largest() {
    let dir = vault();
    let config = Config::default().with_strategy(Strategy::KeepLargest);
    let report = DuplicateFinder::new(config.clone())
        .find_duplicates(dir.path())
        .unwrap();

    let plan = Resolver::new(&config, PickSuffix::new(None)).resolve(&report);
    let resolution = &plan.resolutions[0];

    assert_eq!(resolution.kept, Some(dir.path().join("meeting notes 3.md")));
    // The longer copy is kept; both shorter copies are 0.8 similar.
    assert_eq!(resolution.diverged().count(), 2);
}

#[test]
fn test_resolve_with_oracle() {
    let dir = vault();
    let config = Config::default().with_interactive(true);
    let report = DuplicateFinder::new(config.clone())
        .find_duplicates(dir.path())
        .unwrap();
    let oracle = PickSuffix::new(Some("Meeting Notes.md"));

    let plan = Resolver::new(&config, &oracle).resolve(&report);
    let resolution = &plan.resolutions[0];

    assert_eq!(resolution.kept, Some(dir.path().join("Meeting Notes.md")));
    assert_eq!(resolution.method, ResolutionMethod::Oracle);

    let shown = oracle.shown.borrow();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].len(), 3);
    let line = shown[0]
        .iter()
        .find(|l| l.contains("Meeting Notes 2.md"))
        .unwrap();
    assert!(line.ends_with(&format!("|{}|34|# Sync|- agenda|- actions", T + 60)));
}

#[test]
fn test_missing_oracle_falls_back() {
    let dir = vault();
    let config = Config::default().with_interactive(true);
    let report = DuplicateFinder::new(config.clone())
        .find_duplicates(dir.path())
        .unwrap();

    let plan = Resolver::new(&config, Missing).resolve(&report);

    assert_eq!(
        plan.resolutions[0].method,
        ResolutionMethod::Fallback(Strategy::KeepNewest)
    );
    assert_eq!(
        plan.resolutions[0].kept,
        Some(dir.path().join("Meeting Notes 2.md"))
    );
}

#[test]
fn test_manual_strategy_unresolved_without_oracle() {
    let dir = vault();
    let config = Config::default()
        .with_interactive(true)
        .with_strategy(Strategy::KeepManualSelect);
    let report = DuplicateFinder::new(config.clone())
        .find_duplicates(dir.path())
        .unwrap();

    let plan = Resolver::new(&config, Missing).resolve(&report);

    assert_eq!(plan.unresolved_count(), 1);
    assert!(plan.discard_paths().is_empty());
}

#[test]
fn test_plan_never_touches_files() {
    let dir = vault();
    let config = Config::default().with_dry_run(true);
    let report = DuplicateFinder::new(config.clone())
        .find_duplicates(dir.path())
        .unwrap();

    let plan = Resolver::new(&config, PickSuffix::new(None)).resolve(&report);

    assert!(plan.dry_run);
    for path in plan.discard_paths() {
        assert!(path.exists(), "{} should still exist", path.display());
    }
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 4);
}
