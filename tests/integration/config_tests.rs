use notedupe::config::{Config, ConfigError, DEFAULT_SIMILARITY_THRESHOLD};
use notedupe::duplicates::{DuplicateFinder, FinderError, NumberedMatch, Strategy};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_load_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notedupe.toml");
    fs::write(
        &path,
        r#"
strategy = "largest"
similarity_threshold = 0.5
exclude_patterns = ["Templates*"]
numbered_match = "filename"
io_threads = 2
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.strategy, Strategy::KeepLargest);
    assert!((config.similarity_threshold - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.exclude_patterns, vec!["Templates*"]);
    assert_eq!(config.numbered_match, NumberedMatch::RawFilename);
    assert_eq!(config.io_threads, 2);
    // Unset keys keep their defaults.
    assert!(!config.interactive_mode);
    assert_eq!(config.oracle_command, "fzf");
}

#[test]
fn test_load_from_missing_file_is_error() {
    let dir = tempdir().unwrap();
    assert!(Config::load_from(&dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_load_from_malformed_file_is_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "strategy = \"oldest\"\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to load config"));
}

#[test]
fn test_round_trip_through_toml() {
    let config = Config::default()
        .with_strategy(Strategy::KeepMostRecentCommit)
        .with_exclude_patterns(vec!["*.excalidraw.md".to_string()]);

    let rendered = config.to_toml().unwrap();
    assert!(rendered.contains("strategy = \"most-recent-commit\""));
    assert_eq!(Config::from_toml_str(&rendered).unwrap(), config);
}

#[test]
fn test_out_of_range_threshold_rejected_before_scan() {
    let config = Config::from_toml_str("similarity_threshold = 1.2").unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidThreshold(_))
    ));

    let dir = tempdir().unwrap();
    let err = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap_err();
    assert!(matches!(err, FinderError::InvalidConfig(_)));
}

#[test]
fn test_bad_pattern_rejected() {
    let config = Config::default().with_exclude_patterns(vec!["[unclosed".to_string()]);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidPattern { .. })
    ));
}

#[test]
fn test_defaults() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.strategy, Strategy::KeepNewest);
    assert!((config.similarity_threshold - DEFAULT_SIMILARITY_THRESHOLD).abs() < f64::EPSILON);
    assert_eq!(config.extension(), "md");
    assert_eq!(config.preview_lines, 3);
}
