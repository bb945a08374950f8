use notedupe::config::Config;
use notedupe::duplicates::{DuplicateFinder, Resolver};
use notedupe::error::ExitCode;
use notedupe::oracle::FzfOracle;
use notedupe::output::{CsvOutput, CsvPlanOutput, JsonOutput, JsonPlanOutput};
use std::fs;
use tempfile::tempdir;

fn scanned() -> (tempfile::TempDir, notedupe::duplicates::Report) {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Recipe.md"), "flour\nwater\n").unwrap();
    fs::write(dir.path().join("Recipe 2.md"), "flour\nwater\n").unwrap();
    fs::write(dir.path().join("Shopping.md"), "milk\n").unwrap();
    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    (dir, report)
}

#[test]
fn test_json_report_from_scan() {
    let (_dir, report) = scanned();
    let exit_code = ExitCode::for_report(&report);
    assert_eq!(exit_code, ExitCode::Success);

    let mut buffer = Vec::new();
    JsonOutput::new(&report, exit_code).write_to(&mut buffer).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

    assert_eq!(json["summary"]["total_files"], 3);
    assert_eq!(json["summary"]["duplicate_groups"], 1);
    assert_eq!(json["groups"][0]["key"], "recipe");
    assert_eq!(json["groups"][0]["identical"], true);
    let files = json["groups"][0]["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["digest"], files[1]["digest"]);
}

#[test]
fn test_csv_report_from_scan() {
    let (_dir, report) = scanned();

    let mut buffer = Vec::new();
    CsvOutput::new(&report.groups).write_to(&mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    assert_eq!(text.lines().count(), 3);
    assert!(text.lines().skip(1).all(|l| l.starts_with("1,recipe,")));
}

#[test]
fn test_plan_exports() {
    let (dir, report) = scanned();
    let config = Config::default().with_dry_run(true);
    // Never consulted: interactive mode is off.
    let plan = Resolver::new(&config, FzfOracle::default()).resolve(&report);

    let mut json_buffer = Vec::new();
    JsonPlanOutput::new(&plan, &report, ExitCode::Success)
        .write_to(&mut json_buffer)
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&json_buffer).unwrap();
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["resolutions"][0]["discard"][0]["similarity"], 1.0);

    let mut csv_buffer = Vec::new();
    CsvPlanOutput::new(&plan).write_to(&mut csv_buffer).unwrap();
    let csv_text = String::from_utf8(csv_buffer).unwrap();
    let keep_row = csv_text.lines().nth(1).unwrap();
    assert!(keep_row.contains(",keep,"));
    assert!(keep_row.contains(&dir.path().join("Recipe 2.md").display().to_string())
        || keep_row.contains(&dir.path().join("Recipe.md").display().to_string()));
}
