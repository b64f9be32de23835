use std::ffi::OsStr;
use std::path::PathBuf;

use filepaths_core::{
    DEFAULT_EXCLUDED, ErrorPolicy, ExcludedNames, RootOutcome, RootReport, RunReport, ScanConfig,
    ScanError, ScanWarning, WarningKind,
};

#[test]
fn test_default_excluded_names() {
    let names = ExcludedNames::default();
    assert_eq!(names.len(), DEFAULT_EXCLUDED.len());
    for name in DEFAULT_EXCLUDED {
        assert!(names.is_excluded(OsStr::new(name)));
    }
    assert!(!names.is_excluded(OsStr::new("src")));
}

#[test]
fn test_excluded_names_insert() {
    let mut names = ExcludedNames::empty();
    assert!(names.is_empty());
    assert!(names.insert("target"));
    assert!(!names.insert("target"));
    assert_eq!(names.iter().collect::<Vec<_>>(), ["target"]);
}

#[test]
fn test_config_file_load() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
output_dir = "/tmp/lists"
follow_symlinks = true
excluded = []

[roots]
IVF = "/data/ivf"
"#,
    )
    .unwrap();

    let config = ScanConfig::load(&path).unwrap();
    assert_eq!(config.output_dir, PathBuf::from("/tmp/lists"));
    assert!(config.follow_symlinks);
    assert!(config.excluded_names.is_empty());
    assert_eq!(config.on_error, ErrorPolicy::Skip);
    assert_eq!(config.roots.len(), 1);
}

#[test]
fn test_config_file_errors_carry_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "roots = 3").unwrap();

    match ScanConfig::load(&path) {
        Err(ScanError::ConfigParse { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected parse error, got {other:?}"),
    }

    let missing = dir.path().join("missing.toml");
    assert!(matches!(
        ScanConfig::load(&missing),
        Err(ScanError::NotFound { .. })
    ));
}

#[test]
fn test_run_report_serializes() {
    let mut run = RunReport::new();
    run.push(RootOutcome::Completed(RootReport {
        label: "IVF".into(),
        root: PathBuf::from("/data/ivf"),
        output_file: PathBuf::from("file_paths_IVF.txt"),
        paths_written: 2,
        dirs_pruned: 1,
        bytes_written: 30,
        warnings: vec![ScanWarning::new("/data/ivf/x", "odd", WarningKind::ReadError)],
        started_at: chrono::Utc::now(),
        elapsed: std::time::Duration::from_millis(5),
    }));

    let json = serde_json::to_value(&run).unwrap();
    assert_eq!(json["completed"][0]["label"], "IVF");
    assert_eq!(json["completed"][0]["paths_written"], 2);
    assert_eq!(json["completed"][0]["warnings"][0]["kind"], "read_error");
    assert!(json["failed"].as_array().unwrap().is_empty());
}
