// Integration tests over fixture files and temporary profile directories
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use userjs::{
    detect_drift, effective, find_profile_path, install_user_js, lint, parse_user_js,
    parse_user_js_file, query_preferences, write_prefs_file, write_user_js, DriftStatus, Error, InstallOptions,
    InstallOutcome, LintConfig, PrefValue, PrefValueExt, Rule, Severity, WriteOptions,
    BUNDLED_USER_JS,
};

// Helper function to get fixtures path
fn fixtures_path() -> PathBuf {
    Path::new("tests/fixtures").to_path_buf()
}

fn profiles_root() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    fs::write(
        dir.path().join("profiles.ini"),
        "[General]\nStartWithLastProfile=1\n\n[Profile0]\nName=default\nIsRelative=1\nPath=Profiles/x1y2z3.default\nDefault=1\n",
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("Profiles/x1y2z3.default")).unwrap();
    dir
}

#[test]
fn test_overrides_fixture_structure() {
    let file = parse_user_js_file(&fixtures_path().join("overrides.js"))
        .expect("Failed to parse overrides.js");

    assert_eq!(file.entries.len(), 5);
    assert_eq!(file.sections, vec!["FASTFOX", "SECUREFOX", "MY OVERRIDES"]);

    let disk = &file.entries[0];
    assert_eq!(disk.key, "browser.cache.disk.enable");
    assert_eq!(disk.group.as_deref(), Some("DISK CACHE"));
    assert_eq!(disk.comment.as_deref(), Some("RAM only"));
    assert_eq!(disk.line, 5);
}

#[test]
fn test_intentional_override_lints_clean() {
    let file = parse_user_js_file(&fixtures_path().join("overrides.js")).unwrap();
    let report = lint(&file, &LintConfig::default()).unwrap();

    assert!(!report.has_errors());
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].severity, Severity::Note);
    assert_eq!(report.diagnostics[0].key.as_deref(), Some("browser.formfill.enable"));

    let merged = effective(&file);
    let formfill = merged
        .iter()
        .find(|e| e.key == "browser.formfill.enable")
        .unwrap();
    assert_eq!(formfill.value.as_bool(), Some(true));
    assert_eq!(formfill.section.as_deref(), Some("MY OVERRIDES"));
}

#[test]
fn test_conflicting_fixture_diagnostics() {
    let file = parse_user_js_file(&fixtures_path().join("conflicting.js")).unwrap();
    let report = lint(&file, &LintConfig::default()).unwrap();

    let found: Vec<(usize, Severity, Rule)> = report
        .diagnostics
        .iter()
        .map(|d| (d.line, d.severity, d.rule))
        .collect();
    assert_eq!(
        found,
        vec![
            (3, Severity::Error, Rule::DuplicateConflict),
            (4, Severity::Error, Rule::MixedType),
            (6, Severity::Warning, Rule::DuplicateRedundant),
        ]
    );
    assert_eq!(report.error_count(), 2);
}

#[test]
fn test_broken_fixture_reports_position() {
    let err = parse_user_js_file(&fixtures_path().join("broken.js")).unwrap_err();
    match err {
        Error::Parser { line, .. } => assert_eq!(line, 3),
        other => panic!("expected parser error, got {:?}", other),
    }
}

#[test]
fn test_bundled_canonical_round_trip() {
    let bundled = parse_user_js(BUNDLED_USER_JS).unwrap();
    let canonical = write_user_js(&bundled.entries, &WriteOptions::default());

    // Canonical text reproduces itself byte for byte
    let reparsed = parse_user_js(&canonical).unwrap();
    assert_eq!(
        write_user_js(&reparsed.entries, &WriteOptions::default()),
        canonical
    );

    let pairs = |entries: &[userjs::PrefEntry]| -> Vec<(String, PrefValue)> {
        entries
            .iter()
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect()
    };
    assert_eq!(pairs(&reparsed.entries), pairs(&bundled.entries));
}

#[test]
fn test_bundled_sections_survive_rewrite() {
    let bundled = parse_user_js(BUNDLED_USER_JS).unwrap();
    let options = WriteOptions {
        comments: true,
        sections: true,
    };
    let rewritten = parse_user_js(&write_prefs_file(&bundled, &options)).unwrap();

    // The empty overrides areas are kept
    assert_eq!(rewritten.sections, bundled.sections);
    assert_eq!(rewritten.sections.len(), 5);
    assert_eq!(rewritten.entries.len(), bundled.entries.len());
}

#[test]
fn test_bundled_value_types() {
    let bundled = parse_user_js(BUNDLED_USER_JS).unwrap();

    let telemetry = query_preferences(&bundled.entries, &["toolkit.telemetry.*"]).unwrap();
    assert!(!telemetry.is_empty());
    assert!(telemetry
        .iter()
        .filter(|e| e.key.ends_with(".enabled"))
        .all(|e| e.value == PrefValue::Bool(false)));

    let fullscreen = query_preferences(
        &bundled.entries,
        &["full-screen-api.transition-duration.*"],
    )
    .unwrap();
    assert_eq!(fullscreen.len(), 2);
    assert!(fullscreen.iter().all(|e| e.value.as_str() == Some("0 0")));
}

#[test]
fn test_install_into_discovered_profile() {
    let root = profiles_root();
    let profile = find_profile_path("default", Some(root.path())).unwrap();
    assert_eq!(profile, root.path().join("Profiles/x1y2z3.default"));

    let first = install_user_js(&profile, BUNDLED_USER_JS, &InstallOptions::default()).unwrap();
    assert!(matches!(first, InstallOutcome::Created { .. }));

    let second = install_user_js(&profile, BUNDLED_USER_JS, &InstallOptions::default()).unwrap();
    assert!(matches!(second, InstallOutcome::Unchanged { .. }));

    let installed = fs::read_to_string(profile.join("user.js")).unwrap();
    assert_eq!(installed, BUNDLED_USER_JS);
}

#[test]
fn test_drift_against_live_prefs() {
    let overrides = parse_user_js_file(&fixtures_path().join("overrides.js")).unwrap();
    let live = parse_user_js_file(&fixtures_path().join("prefs.js")).unwrap();

    let report = detect_drift(&overrides.entries, &live.entries);
    assert_eq!(report.count(DriftStatus::Applied), 2);
    assert_eq!(report.count(DriftStatus::Pending), 1);
    assert_eq!(report.count(DriftStatus::Absent), 1);

    let pending: Vec<_> = report.pending().map(|e| e.key.as_str()).collect();
    assert_eq!(pending, vec!["browser.cache.disk.enable"]);
}
