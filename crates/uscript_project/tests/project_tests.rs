//! Batch driver tests over scratch directories.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use uscript_lint::Severity;
use uscript_options::{LintOptions, ProjectConfig, CONFIG_FILE_NAME};
use uscript_project::{discover_source_files, CancelFlag, Counters, Program};

/// Helper: write `files` (relative path, contents) under a fresh directory.
fn scratch(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, contents) in files {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
    dir
}

fn parse_errors_only() -> ProjectConfig {
    let mut lint = LintOptions::none();
    lint.parse_errors = true;
    ProjectConfig {
        lint,
        ..ProjectConfig::default()
    }
}

fn names(root: &Path, files: &[std::path::PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect()
}

// ============================================================================
// Discovery
// ============================================================================

#[test]
fn test_discovery_filters_extensions_and_hidden_dirs() {
    let dir = scratch(&[
        ("Classes/Pawn.uc", ""),
        ("Classes/Weapon.UC", ""),
        ("Classes/readme.txt", ""),
        (".git/Stale.uc", ""),
        ("Generated/Auto.uc", ""),
    ]);
    let config = ProjectConfig {
        exclude: vec!["Generated".to_string()],
        ..ProjectConfig::default()
    };
    let files = discover_source_files(dir.path(), &config);
    assert_eq!(names(dir.path(), &files), vec!["Classes/Pawn.uc", "Classes/Weapon.UC"]);
}

#[test]
fn test_discovery_accepts_files_and_dedups() {
    let dir = scratch(&[("Classes/A.uc", ""), ("Classes/B.uc", "")]);
    let config = ProjectConfig {
        include: vec!["Classes/A.uc".to_string(), "Classes".to_string(), "Missing".to_string()],
        ..ProjectConfig::default()
    };
    let files = discover_source_files(dir.path(), &config);
    assert_eq!(names(dir.path(), &files), vec!["Classes/A.uc", "Classes/B.uc"]);
}

// ============================================================================
// Batch runs
// ============================================================================

#[test]
fn test_run_reports_each_file() {
    let dir = scratch(&[
        ("Good.uc", "class Good extends Object;\n"),
        ("Bad.uc", "class Bad"),
    ]);
    let program = Program::new(dir.path(), parse_errors_only()).unwrap();
    let mut counters = Counters::default();
    let batch = program.run(&CancelFlag::new(), &mut counters);

    assert!(!batch.cancelled);
    assert_eq!(batch.files.len(), 2);
    assert_eq!(counters.files, 2);
    assert_eq!(counters.errors, 1);
    assert!(batch.has_errors());
    assert_eq!(batch.error_count(), 1);

    let bad = batch.files.iter().find(|f| f.path.ends_with("Bad.uc")).unwrap();
    assert_eq!(bad.results[0].severity, Severity::Error);
}

#[test]
fn test_results_are_sorted_by_position() {
    let dir = scratch(&[(
        "Test.uc",
        "class Test extends Object;\n\nFunction F()\n{\nX = TRUE;\n}\n",
    )]);
    let mut config = ProjectConfig::default();
    config.lint = LintOptions::none();
    config.lint.indentation = true;
    config.lint.keyword_casing = true;
    config.lint.literal_casing = true;
    let program = Program::new(dir.path(), config).unwrap();
    let batch = program.run(&CancelFlag::new(), &mut Counters::default());

    let positions: Vec<(u32, u32)> = batch.files[0].results.iter().map(|r| r.position()).collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);
    assert_eq!(positions.len(), 3);
}

#[test]
fn test_unreadable_file_does_not_stop_batch() {
    let dir = scratch(&[("Good.uc", "class Good extends Object;\n")]);
    let files = vec![dir.path().join("Missing.uc"), dir.path().join("Good.uc")];
    let program = Program::with_files(files, parse_errors_only()).unwrap();
    let mut counters = Counters::default();
    let batch = program.run(&CancelFlag::new(), &mut counters);

    assert_eq!(counters.failed, 1);
    assert_eq!(counters.files, 1);
    assert!(batch.files[0].error.is_some());
    assert!(batch.files[0].has_errors());
    assert!(batch.files[1].results.is_empty());
}

#[test]
fn test_cancelled_run_skips_files() {
    let dir = scratch(&[("A.uc", "class A;\n"), ("B.uc", "class B;\n")]);
    let program = Program::new(dir.path(), parse_errors_only()).unwrap();
    let cancel = CancelFlag::new();
    cancel.cancel();
    let mut counters = Counters::default();
    let batch = program.run(&cancel, &mut counters);

    assert!(batch.cancelled);
    assert!(batch.files.is_empty());
    assert_eq!(counters.skipped, 2);
}

#[test]
fn test_counters_accumulate_across_runs() {
    let dir = scratch(&[("Bad.uc", "class Bad")]);
    let config = ProjectConfig {
        jobs: Some(2),
        ..parse_errors_only()
    };
    let program = Program::new(dir.path(), config).unwrap();
    let mut counters = Counters::default();
    program.run(&CancelFlag::new(), &mut counters);
    program.run(&CancelFlag::new(), &mut counters);
    assert_eq!(counters.files, 2);
    assert_eq!(counters.errors, 2);
}

// ============================================================================
// Configuration and fixing
// ============================================================================

#[test]
fn test_load_finds_configuration_above_start() {
    let dir = scratch(&[
        (CONFIG_FILE_NAME, r#"{ "include": ["Src"], "lint": { "indentStyle": "space", "indentSize": 2 } }"#),
        ("Src/Classes/A.uc", ""),
        ("Other/B.uc", ""),
    ]);
    let program = Program::load(&dir.path().join("Src/Classes")).unwrap();
    assert_eq!(program.config().lint.indent_size, 2);
    assert_eq!(names(dir.path(), program.files()), vec!["Src/Classes/A.uc"]);
}

#[test]
fn test_fix_applies_until_clean() {
    let dir = scratch(&[(
        "Test.uc",
        "class Test extends Object;\n\nFunction F()\n{\nif (TRUE)\n  X = none;\n}\n",
    )]);
    let mut config = ProjectConfig::default();
    config.lint = LintOptions::none();
    config.lint.indentation = true;
    config.lint.keyword_casing = true;
    config.lint.literal_casing = true;
    let program = Program::new(dir.path(), config).unwrap();
    let path = dir.path().join("Test.uc");

    let outcome = program.fix(&path).unwrap();
    assert!(outcome.changed());
    assert_eq!(
        outcome.text,
        "class Test extends Object;\n\nfunction F()\n{\n\tif (True)\n\t\tX = None;\n}\n"
    );
    assert!(program.lint_source(&path, &outcome.text).is_empty());

    let again = program.fix_source(&path, &outcome.text);
    assert!(!again.changed());
    assert_eq!(again.passes, 0);
}

#[test]
fn test_fix_of_missing_file_is_an_error() {
    let dir = scratch(&[]);
    let program = Program::new(dir.path(), ProjectConfig::default()).unwrap();
    assert!(program.fix(&dir.path().join("Nope.uc")).is_err());
}
