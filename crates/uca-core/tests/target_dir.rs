//! Integration tests for discovering and loading target files on disk.

use std::fs;

use uca_core::{TargetDir, UcaError};

fn backports_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("noble-dalmatian.yaml"), "- package: nova\n").unwrap();
    fs::write(
        dir.path().join("jammy-caracal.yaml"),
        "# caracal backports\n- package: nova\n- package: cinder\n  suffix: ~cloud1\n",
    )
    .unwrap();
    fs::write(dir.path().join("README.md"), "not a target").unwrap();
    fs::create_dir(dir.path().join("archive.yaml")).unwrap();
    dir
}

#[test]
fn names_are_sorted_and_suffix_stripped() {
    let dir = backports_dir();
    let targets = TargetDir::new(dir.path());
    assert_eq!(
        targets.names().unwrap(),
        vec!["jammy-caracal".to_string(), "noble-dalmatian".to_string()]
    );
    assert_eq!(targets.files().unwrap().len(), 2);
}

#[test]
fn load_uses_file_name_as_target() {
    let dir = backports_dir();
    let target = TargetDir::new(dir.path()).load("jammy-caracal").unwrap();

    assert_eq!(target.target(), "jammy-caracal");
    assert_eq!(target.len(), 2);
    assert_eq!(
        target.path(),
        Some(dir.path().join("jammy-caracal.yaml").as_path())
    );
}

#[test]
fn load_unknown_target() {
    let dir = backports_dir();
    let err = TargetDir::new(dir.path()).load("focal-yoga").unwrap_err();
    assert!(matches!(err, UcaError::TargetNotFound(name) if name == "focal-yoga"));
}

#[test]
fn invalid_file_is_a_schema_error_naming_the_target() {
    let dir = backports_dir();
    fs::write(dir.path().join("broken.yaml"), "- package: nova\n  extra: 1\n").unwrap();
    let targets = TargetDir::new(dir.path());

    let err = targets.load("broken").unwrap_err();
    match &err {
        UcaError::Schema { target, source } => {
            assert_eq!(target, "broken");
            assert_eq!(source.violations().len(), 1);
        }
        other => panic!("Expected Schema, got {:?}", other),
    }

    assert!(targets.load_all().is_err());
}

#[test]
fn load_all_returns_every_target() {
    let dir = backports_dir();
    let all = TargetDir::new(dir.path()).load_all().unwrap();
    let names: Vec<&str> = all.iter().map(|t| t.target()).collect();
    assert_eq!(names, vec!["jammy-caracal", "noble-dalmatian"]);
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TargetDir::new(dir.path().join("nope")).names().unwrap_err();
    assert!(matches!(err, UcaError::Io(_)));
}
