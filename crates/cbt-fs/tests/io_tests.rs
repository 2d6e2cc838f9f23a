use assert_fs::prelude::*;
use cbt_fs::{Error, NormalizedPath, io};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("modules.props"));

    io::write_atomic(&path, b"<Project />").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "<Project />");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("modules.props");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert_eq!(content, "updated");
}

#[test]
fn test_write_atomic_creates_missing_parent() {
    let temp = assert_fs::TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path()).join("obj/Extensions/Custom.targets");

    io::write_text(&path, "<Project />").unwrap();

    temp.child("obj/Extensions/Custom.targets")
        .assert(predicate::str::contains("<Project />"));
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("modules.props"));

    io::write_text(&path, "content").unwrap();

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["modules.props".to_string()]);
}

#[test]
fn test_write_into_file_as_directory_fails() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let path = NormalizedPath::new(&blocker).join("modules.props");
    let err = io::write_text(&path, "content").unwrap_err();

    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn test_failed_rename_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let occupied = temp.path().join("Custom.targets");
    fs::create_dir(&occupied).unwrap();
    fs::write(occupied.join("keep"), "x").unwrap();

    let err = io::write_text(&NormalizedPath::new(&occupied), "<Project />").unwrap_err();

    assert!(matches!(err, Error::Io { .. }));
    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["Custom.targets".to_string()]);
}

#[test]
fn test_read_text_existing_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("packages.config");
    fs::write(&file_path, "<packages />").unwrap();

    let path = NormalizedPath::new(&file_path);
    assert_eq!(io::read_text(&path).unwrap(), "<packages />");
}

#[test]
fn test_read_text_nonexistent_file() {
    let path = NormalizedPath::new("/nonexistent/packages.config");
    let err = io::read_text(&path).unwrap_err();
    assert!(err.path().ends_with("packages.config"));
}
