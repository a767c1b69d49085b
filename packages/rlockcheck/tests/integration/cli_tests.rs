//! Command-line harness: discovery, configuration, output, exit status

#[path = "../common/mod.rs"]
mod common;

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use common::*;
use pretty_assertions::assert_eq;

fn rlockcheck(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rlockcheck"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should run")
}

fn write(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn test_clean_package_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "store/store.go", SEQUENTIAL);

    let out = rlockcheck(&["."], dir.path());
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
}

#[test]
fn test_violation_exits_one_with_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "store/store.go", HELPER_REACQUIRES);

    let out = rlockcheck(&["./..."], dir.path());
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(
        stdout.contains("found recursive read lock call on s.mu in Store.Sum"),
        "{}",
        stdout
    );
    assert!(stdout.contains("\t\"Store.Get\" at "), "{}", stdout);
}

#[test]
fn test_test_files_skipped_unless_requested() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "store/store_test.go", DIRECT_TWICE);

    let out = rlockcheck(&["store"], dir.path());
    assert_eq!(out.status.code(), Some(0));

    let out = rlockcheck(&["--include-tests", "store"], dir.path());
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_json_format_flag() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.go", EMBEDDED_LOCK);

    let out = rlockcheck(&["--format", "json", "main.go"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value.as_array().map(|a| a.len()), Some(1));
    assert_eq!(value[0]["function"], "main");
}

#[test]
fn test_config_file_changes_lock_names() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "store/store.go", EXCLUSIVE_TWICE);
    write(
        dir.path(),
        "rlockcheck.yaml",
        "version: 1\nlock:\n  acquire: Lock\n  release: Unlock\n",
    );

    let out = rlockcheck(&["store"], dir.path());
    assert_eq!(out.status.code(), Some(0));

    let out = rlockcheck(&["--config", "rlockcheck.yaml", "store"], dir.path());
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_preset_flag() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "store/store.go", ARGUMENT_CARRY);

    let out = rlockcheck(&["--preset", "conservative", "store"], dir.path());
    assert_eq!(out.status.code(), Some(0));

    let out = rlockcheck(&["--preset", "balanced", "store"], dir.path());
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_errors_exit_two() {
    let dir = tempfile::tempdir().unwrap();

    let out = rlockcheck(&["missing"], dir.path());
    assert_eq!(out.status.code(), Some(2));
    assert!(!out.stderr.is_empty());

    write(dir.path(), "bad.yaml", "version: 9\n");
    let out = rlockcheck(&["--config", "bad.yaml", "."], dir.path());
    assert_eq!(out.status.code(), Some(2));

    let out = rlockcheck(&["--format", "xml", "."], dir.path());
    assert_eq!(out.status.code(), Some(2));
}
