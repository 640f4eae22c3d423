//! Integration tests for the mdx-migrate CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mdx-migrate"))
}

fn content_dir() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let docs = temp_dir.path().join("content/docs");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("a.mdx"), "Use {name} here\n").unwrap();
    fs::write(docs.join("b.md"), "<!-- todo -->\n").unwrap();
    temp_dir
}

#[test]
fn test_stdin() {
    cli()
        .arg("--stdin")
        .write_stdin("Talk to me about <GITHUB_USER>")
        .assert()
        .success()
        .stdout("Talk to me about \\<GITHUB_USER>\n");
}

#[test]
fn test_stdin_keeps_front_matter() {
    cli()
        .arg("--stdin")
        .write_stdin("---\ntitle: Test\n---\n\n1 is <= 2\n")
        .assert()
        .success()
        .stdout("---\ntitle: Test\n---\n\n1 is \\<= 2\n");
}

#[test]
fn test_migrates_default_content_dir() {
    let temp_dir = content_dir();

    cli().current_dir(temp_dir.path()).assert().success();

    let docs = temp_dir.path().join("content/docs");
    assert_eq!(fs::read_to_string(docs.join("a.mdx")).unwrap(), "Use \\{name} here\n");
    assert_eq!(fs::read_to_string(docs.join("b.md")).unwrap(), "{/* todo  */}\n");
}

#[test]
fn test_filter_and_dir() {
    let temp_dir = content_dir();

    cli()
        .arg("--dir")
        .arg(temp_dir.path().join("content"))
        .arg("b.md")
        .assert()
        .success();

    let docs = temp_dir.path().join("content/docs");
    assert_eq!(fs::read_to_string(docs.join("a.mdx")).unwrap(), "Use {name} here\n");
    assert_eq!(fs::read_to_string(docs.join("b.md")).unwrap(), "{/* todo  */}\n");
}

#[test]
fn test_dry_run_logs_files() {
    let temp_dir = content_dir();

    cli()
        .current_dir(temp_dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stderr(predicate::str::contains("a.mdx"));

    let docs = temp_dir.path().join("content/docs");
    assert_eq!(fs::read_to_string(docs.join("a.mdx")).unwrap(), "Use {name} here\n");
}

#[test]
fn test_missing_dir_fails() {
    let temp_dir = TempDir::new().unwrap();

    cli()
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_stdin_conflicts_with_filters() {
    cli().arg("--stdin").arg("docs").assert().failure();
}
