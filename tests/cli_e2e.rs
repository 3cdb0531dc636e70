//! End-to-end CLI tests for the ogscraper binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn html_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp file");
    file
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("ogscraper").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Open Graph"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("ogscraper").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ogscraper"));
}

/// Test that invalid flags cause a usage error.
#[test]
fn test_binary_invalid_flag_returns_error() {
    let mut cmd = Command::cargo_bin("ogscraper").unwrap();
    cmd.arg("--invalid-flag")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_html_file_prints_metadata_json() {
    let file = html_file(r#"<html><head><meta property="og:title" content="From file"></head></html>"#);

    let mut cmd = Command::cargo_bin("ogscraper").unwrap();
    cmd.arg("--html-file")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""ogTitle":"From file""#))
        .stdout(predicate::str::contains(r#""requestUrl":null"#))
        .stdout(predicate::str::contains(r#""success":true"#))
        .stdout(predicate::str::contains("charset").not());
}

#[test]
fn test_binary_include_body_echoes_html() {
    let file = html_file("<title>Echo</title>");

    let mut cmd = Command::cargo_bin("ogscraper").unwrap();
    cmd.arg("--html-file")
        .arg(file.path())
        .arg("--include-body")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""body":"<title>Echo</title>""#));
}

#[test]
fn test_binary_pretty_output_is_multiline() {
    let file = html_file(r#"<meta property="og:type" content="website">"#);

    let mut cmd = Command::cargo_bin("ogscraper").unwrap();
    cmd.arg("--html-file")
        .arg(file.path())
        .arg("--pretty")
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  \"ogObject\": {"));
}

#[test]
fn test_binary_invalid_url_exits_with_failure() {
    let mut cmd = Command::cargo_bin("ogscraper").unwrap();
    cmd.arg("not a url")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid URL"));
}

#[test]
fn test_binary_non_html_url_is_rejected_without_network() {
    let mut cmd = Command::cargo_bin("ogscraper").unwrap();
    cmd.arg("https://example.com/file.pdf")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Must scrape an HTML page"));
}

#[test]
fn test_binary_blacklist_flag_rejects_url() {
    let mut cmd = Command::cargo_bin("ogscraper").unwrap();
    cmd.args(["https://blocked.example.com/", "--blacklist", "blocked.example"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Host name has been black listed"));
}

#[test]
fn test_binary_url_and_html_file_together_fails() {
    let file = html_file("<title>x</title>");

    let mut cmd = Command::cargo_bin("ogscraper").unwrap();
    cmd.arg("https://example.com/")
        .arg("--html-file")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not both"));
}

#[test]
fn test_binary_without_target_fails() {
    let mut cmd = Command::cargo_bin("ogscraper").unwrap();
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Must specify either url or html"));
}
