//! CLI integration tests
//!
//! Run the `apicompat` binary against snapshot files and check its output
//! and exit code.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../apicompat-core/tests/fixtures");

fn fixture(name: &str) -> PathBuf {
    Path::new(FIXTURES).join(name)
}

fn apicompat(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_apicompat"))
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn path_str(p: &Path) -> &str {
    p.to_str().unwrap()
}

/// A one-function package whose result list grows from `string` to
/// `(string, error)`.
fn write_result_extension_pair(dir: &Path) -> (PathBuf, PathBuf) {
    let before = dir.join("before.json");
    let after = dir.join("after.json");
    fs::write(
        &before,
        r#"{"schema_version": 1, "packages": [{"path": "p", "functions": [
            {"name": "Get", "signature": {"results": [{"kind": "basic", "basic": "string"}]}}
        ]}]}"#,
    )
    .unwrap();
    fs::write(
        &after,
        r#"{"schema_version": 1, "packages": [{"path": "p", "functions": [
            {"name": "Get", "signature": {"results": [{"kind": "basic", "basic": "string"}, {"kind": "named", "name": "error"}]}}
        ]}]}"#,
    )
    .unwrap();
    (before, after)
}

#[test]
fn test_diff_reports_breaking_changes_with_exit_1() {
    let temp = TempDir::new().unwrap();
    let output = apicompat(
        temp.path(),
        &[
            "diff",
            path_str(&fixture("before.json")),
            path_str(&fixture("after.json")),
        ],
    );

    assert_eq!(
        output.status.code(),
        Some(1),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("package example.com/testdata\n"));
    assert!(stdout.contains("! func Breaking1(int)\n. func Breaking1(int, bool)\n"));
    assert!(stdout.contains("* func Compatible1(int)\n. func Compatible1(int, ...string)\n"));
    assert!(stdout.contains("+ type AddedT1 interface{}\n"));
    assert!(!stdout.contains("Unchanged1"));
    // Piped output carries no escape codes.
    assert!(!stdout.contains('\u{1b}'));
}

#[test]
fn test_diff_identical_snapshots_exit_0() {
    let temp = TempDir::new().unwrap();
    let before = fixture("before.json");
    let output = apicompat(temp.path(), &["diff", path_str(&before), path_str(&before)]);

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_diff_all_lists_unchanged() {
    let temp = TempDir::new().unwrap();
    let before = fixture("before.json");
    let output = apicompat(
        temp.path(),
        &["diff", "--all", path_str(&before), path_str(&before)],
    );

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("= func Unchanged1(int)\n"));
    assert!(stdout.contains("= var Y bool\n"));
}

#[test]
fn test_diff_json_output() {
    let temp = TempDir::new().unwrap();
    let output = apicompat(
        temp.path(),
        &[
            "diff",
            "--json",
            path_str(&fixture("before.json")),
            path_str(&fixture("after.json")),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let pkg = &json["packages"]["example.com/testdata"];
    assert_eq!(pkg["functions"]["Compatible1"]["kind"], "compatible");
    assert_eq!(pkg["functions"]["Removed1"]["kind"], "removed");
    assert_eq!(pkg["values"]["Y"]["kind"], "breaking");
}

#[test]
fn test_check_prints_only_breaking() {
    let temp = TempDir::new().unwrap();
    let output = apicompat(
        temp.path(),
        &[
            "check",
            path_str(&fixture("before.json")),
            path_str(&fixture("after.json")),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("- func Removed1()\n"));
    assert!(stdout.contains("! var Y bool\n. const Y bool\n"));
    assert!(!stdout.contains("Compatible1"));
    assert!(!stdout.contains("Added1"));
    assert!(stdout
        .lines()
        .last()
        .unwrap()
        .starts_with("breaking: 5 breaking,"));
}

#[test]
fn test_check_clean_prints_ok() {
    let temp = TempDir::new().unwrap();
    let (before, after) = write_result_extension_pair(temp.path());
    let output = apicompat(temp.path(), &["check", path_str(&before), path_str(&after)]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "ok: 0 breaking, 1 compatible, 0 added, 0 removed, 0 unchanged\n"
    );
}

#[test]
fn test_strict_results_flag() {
    let temp = TempDir::new().unwrap();
    let (before, after) = write_result_extension_pair(temp.path());

    let lenient = apicompat(temp.path(), &["diff", path_str(&before), path_str(&after)]);
    assert_eq!(lenient.status.code(), Some(0));

    let strict = apicompat(
        temp.path(),
        &["diff", "--strict-results", path_str(&before), path_str(&after)],
    );
    assert_eq!(strict.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&strict.stdout);
    assert!(stdout.contains("! func Get() string\n. func Get() (string, error)\n"));
}

#[test]
fn test_config_file_is_discovered_in_working_directory() {
    let temp = TempDir::new().unwrap();
    let (before, after) = write_result_extension_pair(temp.path());
    fs::write(
        temp.path().join(".apicompat.toml"),
        "[policy]\nallow_result_extension = false\n",
    )
    .unwrap();

    let output = apicompat(temp.path(), &["diff", path_str(&before), path_str(&after)]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_explicit_config_show_unchanged() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("custom.toml");
    fs::write(&config, "[output]\nshow_unchanged = true\n").unwrap();
    let before = fixture("before.json");

    let output = apicompat(
        temp.path(),
        &[
            "diff",
            "--config",
            path_str(&config),
            path_str(&before),
            path_str(&before),
        ],
    );
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("= type UnchangedT1 int\n"));
}

#[test]
fn test_invalid_config_exit_2() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".apicompat.toml"), "[policy]\nmax_depth = 0\n").unwrap();
    let before = fixture("before.json");

    let output = apicompat(temp.path(), &["diff", path_str(&before), path_str(&before)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_INVALID_CONFIG"));
}

#[test]
fn test_invalid_snapshot_exit_2() {
    let temp = TempDir::new().unwrap();
    let bad = temp.path().join("bad.json");
    fs::write(&bad, "not json").unwrap();
    let good = fixture("before.json");

    let output = apicompat(temp.path(), &["diff", path_str(&good), path_str(&bad)]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_INVALID_SNAPSHOT"), "stderr: {}", stderr);
    assert!(stderr.contains("bad.json"));
}

#[test]
fn test_missing_snapshot_exit_2() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.json");
    let good = fixture("before.json");

    let output = apicompat(temp.path(), &["diff", path_str(&good), path_str(&missing)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_IO"));
}

#[test]
fn test_json_logs_go_to_stderr() {
    let temp = TempDir::new().unwrap();
    let before = fixture("before.json");

    let output = apicompat(
        temp.path(),
        &["--log-json", "diff", "--json", path_str(&before), path_str(&before)],
    );
    assert_eq!(output.status.code(), Some(0));
    // stdout stays machine-readable.
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["packages"].is_object());
    assert!(String::from_utf8_lossy(&output.stderr).contains("\"op\":\"diff_bundles\""));
}
