// Integration tests for the scss-lint-task CLI.
//
// These tests use assert_cmd to invoke the binary and verify
// exit codes, stdout/stderr output, and the rendered command line.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to build a Command for the scss-lint-task binary with an empty HOME.
fn task(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("scss-lint-task").expect("binary should exist");
    cmd.env("HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_version_flag() {
    let home = TempDir::new().expect("temp dir should be created");
    task(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("scss-lint-task"));
}

#[test]
fn cli_help_flag() {
    let home = TempDir::new().expect("temp dir should be created");
    task(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Runs scss-lint"));
}

#[test]
fn stdin_requires_files() {
    let home = TempDir::new().expect("temp dir should be created");
    task(&home)
        .arg("stdin")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn command_prints_default_command_line() {
    let home = TempDir::new().expect("temp dir should be created");
    task(&home)
        .current_dir(home.path())
        .args(["command", "--include-linter", "a,d", "--exclude-linter", "c"])
        .args(["a.scss", "d.scss"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "bundle exec scss-lint --include-linter='a,d' --exclude-linter='c' -- 'a.scss' 'd.scss'\n",
        ));
}

#[test]
fn command_renders_prefixes_in_order() {
    let home = TempDir::new().expect("temp dir should be created");
    task(&home)
        .current_dir(home.path())
        .args([
            "command",
            "--working-directory",
            "my-dir",
            "--bundle-gem-file",
            "my-gem-file",
            "--ruby-executable",
            "my-ruby",
            "--bundle-executable",
            "my-bundle",
            "--no-color",
        ])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "cd 'my-dir' && BUNDLE_GEMFILE='my-gem-file' my-ruby my-bundle exec scss-lint --no-color\n",
        ));
}

#[test]
fn command_forces_json_for_reporters() {
    let home = TempDir::new().expect("temp dir should be created");
    task(&home)
        .current_dir(home.path())
        .args(["command", "--no-bundle", "--reporter", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::diff("scss-lint --format='JSON'\n"));
}

#[test]
fn unknown_reporter_exits_with_code_3() {
    let home = TempDir::new().expect("temp dir should be created");
    task(&home)
        .current_dir(home.path())
        .args(["run", "--reporter", "teamcity", "a.scss"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("unknown lint reporter: teamcity"));
}

#[test]
fn missing_config_file_exits_with_code_3() {
    let home = TempDir::new().expect("temp dir should be created");
    task(&home)
        .current_dir(home.path())
        .args(["command", "--config", "nope.toml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn invalid_fail_on_is_a_usage_error() {
    let home = TempDir::new().expect("temp dir should be created");
    task(&home)
        .args(["run", "--fail-on", "sometimes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid fail-on value"));
}
