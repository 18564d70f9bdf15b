//! CLI integration tests
//!
//! Config and credential state is isolated per test by pointing
//! XDG_CONFIG_HOME at a temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn repvox_bin(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("repvox").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd.env_remove("REPVOX_API_URL");
    cmd
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    repvox_bin(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("listen"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    repvox_bin(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("repvox"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let dir = TempDir::new().unwrap();
    repvox_bin(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("repvox"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_help() {
    let dir = TempDir::new().unwrap();
    repvox_bin(&dir)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn config_set_and_get_round_trip() {
    let dir = TempDir::new().unwrap();

    repvox_bin(&dir)
        .args(["config", "set", "units", "imperial"])
        .assert()
        .success();

    repvox_bin(&dir)
        .args(["config", "get", "units"])
        .assert()
        .success()
        .stdout(predicate::str::contains("imperial"));
}

#[test]
fn config_get_unset_key() {
    let dir = TempDir::new().unwrap();
    repvox_bin(&dir)
        .args(["config", "get", "theme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    repvox_bin(&dir)
        .args(["config", "set", "color", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_rejects_invalid_units() {
    let dir = TempDir::new().unwrap();
    repvox_bin(&dir)
        .args(["config", "set", "units", "stone"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("metric"));
}

#[test]
fn config_set_rejects_non_http_api_url() {
    let dir = TempDir::new().unwrap();
    repvox_bin(&dir)
        .args(["config", "set", "api_url", "localhost:8000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http"));
}

#[test]
fn config_init_creates_file_once() {
    let dir = TempDir::new().unwrap();

    repvox_bin(&dir).args(["config", "init"]).assert().success();

    // Second init refuses to overwrite
    repvox_bin(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exists"));
}

#[test]
fn status_without_login() {
    let dir = TempDir::new().unwrap();
    repvox_bin(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("no"))
        .stdout(predicate::str::contains("metric"));
}

#[test]
fn login_then_status_then_logout() {
    let dir = TempDir::new().unwrap();

    repvox_bin(&dir)
        .args(["login", "--token", "test-token-123"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged in"));

    repvox_bin(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("yes"));

    repvox_bin(&dir)
        .arg("logout")
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged out"));

    repvox_bin(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("no"));
}

#[test]
fn login_rejects_empty_token() {
    let dir = TempDir::new().unwrap();
    repvox_bin(&dir)
        .args(["login", "--token", "  "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn logout_without_login_succeeds() {
    let dir = TempDir::new().unwrap();
    repvox_bin(&dir).arg("logout").assert().success();
}

#[test]
fn listen_without_login_fails_fast() {
    let dir = TempDir::new().unwrap();
    repvox_bin(&dir)
        .arg("listen")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not authenticated"));
}

#[test]
fn api_url_flag_overrides_status_output() {
    let dir = TempDir::new().unwrap();
    repvox_bin(&dir)
        .args(["--api-url", "https://fit.example.com/api/v1", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://fit.example.com/api/v1"));
}
