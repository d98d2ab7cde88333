use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use std::fs;
use std::path::{Path, PathBuf};

/// Helper to create an isolated configuration directory
fn setup_test_env() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join("move-gtasks");
    (temp_dir, config_dir)
}

fn get_cmd(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("move-gtasks").unwrap();
    cmd.env("MOVE_GTASKS_CONFIG_DIR", config_dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

const TOKEN_JSON: &str = r#"{"access_token":"a","token_type":"Bearer","refresh_token":"r","expiry":"2099-01-01T00:00:00Z"}"#;

#[test]
fn test_invalid_from_fails_before_anything_else() {
    let (_temp_dir, config_dir) = setup_test_env();

    get_cmd(&config_dir)
        .args(["--from", "someday"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("\"from\""));

    // Nothing was created on disk
    assert!(!config_dir.exists());
}

#[test]
fn test_invalid_to_names_to() {
    let (_temp_dir, config_dir) = setup_test_env();

    get_cmd(&config_dir)
        .args(["-t", "2022-13-45"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("\"to\""))
        .stderr(predicate::str::contains("2022-13-45"));
}

#[test]
fn test_missing_client_secret() {
    let (_temp_dir, config_dir) = setup_test_env();

    get_cmd(&config_dir)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unable to read client secret file"))
        .stderr(predicate::str::contains("credentials.json"));

    // The config directory is created on the way
    assert!(config_dir.is_dir());
}

#[test]
fn test_malformed_client_secret() {
    let (_temp_dir, config_dir) = setup_test_env();
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("credentials.json"), "{\"nope\": true}").unwrap();

    get_cmd(&config_dir)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unable to parse client secret file"));
}

#[test]
fn test_clear_token_without_token_fails() {
    let (_temp_dir, config_dir) = setup_test_env();

    get_cmd(&config_dir)
        .arg("--clear-token")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unable to clear token"))
        .stderr(predicate::str::contains("token.json"));
}

#[test]
fn test_clear_token_removes_cached_token() {
    let (_temp_dir, config_dir) = setup_test_env();
    fs::create_dir_all(&config_dir).unwrap();
    let token_path = config_dir.join("token.json");
    fs::write(&token_path, TOKEN_JSON).unwrap();

    // Without a client secret the run stops right after clearing
    get_cmd(&config_dir)
        .arg("-c")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unable to read client secret file"));

    assert!(!token_path.exists());
}

#[test]
fn test_help_names_credentials_path() {
    let (_temp_dir, config_dir) = setup_test_env();
    let expected = config_dir.join("credentials.json");

    get_cmd(&config_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--clear-token"))
        .stdout(predicate::str::contains("Store your Client OAuth creds at"))
        .stdout(predicate::str::contains(expected.display().to_string()));
}

#[test]
fn test_version() {
    let (_temp_dir, config_dir) = setup_test_env();

    get_cmd(&config_dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
