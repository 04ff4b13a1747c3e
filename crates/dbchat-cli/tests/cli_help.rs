use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("dbchat")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("threads"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_ask_help_shows_thread_flag() {
    cargo_bin_cmd!("dbchat")
        .args(["ask", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--question"))
        .stdout(predicate::str::contains("--thread"));
}

#[test]
fn test_threads_help_shows_subcommands() {
    cargo_bin_cmd!("dbchat")
        .args(["threads", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_config_path_honors_dbchat_home() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("dbchat")
        .env("DBCHAT_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("dbchat")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
