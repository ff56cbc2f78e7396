use std::{io::Write, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::{NamedTempFile, TempDir};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// Helper function to create an isolated config home for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to write a config file pointing every candidate at `port`
fn write_config(port: u16) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create config file");
    let config = json!({
        "endpoints": { "host": "127.0.0.1", "port": port, "fallback_port": port }
    });
    write!(file, "{config}").expect("Failed to write config file");
    file
}

/// Helper function to create a Command with --no-color flag for testing
fn planwatch_cmd(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("planwatch").expect("Failed to find planwatch binary");
    cmd.env("XDG_CONFIG_HOME", config_home).arg("--no-color");
    cmd
}

#[test]
fn test_cli_help_lists_commands() {
    let home = create_cli_test_environment();

    planwatch_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn test_cli_missing_config_file_fails() {
    let home = create_cli_test_environment();
    let missing = home.path().join("nope.json");

    planwatch_cmd(home.path())
        .args(["--config-file", missing.to_str().expect("utf-8 path"), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_cli_status_unreachable_backend() {
    let home = create_cli_test_environment();
    let config = write_config(1);

    planwatch_cmd(home.path())
        .args(["--config-file", config.path().to_str().expect("utf-8 path"), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to reach the status endpoint"))
        .stderr(predicate::str::contains("All 1 candidate URLs failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_status_renders_plan() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/manus/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "planId": "p1",
            "title": "Trip",
            "progressPercentage": 50,
            "state": "RUNNING",
            "steps": [
                { "description": "book flights", "status": "completed" },
                { "description": "fetch data", "status": "in progress" }
            ],
            "logs": [{ "message": "booking confirmed", "level": "info" }]
        })))
        .mount(&server)
        .await;

    let home = create_cli_test_environment();
    let config = write_config(server.address().port());

    planwatch_cmd(home.path())
        .args(["--config-file", config.path().to_str().expect("utf-8 path"), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Trip (ID: p1)"))
        .stdout(predicate::str::contains("**Progress**: 50%"))
        .stdout(predicate::str::contains("- ✓ 0. book flights"))
        .stdout(predicate::str::contains("- → 1. fetch data"))
        .stdout(predicate::str::contains("] booking confirmed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_status_without_plan() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/manus/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "No active plan" })))
        .mount(&server)
        .await;

    let home = create_cli_test_environment();
    let config = write_config(server.address().port());

    planwatch_cmd(home.path())
        .args(["--config-file", config.path().to_str().expect("utf-8 path"), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No active plan"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_chat_follows_plan_to_completion() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/manus/chat"))
        .and(query_param("query", "plan a trip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "On it" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/manus/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "planId": "p1",
            "state": "COMPLETED",
            "progressPercentage": 100
        })))
        .mount(&server)
        .await;

    let home = create_cli_test_environment();
    let config = write_config(server.address().port());

    planwatch_cmd(home.path())
        .args([
            "--config-file",
            config.path().to_str().expect("utf-8 path"),
            "chat",
            "plan",
            "a",
            "trip",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("**You**: plan a trip"))
        .stdout(predicate::str::contains("**planwatch**: On it"))
        .stdout(predicate::str::contains("**Progress**: 100%"))
        .stdout(predicate::str::contains("Plan completed!"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_chat_failure_exits_with_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/manus/chat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let home = create_cli_test_environment();
    let config = write_config(server.address().port());

    planwatch_cmd(home.path())
        .args([
            "--config-file",
            config.path().to_str().expect("utf-8 path"),
            "chat",
            "hello",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Sorry, the service ran into a problem"))
        .stderr(predicate::str::contains("Chat request failed"));
}
