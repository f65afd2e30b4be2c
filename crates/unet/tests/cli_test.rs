//! Integration tests for the `unet` CLI binary.
//!
//! Argument parsing, help output, completions and exit codes run without
//! any server; the session tests talk to a wiremock cockpit.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `unet` binary with env isolation.
///
/// Clears all `UNET_*` env vars and points the config/data directories
/// into `home` so tests never touch the user's real configuration.
fn unet_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("unet");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("UNET_PROFILE")
        .env_remove("UNET_SERVER")
        .env_remove("UNET_OUTPUT")
        .env_remove("UNET_INSECURE")
        .env_remove("UNET_TIMEOUT")
        .env_remove("UNET_PASSWORD")
        .env_remove("UNET_SESSION_DIR");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_cockpit(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "cli-token",
            "role": "admin",
            "displayName": "系统管理员",
            "permissions": []
        })))
        .mount(server)
        .await;
    mount_json(server, "/api/dashboard/overview", json!({ "activeTasks": 2 })).await;
    mount_json(
        server,
        "/api/monitoring/devices",
        json!([{ "deviceId": "HOP-01", "name": "1号料斗", "status": "online", "level": 62 }]),
    )
    .await;
    mount_json(server, "/api/tasks", json!([])).await;
    mount_json(server, "/api/alerts", json!([])).await;
    mount_json(server, "/api/audit/logs", json!([])).await;
    mount_json(server, "/api/integrations", json!([])).await;
}

/// Write a stored session the way `unet login` leaves it.
fn write_session(dir: &Path, token: &str) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join("unet_token"), token).unwrap();
    std::fs::write(
        dir.join("unet_user"),
        json!({ "name": "调度员", "role": "operator", "permissions": [], "username": "op" })
            .to_string(),
    )
    .unwrap();
}

/// Run a prepared command off the async runtime.
async fn run(cmd: assert_cmd::Command) -> assert_cmd::assert::Assert {
    tokio::task::spawn_blocking(move || {
        let mut cmd = cmd;
        cmd.assert()
    })
    .await
    .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_prints_usage_and_fails() {
    let home = TempDir::new().unwrap();
    let output = unet_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    unet_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("login")
                .and(predicate::str::contains("events"))
                .and(predicate::str::contains("watch")),
        );
}

#[test]
fn version_flag() {
    let home = TempDir::new().unwrap();
    unet_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("unet"));
}

#[test]
fn completions_bash() {
    let home = TempDir::new().unwrap();
    unet_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unet"));
}

#[test]
fn unknown_subcommand_is_rejected() {
    let home = TempDir::new().unwrap();
    unet_cmd(home.path()).arg("reboot").assert().failure().code(2);
}

// ── Config tests ────────────────────────────────────────────────────

#[test]
fn config_path_points_into_config_home() {
    let home = TempDir::new().unwrap();
    unet_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn unknown_profile_exits_with_config_code() {
    let home = TempDir::new().unwrap();
    unet_cmd(home.path())
        .args(["--profile", "plant-b", "devices"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("plant-b"));
}

#[test]
fn config_use_rejects_missing_profile() {
    let home = TempDir::new().unwrap();
    unet_cmd(home.path())
        .args(["config", "use", "nowhere"])
        .assert()
        .failure()
        .code(2);
}

// ── Session tests ───────────────────────────────────────────────────

#[test]
fn devices_without_session_exits_with_session_code() {
    let home = TempDir::new().unwrap();
    unet_cmd(home.path())
        .args(["--session-dir"])
        .arg(home.path().join("session"))
        .arg("devices")
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn events_page_zero_is_a_validation_error() {
    let home = TempDir::new().unwrap();
    let session = home.path().join("session");
    write_session(&session, "tok");
    unet_cmd(home.path())
        .arg("--session-dir")
        .arg(&session)
        .args(["events", "list", "--page", "0"])
        .assert()
        .failure()
        .code(7);
}

#[tokio::test(flavor = "multi_thread")]
async fn login_then_devices_as_json() {
    let server = MockServer::start().await;
    mount_cockpit(&server).await;
    let home = TempDir::new().unwrap();
    let session = home.path().join("session");

    let mut login = unet_cmd(home.path());
    login
        .args(["--server", &server.uri(), "--session-dir"])
        .arg(&session)
        .args(["login", "-u", "admin", "--password", "admin123"]);
    run(login).await.success();

    assert!(session.join("unet_token").exists());

    let mut devices = unet_cmd(home.path());
    devices
        .args(["--server", &server.uri(), "--session-dir"])
        .arg(&session)
        .args(["devices", "-o", "json"]);
    run(devices)
        .await
        .success()
        .stdout(predicate::str::contains("\"deviceId\": \"HOP-01\""));

    let authed = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/api/monitoring/devices")
        .all(|r| {
            r.headers
                .get("authorization")
                .is_some_and(|v| v.to_str().unwrap() == "Bearer cli-token")
        });
    assert!(authed);
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_login_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "用户名或密码错误" })),
        )
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    let mut login = unet_cmd(home.path());
    login
        .args(["--server", &server.uri(), "--session-dir"])
        .arg(home.path().join("session"))
        .args(["login", "-u", "admin", "--password", "wrong"]);
    run(login)
        .await
        .failure()
        .code(3)
        .stderr(predicate::str::contains("用户名或密码错误"));
}

#[tokio::test(flavor = "multi_thread")]
async fn expired_token_clears_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/interface4/events"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    let session = home.path().join("session");
    write_session(&session, "stale");

    let mut events = unet_cmd(home.path());
    events
        .args(["--server", &server.uri(), "--session-dir"])
        .arg(&session)
        .args(["events", "list"]);
    run(events).await.failure().code(4);

    assert!(!session.join("unet_token").exists());
}
