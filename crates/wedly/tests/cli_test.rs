//! Integration tests for the `wedly` CLI binary.
//!
//! Guest-list flows run against the local backend in a temp directory;
//! the REST flow runs against a wiremock server. Nothing touches the
//! user's real configuration.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `wedly` binary with env isolation.
///
/// Clears all `WEDLY_*` env vars and points config directories into
/// `home` so tests never touch the user's real configuration.
fn wedly_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("wedly");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("WEDLY_PROFILE")
        .env_remove("WEDLY_API_URL")
        .env_remove("WEDLY_DATA_FILE")
        .env_remove("WEDLY_TOKEN")
        .env_remove("WEDLY_INVITATION_BASE")
        .env_remove("WEDLY_OUTPUT")
        .env_remove("WEDLY_INSECURE")
        .env_remove("WEDLY_TIMEOUT");
    cmd
}

/// A temp home plus a guest data file inside it.
struct Venue {
    home: TempDir,
}

impl Venue {
    fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
        }
    }

    fn data_file(&self) -> PathBuf {
        self.home.path().join("guests.json")
    }

    /// `wedly --data-file <tmp> <args...>`
    fn cmd(&self, args: &[&str]) -> assert_cmd::Command {
        let mut cmd = wedly_cmd(self.home.path());
        cmd.arg("--data-file").arg(self.data_file()).args(args);
        cmd
    }

    fn json(&self, args: &[&str]) -> Value {
        let mut full = args.to_vec();
        full.extend(["--output", "json"]);
        let output = self.cmd(&full).output().unwrap();
        assert!(
            output.status.success(),
            "{args:?} failed:\n{}",
            combined_output(&output)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    /// Add a guest and return its id.
    fn add(&self, args: &[&str]) -> String {
        let mut full = vec!["guests", "add"];
        full.extend_from_slice(args);
        self.json(&full)["id"].as_str().unwrap().to_owned()
    }

    fn qr(&self, id: &str) -> String {
        let output = self
            .cmd(&["guests", "qr", id, "--output", "plain"])
            .output()
            .unwrap();
        String::from_utf8(output.stdout).unwrap().trim().to_owned()
    }
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = wedly_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    wedly_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("guest list")
            .and(predicate::str::contains("guests"))
            .and(predicate::str::contains("scan"))
            .and(predicate::str::contains("wedding")),
    );
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    wedly_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_guests_subcommands_exist() {
    let home = TempDir::new().unwrap();
    wedly_cmd(home.path())
        .args(["guests", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("check-in"))
                .and(predicate::str::contains("qr"))
                .and(predicate::str::contains("decode")),
        );
}

#[test]
fn test_invalid_output_format() {
    let venue = Venue::new();
    let output = venue
        .cmd(&["--output", "invalid", "guests", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_config_show_no_config() {
    let home = TempDir::new().unwrap();
    wedly_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_default_output_applies_without_flag() {
    let venue = Venue::new();
    venue.add(&["Alice Tan"]);

    let output = venue
        .cmd(&["stats"])
        .env("WEDLY_DEFAULTS__OUTPUT", "json")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let stats: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["total"], 1);

    // The flag still wins.
    venue
        .cmd(&["stats", "--output", "plain"])
        .env("WEDLY_DEFAULTS__OUTPUT", "json")
        .assert()
        .success()
        .stdout(predicate::str::diff("0/1\n"));
}

// ── QR payloads ─────────────────────────────────────────────────────

#[test]
fn test_decode_prints_payload() {
    let home = TempDir::new().unwrap();
    let output = wedly_cmd(home.path())
        .args([
            "guests",
            "decode",
            "eyJpZCI6ImcxIiwibmFtZSI6IkFsaWNlIiwidmlwIjp0cnVlfQ==",
            "--output",
            "json-compact",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    insta::assert_snapshot!(stdout.trim(), @r#"{"id":"g1","name":"Alice","vip":true}"#);
}

#[test]
fn test_decode_garbage_exits_with_invalid_payload() {
    let home = TempDir::new().unwrap();
    let output = wedly_cmd(home.path())
        .args(["guests", "decode", "not-a-guest-code"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(6));
    assert!(combined_output(&output).contains("Invalid QR payload"));
}

// ── Guest list (local backend) ──────────────────────────────────────

#[test]
fn test_add_list_and_filter() {
    let venue = Venue::new();
    venue.add(&["Alice Tan", "--vip", "--party-size", "2", "--group", "Family"]);
    venue.add(&["Bob Smith"]);

    let all = venue.json(&["guests", "list"]);
    assert_eq!(all.as_array().unwrap().len(), 2);
    assert_eq!(all[0]["name"], "Alice Tan");
    assert_eq!(all[0]["isVIP"], true);
    assert_eq!(all[0]["group"], "Family");

    let vips = venue.json(&["guests", "list", "--vip"]);
    assert_eq!(vips.as_array().unwrap().len(), 1);

    let search = venue.json(&["guests", "list", "--search", "SMI"]);
    assert_eq!(search[0]["name"], "Bob Smith");
}

#[test]
fn test_add_rejects_blank_name() {
    let venue = Venue::new();
    let output = venue.cmd(&["guests", "add", "   "]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_get_by_name_and_unknown_guest() {
    let venue = Venue::new();
    let id = venue.add(&["Alice Tan"]);

    let found = venue.json(&["guests", "get", "alice tan"]);
    assert_eq!(found["id"], id.as_str());

    let output = venue.cmd(&["guests", "get", "nonexistent-id"]).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_update_changes_only_given_fields() {
    let venue = Venue::new();
    let id = venue.add(&["Alice Tan", "--vip", "--party-size", "2"]);

    let updated = venue.json(&["guests", "update", &id, "--group", "Friends"]);
    assert_eq!(updated["group"], "Friends");
    assert_eq!(updated["isVIP"], true);
    assert_eq!(updated["attendanceCount"], 2);
}

#[test]
fn test_delete_requires_confirmation() {
    let venue = Venue::new();
    let id = venue.add(&["Alice Tan"]);

    let output = venue.cmd(&["guests", "delete", &id]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));

    venue.cmd(&["guests", "delete", &id, "--yes"]).assert().success();
    let all = venue.json(&["guests", "list"]);
    assert!(all.as_array().unwrap().is_empty());
}

#[test]
fn test_check_in_is_idempotent() {
    let venue = Venue::new();
    let id = venue.add(&["Alice Tan", "--party-size", "2"]);

    let first = venue.json(&["guests", "check-in", &id, "--party-size", "3"]);
    assert_eq!(first["checkedIn"], true);
    assert_eq!(first["attendanceCount"], 3);

    venue
        .cmd(&["guests", "check-in", &id])
        .assert()
        .success()
        .stderr(predicate::str::contains("already checked in"));

    let history = venue.json(&["guests", "history"]);
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[test]
fn test_stats() {
    let venue = Venue::new();
    let alice = venue.add(&["Alice", "--vip"]);
    venue.add(&["Bob"]);
    venue.add(&["Carol", "--vip"]);
    venue.json(&["guests", "check-in", &alice]);

    let stats = venue.json(&["stats"]);
    assert_eq!(
        stats,
        json!({ "total": 3, "checkedIn": 1, "vipTotal": 2, "vipCheckedIn": 1 })
    );
}

// ── Scanner ─────────────────────────────────────────────────────────

#[test]
fn test_scan_confirm_with_party_size() {
    let venue = Venue::new();
    let id = venue.add(&["Alice Tan", "--vip", "--party-size", "2"]);
    let code = venue.qr(&id);

    venue
        .cmd(&["scan"])
        .write_stdin(format!("{code}\n3\n{code}\n"))
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Verify guest")
                .and(predicate::str::contains("Welcome!  Alice Tan VIP, party of 3"))
                .and(predicate::str::contains("Already checked in")),
        );

    let stats = venue.json(&["stats"]);
    assert_eq!(stats["checkedIn"], 1);
}

#[test]
fn test_scan_skip_and_bad_codes() {
    let venue = Venue::new();
    let id = venue.add(&["Alice Tan"]);
    let code = venue.qr(&id);

    venue
        .cmd(&["scan"])
        .write_stdin(format!("garbage\n{code}\nn\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid code"))
        .stderr(predicate::str::contains("Skipped"));

    let stats = venue.json(&["stats"]);
    assert_eq!(stats["checkedIn"], 0);
}

#[test]
fn test_scan_auto_confirm() {
    let venue = Venue::new();
    let id = venue.add(&["Bob Smith"]);
    let code = venue.qr(&id);

    venue
        .cmd(&["scan", "--auto-confirm"])
        .write_stdin(format!("{code}\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome!  Bob Smith, party of 1"));
}

#[test]
fn test_scan_ignores_double_reads() {
    let venue = Venue::new();
    let id = venue.add(&["Bob Smith"]);
    let code = venue.qr(&id);
    venue.json(&["guests", "check-in", &id]);

    let output = venue
        .cmd(&["scan"])
        .write_stdin(format!("garbage\ngarbage\n{code}\n{code}\n"))
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.matches("Invalid code").count(), 1);
    assert_eq!(stdout.matches("Already checked in").count(), 1);
    assert!(
        String::from_utf8(output.stderr)
            .unwrap()
            .contains("1 repeat scans; 1 rejected codes")
    );
}

// ── Wedding details and invitations ─────────────────────────────────

#[test]
fn test_wedding_set_and_show() {
    let venue = Venue::new();
    venue
        .cmd(&["wedding", "set", "venue", "Garden Terrace"])
        .assert()
        .success();

    let config = venue.json(&["wedding", "show"]);
    assert_eq!(config["venue"], "Garden Terrace");
    assert_eq!(config["bride"], "Sarah");

    let output = venue.cmd(&["wedding", "set", "bride", " "]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invitation_link() {
    let venue = Venue::new();
    let id = venue.add(&["Alice Tan"]);

    venue
        .cmd(&[
            "--invitation-base",
            "https://wedding.example.com",
            "invitation",
            &id,
            "--output",
            "plain",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "https://wedding.example.com/invitation/{id}"
        )));
}

#[test]
fn test_invitation_wishes() {
    let venue = Venue::new();
    assert_eq!(venue.json(&["invitation", "wishes"]), json!([]));

    let wish = venue.json(&[
        "invitation",
        "wish",
        "--name",
        "Rina",
        "Selamat menempuh hidup baru!",
    ]);
    assert_eq!(wish["name"], "Rina");

    let output = venue
        .cmd(&["invitation", "wish", "--name", "Budi", "hey"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("message"));

    let wishes = venue.json(&["invitation", "wishes"]);
    assert_eq!(wishes.as_array().unwrap().len(), 1);
    assert_eq!(wishes[0]["message"], "Selamat menempuh hidup baru!");
    assert_eq!(wishes[0]["id"], wish["id"]);
}

#[test]
fn test_auth_unsupported_with_local_backend() {
    let venue = Venue::new();
    let output = venue.cmd(&["auth", "verify"]).output().unwrap();
    assert_eq!(output.status.code(), Some(5));
}

// ── REST backend ────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_list() {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/guests"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "guests": [{
                "id": "g1",
                "name": "Alice Tan",
                "isVIP": true,
                "attendanceCount": 2,
                "checkedIn": false,
                "checkedInAt": null,
                "createdAt": "2024-12-01T09:00:00Z"
            }] },
            "error": null
        })))
        .mount(&server)
        .await;

    let api_url = format!("{}/api", server.uri());
    let home = TempDir::new().unwrap();
    let home_path = home.path().to_owned();

    let output = tokio::task::spawn_blocking(move || {
        wedly_cmd(&home_path)
            .args([
                "--api-url",
                &api_url,
                "--token",
                "test-token",
                "guests",
                "list",
                "--output",
                "plain",
            ])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "g1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_unreachable_exits_with_connection_code() {
    let home = TempDir::new().unwrap();
    let home_path = home.path().to_owned();

    let output = tokio::task::spawn_blocking(move || {
        wedly_cmd(&home_path)
            .args([
                "--api-url",
                "http://127.0.0.1:9/api",
                "--token",
                "test-token",
                "--timeout",
                "2",
                "stats",
            ])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}
