//! Tests for the tg_send binary

use std::process::Command;

use httpmock::prelude::*;
use serde_json::json;

fn tg_send(workdir: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tg_send"));
    cmd.current_dir(workdir)
        .env_remove("TELEGRAM_BOT_TOKEN")
        .env_remove("TELEGRAM_CHAT_IDS")
        .env_remove("TELEGRAM_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_binary_requires_bot_id() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = tg_send(dir.path())
        .args(["-c", "1", "-m", "hi"])
        .output()
        .expect("run tg_send");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--bot_id"));
}

#[test]
fn test_binary_debug_prints_exact_lines() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/botBOT123/sendMessage");
        then.status(200).body(r#"{"ok":true}"#);
    });

    let dir = tempfile::tempdir().expect("tempdir");
    let output = tg_send(dir.path())
        .args(["-b", "BOT123", "-c", "1,2", "-m", "hi", "-d"])
        .args(["--api_url", &server.base_url()])
        .output()
        .expect("run tg_send");

    assert!(output.status.success());
    mock.assert_calls(2);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "Sent message to chat ID 1: hi\nResponse: {\"ok\":true}\n\
         Sent message to chat ID 2: hi\nResponse: {\"ok\":true}\n"
    );
}

#[test]
fn test_binary_is_silent_without_debug() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/botBOT123/sendMessage");
        then.status(200).body(r#"{"ok":true}"#);
    });

    let dir = tempfile::tempdir().expect("tempdir");
    let output = tg_send(dir.path())
        .args(["-b", "BOT123", "-c", "1", "-m", "hi"])
        .args(["--api_url", &server.base_url()])
        .output()
        .expect("run tg_send");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}

#[test]
fn test_binary_without_payload_prints_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = tg_send(dir.path())
        .args(["-b", "BOT123", "-c", "1"])
        .output()
        .expect("run tg_send");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert_eq!(String::from_utf8_lossy(&output.stderr), "");
}

#[test]
fn test_binary_rust_log_enables_warnings() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = tg_send(dir.path())
        .env("RUST_LOG", "tg_send=warn")
        .args(["-b", "BOT123", "-c", "1"])
        .output()
        .expect("run tg_send");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("WARN"));
}

#[test]
fn test_binary_ignores_credentials_in_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = tg_send(dir.path())
        .env("TELEGRAM_BOT_TOKEN", "ENVBOT")
        .env("TELEGRAM_CHAT_IDS", "1")
        .args(["-m", "hi"])
        .output()
        .expect("run tg_send");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--bot_id"));
    assert!(stderr.contains("--chat_ids"));
}

#[test]
fn test_binary_ignores_credentials_in_dotenv() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join(".env"),
        "TELEGRAM_BOT_TOKEN=ENVBOT\nTELEGRAM_CHAT_IDS=1\n",
    )
    .expect("write .env");

    let output = tg_send(dir.path())
        .args(["-m", "hi"])
        .output()
        .expect("run tg_send");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--bot_id"));
}

#[test]
fn test_binary_reads_api_url_from_dotenv() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/botBOT123/sendMessage");
        then.status(200).body(r#"{"ok":true}"#);
    });

    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join(".env"),
        format!("TELEGRAM_API_URL={}\n", server.base_url()),
    )
    .expect("write .env");

    let output = tg_send(dir.path())
        .args(["-b", "BOT123", "-c", "1", "-m", "hi"])
        .output()
        .expect("run tg_send");

    assert!(output.status.success());
    mock.assert_calls(1);
}

#[test]
fn test_binary_keeps_sending_after_rejected_chat() {
    let server = MockServer::start();
    let rejected = server.mock(|when, then| {
        when.method(POST)
            .path("/botBOT123/sendMessage")
            .body("chat_id=1&text=hi");
        then.status(403).body(
            r#"{"ok":false,"error_code":403,"description":"Forbidden: bot was blocked by the user"}"#,
        );
    });
    let delivered = server.mock(|when, then| {
        when.method(POST)
            .path("/botBOT123/sendMessage")
            .body("chat_id=2&text=hi");
        then.status(200).body(r#"{"ok":true}"#);
    });

    let dir = tempfile::tempdir().expect("tempdir");
    let output = tg_send(dir.path())
        .args(["-b", "BOT123", "-c", "1,2", "-m", "hi", "-d"])
        .args(["--api_url", &server.base_url()])
        .output()
        .expect("run tg_send");

    assert!(!output.status.success());
    rejected.assert_calls(1);
    delivered.assert_calls(1);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Sent message to chat ID 2: hi"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Delivery failed for 1 of 2 chats"));
    assert!(stderr.contains("bot was blocked"));
}

#[test]
fn test_binary_missing_file_fails_without_requests() {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.method(POST);
        then.status(200).body(r#"{"ok":true}"#);
    });

    let dir = tempfile::tempdir().expect("tempdir");
    let output = tg_send(dir.path())
        .args(["-b", "BOT123", "-c", "1", "-m", "hi", "-f", "missing.pdf"])
        .args(["--api_url", &server.base_url()])
        .output()
        .expect("run tg_send");

    assert!(!output.status.success());
    any.assert_calls(0);
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.pdf"));
}
