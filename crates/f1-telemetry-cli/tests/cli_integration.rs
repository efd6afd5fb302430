//! Integration tests for the f1-telemetry binary

use assert_cmd::Command;
use f1_telemetry_protocol::packets::PacketSessionData;
use f1_telemetry_protocol::{Packet, PacketFormat, PacketHeader, PacketId};
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn f1_telemetry() -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("f1-telemetry")?;
    cmd.env_remove("RUST_LOG")
        .env_remove("F1_TELEMETRY_CONFIG")
        .env_remove("F1_TELEMETRY_BIND")
        .env_remove("F1_TELEMETRY_PORT")
        .env_remove("F1_TELEMETRY_FORMATS")
        .env_remove("F1_TELEMETRY_QUEUE_CAPACITY");
    Ok(cmd)
}

fn write_session_datagram(dir: &TempDir, format: PacketFormat) -> Result<std::path::PathBuf, std::io::Error> {
    let mut header = PacketHeader::new(format, PacketId::Session);
    header.session_uid = 0x1122_3344_5566_7788;
    header.session_time = 12.5;
    let data = PacketSessionData {
        track_id: 7,
        total_laps: 52,
        ..PacketSessionData::default()
    };
    let path = dir.path().join(format!("session-{format}.bin"));
    std::fs::write(&path, Packet { header, data }.to_bytes())?;
    Ok(path)
}

#[test]
fn sizes_json_lists_every_packet() -> TestResult {
    let output = f1_telemetry()?.args(["sizes", "--json"]).output()?;
    assert!(output.status.success());
    let rows: Value = serde_json::from_slice(&output.stdout)?;
    let rows = rows.as_array().ok_or("expected a JSON array")?;
    assert_eq!(rows.len(), 26);
    assert!(rows.iter().any(|row| {
        row["format"] == 2023 && row["name"] == "SessionHistory" && row["size"] == 1460
    }));
    Ok(())
}

#[test]
fn decode_prints_session_summary() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_session_datagram(&dir, PacketFormat::Format2022)?;
    f1_telemetry()?
        .arg("decode")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Session").and(predicate::str::contains("Silverstone")));
    Ok(())
}

#[test]
fn decode_json_emits_tagged_record() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_session_datagram(&dir, PacketFormat::Format2023)?;
    let output = f1_telemetry()?.arg("--json").arg("decode").arg(&path).output()?;
    assert!(output.status.success());
    let record: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(record["packet_type"], "Session");
    assert_eq!(record["header"]["packet_format"], 2023);
    assert_eq!(record["header"]["session_uid"], 0x1122_3344_5566_7788u64);
    assert_eq!(record["data"]["total_laps"], 52);
    Ok(())
}

#[test]
fn decode_rejects_truncated_datagram() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("short.bin");
    std::fs::write(&path, [0xE6, 0x07])?;
    f1_telemetry()?
        .arg("decode")
        .arg(&path)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("too short"));
    Ok(())
}

#[test]
fn decode_respects_format_restriction() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_session_datagram(&dir, PacketFormat::Format2022)?;
    f1_telemetry()?
        .args(["decode", "--format", "2023"])
        .arg(&path)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("unsupported packet format 2022"));
    Ok(())
}

#[test]
fn listen_rejects_port_zero() -> TestResult {
    f1_telemetry()?
        .args(["listen", "--port", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("listen port"));
    Ok(())
}

#[test]
fn listen_reports_bad_address_as_json() -> TestResult {
    let output = f1_telemetry()?
        .args(["--json", "listen", "--bind", "not-an-ip"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    let error: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(error["success"], false);
    Ok(())
}
