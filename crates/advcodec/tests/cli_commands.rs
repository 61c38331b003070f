#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;

fn advcodec(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_advcodec"))
        .env_remove("ADVCODEC_UNMATCHED_GROUP")
        .args(["--log-level", "error", "--format", "json"])
        .args(args)
        .output()
        .expect("advcodec should run")
}

fn json_stdout(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn unique_temp_file(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "advcodec-{tag}-{}-{}.json",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ))
}

#[test]
fn version_prints_package_version() {
    let output = advcodec(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with(&format!("advcodec {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn encode_then_decode_by_identifier() {
    let output = advcodec(&[
        "encode",
        "--profile",
        "Environmental Sensing",
        "--json",
        r#"{"battery": 87, "temperature": 23.45}"#,
    ]);
    assert!(output.status.success());
    let encoded = json_stdout(&output);
    assert_eq!(encoded["identifier"], "0xFFFF");
    assert_eq!(encoded["payload_size"], 9);
    assert_eq!(encoded["payload"], "ffff57092900000000");

    let output = advcodec(&["decode", "ff ff 57 09 29 00 00 00 00"]);
    assert!(output.status.success());
    let decoded = json_stdout(&output);
    assert!(decoded["schema_id"]
        .as_str()
        .is_some_and(|id| id.ends_with("decoded-values.schema.json")));
    assert_eq!(decoded["profile"], "Environmental Sensing");
    assert_eq!(decoded["values"]["battery"], 87.0);
    assert_eq!(decoded["values"]["humidity"], 0.0);
    let temperature = decoded["values"]["temperature"].as_f64().expect("temperature");
    assert!((temperature - 23.45).abs() < 1e-9);
}

#[test]
fn decode_by_group_reads_scaled_signed_values() {
    let output = advcodec(&[
        "decode",
        "03fffe0c00000000000000000000",
        "--group",
        "motion",
    ]);
    assert!(output.status.success());
    let decoded = json_stdout(&output);
    assert_eq!(decoded["profile"], "Motion_Sensors");
    let accel_x = decoded["values"]["accel_x"].as_f64().expect("accel_x");
    assert!((accel_x + 0.5).abs() < 1e-9);
    assert_eq!(decoded["values"].as_object().map(|values| values.len()), Some(6));
}

#[test]
fn decode_errors_map_to_exit_codes() {
    // Motion payload against the environmental layout.
    let output = advcodec(&["decode", "03ff0000", "--group", "environmental"]);
    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error: decode"));

    let output = advcodec(&["decode", "03ff00", "--group", "motion"]);
    assert_eq!(output.status.code(), Some(60));

    let output = advcodec(&["decode", "zz"]);
    assert_eq!(output.status.code(), Some(60));

    let output = advcodec(&["decode", "3412", "--profile", "Nope"]);
    assert_eq!(output.status.code(), Some(2));

    let output = advcodec(&["decode", "3412"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn encode_rejects_bad_input() {
    let output = advcodec(&["encode", "--group", "motion", "--json", "[1, 2]"]);
    assert_eq!(output.status.code(), Some(60));

    let output = advcodec(&["encode", "--group", "motion", "--json", "{oops"]);
    assert_eq!(output.status.code(), Some(60));

    let missing = unique_temp_file("missing");
    let output = advcodec(&[
        "encode",
        "--group",
        "motion",
        "--file",
        missing.to_str().expect("utf-8 temp path"),
    ]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn classify_uses_keywords_and_fallback() {
    let output = advcodec(&["classify", "BMP280", "mpu6050", "mystery_probe"]);
    assert!(output.status.success());
    let classified = json_stdout(&output);
    let sensors = classified["sensors"].as_array().expect("sensors array");
    assert_eq!(sensors.len(), 3);
    assert_eq!(sensors[0]["group"], "environmental");
    assert_eq!(sensors[1]["group"], "motion");
    assert_eq!(sensors[2]["group"], "environmental");
    assert_eq!(
        sensors[1]["service_id"],
        "a5b10003-6d2c-4e1a-9f3b-5c0d8e2a7f10"
    );

    let output = Command::new(env!("CARGO_BIN_EXE_advcodec"))
        .env("ADVCODEC_UNMATCHED_GROUP", "unknown")
        .args(["--format", "json", "classify", "mystery_probe"])
        .output()
        .expect("advcodec should run");
    assert!(output.status.success());
    let classified = json_stdout(&output);
    assert_eq!(classified["sensors"][0]["group"], "unknown");
    assert!(classified["sensors"][0]["service_id"].is_null());
}

#[test]
fn pack_emits_one_packet_per_group() {
    let path = unique_temp_file("pack");
    std::fs::write(
        &path,
        r#"{"bmp280": {"temperature": 21.5}, "mpu6050": {"accel_x": -0.5}}"#,
    )
    .expect("temp file should be writable");

    let output = advcodec(&["pack", "--file", path.to_str().expect("utf-8 temp path")]);
    let _ = std::fs::remove_file(&path);
    assert!(output.status.success());

    let packed = json_stdout(&output);
    let packets = packed["packets"].as_array().expect("packets array");
    assert_eq!(packets.len(), 2);

    assert_eq!(packets[0]["group"], "environmental");
    assert_eq!(packets[0]["identifier"], "0xFF01");
    assert_eq!(packets[0]["payload_size"], 13);
    assert_eq!(packets[0]["payload"], "01ff0008660000000000000000");

    assert_eq!(packets[1]["group"], "motion");
    assert_eq!(packets[1]["identifier"], "0xFF03");
    assert_eq!(packets[1]["payload"], "03fffe0c00000000000000000000");
}

#[test]
fn pack_skips_unmatched_sensors_when_unknown() {
    let output = advcodec(&[
        "--unmatched-group",
        "unknown",
        "pack",
        "--json",
        r#"{"mystery_probe": {"value": 1}}"#,
    ]);
    assert!(output.status.success());
    let packed = json_stdout(&output);
    assert_eq!(packed["packets"].as_array().map(Vec::len), Some(0));
}

#[test]
fn profiles_lists_catalog_and_groups() {
    let output = advcodec(&["profiles"]);
    assert!(output.status.success());
    let listed = json_stdout(&output);
    let profiles = listed["profiles"].as_array().expect("profiles array");
    assert_eq!(profiles.len(), 11);
    assert_eq!(profiles[0]["name"], "Environmental Sensing");

    let output = advcodec(&["profiles", "--group", "environmental"]);
    assert!(output.status.success());
    let listed = json_stdout(&output);
    let names: Vec<&str> = listed["profiles"]
        .as_array()
        .expect("profiles array")
        .iter()
        .filter_map(|profile| profile["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Environmental_Sensors", "Weather_Station"]);
}

#[test]
fn show_prints_profile_layout() {
    let output = advcodec(&["show", "Motion_Sensors"]);
    assert!(output.status.success());
    let shown = json_stdout(&output);
    assert_eq!(shown["name"], "Motion_Sensors");
    assert_eq!(shown["identifier"], 0xFF03);

    let output = advcodec(&["show", "Nope"]);
    assert_eq!(output.status.code(), Some(2));
}
