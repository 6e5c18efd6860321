use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

const DINER: &str = "Joe's Diner\n01/15/2024\nBurger 8.99\n2 x Fries 3.50\nSUBTOTAL 15.99\nTAX 1.28\nTOTAL 17.27\nVISA ENDING 1234\n";

fn slip() -> Command {
    Command::cargo_bin("slip").unwrap()
}

#[test]
fn test_process_prints_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("diner.txt");
    fs::write(&input, DINER).unwrap();

    let output = slip()
        .args(["process", "--format", "json"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["merchant"], "Joe's Diner");
    assert_eq!(json["date"], "01/15/2024");
    assert_eq!(json["total"], serde_json::json!(17.27));
    assert_eq!(json["items"][1]["quantity"], 2);
    assert_eq!(json["confidence"], serde_json::json!(1.0));
}

#[test]
fn test_process_reads_stdin() {
    slip()
        .args(["process", "--format", "text", "--date", "2024-06-01", "-"])
        .write_stdin("Total $42.00\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Merchant: Unknown Merchant"))
        .stdout(predicate::str::contains("Date: 2024-06-01"))
        .stdout(predicate::str::contains("Total:    42.00"));
}

#[test]
fn test_process_rejects_blank_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("blank.txt");
    fs::write(&input, "   \n\n").unwrap();

    slip()
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid input"));
}

#[test]
fn test_process_missing_file() {
    slip()
        .args(["process", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_batch_writes_outputs_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = dir.path().join("in");
    let outputs = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("diner.txt"), DINER).unwrap();
    fs::write(inputs.join("empty.txt"), "\n").unwrap();

    let pattern = format!("{}/*.txt", inputs.display());

    slip()
        .args(["batch", &pattern, "--summary", "--continue-on-error", "--format", "json"])
        .arg("--output-dir")
        .arg(&outputs)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful"));

    assert!(outputs.join("diner.json").exists());
    assert!(!outputs.join("empty.json").exists());

    let summary = fs::read_to_string(outputs.join("summary.csv")).unwrap();
    assert!(summary.contains("diner.txt,success,Joe's Diner,01/15/2024"));
    assert!(summary.contains("empty.txt,error"));
}

#[test]
fn test_config_init_and_set() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    let config_arg = config.to_str().unwrap();

    slip()
        .args(["--config", config_arg, "config", "init"])
        .assert()
        .success();

    slip()
        .args(["--config", config_arg, "config", "set", "extraction.item_price_ceiling", "20"])
        .assert()
        .success();

    slip()
        .args(["--config", config_arg, "config", "get", "extraction.item_price_ceiling"])
        .assert()
        .success()
        .stdout(predicate::str::contains("20"));

    slip()
        .args(["--config", config_arg, "config", "set", "extraction.bogus", "1"])
        .assert()
        .failure();
}

#[test]
fn test_config_ceiling_applies_to_process() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"extraction": {"item_price_ceiling": 20}}"#).unwrap();

    let output = slip()
        .args(["--config", config.to_str().unwrap(), "process", "--format", "json", "-"])
        .write_stdin("Hardware Store\nHammer 12.00\nDrill 89.00\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
    assert_eq!(json["items"][0]["name"], "Hammer");
}
