//! End-to-end tests of the scsplit binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_inputs(dir: &Path) {
    let n_cells = 40;
    let ids: Vec<String> = (0..n_cells).map(|i| format!("cell{}", i)).collect();

    let mut counts = format!("gene,{}\n", ids.join(","));
    for g in 0..2 {
        let values: Vec<String> = (0..n_cells).map(|c| ((c + g) % 3).to_string()).collect();
        counts.push_str(&format!("g{},{}\n", g, values.join(",")));
    }
    fs::write(dir.join("counts.csv"), counts).unwrap();

    let mut labels = String::from("id;type\n");
    for id in &ids {
        labels.push_str(&format!("{};neuron\n", id));
    }
    fs::write(dir.join("labels.csv"), labels).unwrap();
}

#[test]
fn test_cli_split_with_summary() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path());
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    let summary_path = dir.path().join("summary.json");

    Command::cargo_bin("scsplit")
        .unwrap()
        .arg(dir.path().join("counts.csv"))
        .arg(dir.path().join("labels.csv"))
        .arg(&out)
        .args(["--label-column", "0", "--generation-fraction", "0.75"])
        .arg("--summary")
        .arg(&summary_path)
        .assert()
        .success();

    for name in [
        "generation.counts.csv",
        "validation.counts.csv",
        "generation.labels.csv",
        "validation.labels.csv",
    ] {
        assert!(out.join(name).exists(), "missing {}", name);
    }

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(summary["n_generation"], 30);
    assert_eq!(summary["n_validation"], 10);
    assert_eq!(summary["config"]["split"]["seed"], 1337);
}

#[test]
fn test_cli_no_shuffle_overrides_config() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path());
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    let config_path = dir.path().join("split.yaml");
    fs::write(&config_path, "split:\n  shuffle: true\n").unwrap();
    let summary_path = dir.path().join("summary.json");

    Command::cargo_bin("scsplit")
        .unwrap()
        .arg(dir.path().join("counts.csv"))
        .arg(dir.path().join("labels.csv"))
        .arg(&out)
        .arg("--config")
        .arg(&config_path)
        .args(["--label-column", "0", "--generation-fraction", "0.75", "--no-shuffle"])
        .arg("--summary")
        .arg(&summary_path)
        .assert()
        .success();

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(summary["config"]["split"]["shuffle"], false);

    // Unshuffled, the last quarter of the cells goes to validation
    let validation = fs::read_to_string(out.join("validation.labels.csv")).unwrap();
    let ids: Vec<&str> = validation
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap())
        .collect();
    let expected: Vec<String> = (30..40).map(|i| format!("cell{}", i)).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_cli_missing_input_fails() {
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("scsplit")
        .unwrap()
        .arg(dir.path().join("nope.csv"))
        .arg(dir.path().join("labels.csv"))
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_cli_rejects_bad_fraction() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path());

    Command::cargo_bin("scsplit")
        .unwrap()
        .arg(dir.path().join("counts.csv"))
        .arg(dir.path().join("labels.csv"))
        .arg(dir.path())
        .args(["--label-column", "0", "--generation-fraction", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("generation fraction"));
}

#[test]
fn test_cli_requires_three_arguments() {
    Command::cargo_bin("scsplit")
        .unwrap()
        .arg("counts.csv")
        .assert()
        .failure();
}
