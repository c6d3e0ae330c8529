//! Binary-level tests: exit status and stream separation.

mod common;

use std::process::Command;

fn laptop_price() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_laptop-price"));
    cmd.env_remove("RUST_LOG")
        .env_remove("LAPTOP_PRICE_CONFIG")
        .env_remove("LAPTOP_PRICE_DATASET")
        .env_remove("LAPTOP_PRICE_MODEL");
    cmd
}

#[test]
fn examples_prints_quotes_on_stdout() {
    let output = laptop_price()
        .arg("--dataset")
        .arg(common::dataset_path())
        .arg("--model")
        .arg(common::model_path())
        .arg("examples")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.lines().all(|l| l.contains("💰 Predicted Price: ₹")));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("loaded model artifact"));
}

#[test]
fn missing_model_exits_nonzero_with_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let output = laptop_price()
        .arg("--dataset")
        .arg(common::dataset_path())
        .arg("--model")
        .arg(dir.path().join("absent.json"))
        .arg("examples")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("model artifact"), "{stderr}");
    assert!(stderr.contains("absent.json"), "{stderr}");
}

#[test]
fn env_vars_locate_artifacts() {
    let output = laptop_price()
        .env("LAPTOP_PRICE_DATASET", common::dataset_path())
        .env("LAPTOP_PRICE_MODEL", common::model_path())
        .args(["domains", "--column", "ROM_type"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "SSD\n");
}
