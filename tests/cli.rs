use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn renders_svg_to_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("layer-grid")?;
    cmd.arg("--input").arg(fixture("mlp.json")).arg("--focus").arg("1");
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("<svg"))
        .stdout(predicate::str::contains("id=\"link-3\""));
    Ok(())
}

#[test]
fn replays_drop_into_json_dump() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let output_path = tmp.path().join("layout.json");

    let mut cmd = Command::cargo_bin("layer-grid")?;
    cmd.arg("-i")
        .arg(fixture("mlp.json"))
        .arg("--drop")
        .arg("4:5,5")
        .arg("-e")
        .arg("json")
        .arg("-o")
        .arg(&output_path);
    cmd.assert().success();

    let dump: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output_path)?)?;
    assert_eq!(dump["drops"][0]["resolved"], serde_json::json!([220.0, 60.0]));
    assert_eq!(dump["nodes"][4]["x"], 220.0);
    assert_eq!(dump["nodes"][4]["y"], 60.0);
    Ok(())
}

#[test]
fn applies_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("layer-grid")?;
    cmd.arg("-i")
        .arg(fixture("mlp.json"))
        .arg("-c")
        .arg(fixture("dark.json5"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("#1E1E1E"))
        .stdout(predicate::str::contains("#4C7FBF"));
    Ok(())
}

#[test]
fn reports_invalid_graph() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("layer-grid")?;
    cmd.arg("-i").arg(fixture("dangling.json"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("references missing node 7"));
    Ok(())
}

#[test]
fn rejects_drop_of_missing_layer() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("layer-grid")?;
    cmd.arg("-i").arg(fixture("mlp.json")).arg("--drop").arg("9:0,0");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("layer 9 does not exist"));
    Ok(())
}
