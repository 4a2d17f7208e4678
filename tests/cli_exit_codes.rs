use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_cli(root: &std::path::Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_thousandchars-etl"))
        .arg("--root")
        .arg(root)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch thousandchars-etl")
}

#[test]
fn test_no_source_exits_zero() {
    let temp_dir = TempDir::new().unwrap();

    let output = run_cli(temp_dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No source file found; skipping."));
    assert!(!temp_dir.path().join("codefree").exists());
}

#[test]
fn test_malformed_source_exits_one() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("codefree")).unwrap();
    fs::write(temp_dir.path().join("codefree/thousandChars_v1.json"), "[{").unwrap();

    let output = run_cli(temp_dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("codefree/thousandChars_v1.json"));
}

#[test]
fn test_write_then_no_changes() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("codefree")).unwrap();
    fs::write(
        temp_dir.path().join("codefree/1000ja.csv"),
        "hanja,reading,meaning\n愛,ai,love\n",
    )
    .unwrap();

    let first = run_cli(temp_dir.path(), &[]);
    assert_eq!(first.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&first.stdout).contains("with 1 items."));

    let second = run_cli(temp_dir.path(), &[]);
    assert_eq!(second.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&second.stdout).contains("No changes in JSON."));
}

#[test]
fn test_dry_run_does_not_create_output() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("codefree")).unwrap();
    fs::write(temp_dir.path().join("codefree/1000ja.csv"), "ch,mean\n水,water\n").unwrap();

    let output = run_cli(temp_dir.path(), &["--dry-run"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Dry run"));
    assert!(!temp_dir.path().join("codefree/thousandChars_v1.json").exists());
}

#[test]
fn test_invalid_config_exits_one() {
    let temp_dir = TempDir::new().unwrap();

    let output = run_cli(temp_dir.path(), &["--output", "codefree/out.csv"]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_toml_config_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("data")).unwrap();
    fs::write(temp_dir.path().join("data/list.json"), r#"{"data":[{"한자":"天","음":"천"}]}"#).unwrap();

    let config_path = temp_dir.path().join("build.toml");
    fs::write(
        &config_path,
        format!(
            "root = '{}'\n[source]\ncandidates = [\"data/list.json\"]\n[output]\npath = \"out/chars.json\"\n",
            temp_dir.path().display()
        ),
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_thousandchars-etl"))
        .arg("--config")
        .arg(&config_path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let written = fs::read_to_string(temp_dir.path().join("out/chars.json")).unwrap();
    assert!(written.contains("\"ch\": \"天\""));
}
