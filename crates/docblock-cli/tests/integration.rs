//! Integration tests for the docblock CLI

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn docblock_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_docblock"))
}

/// Unique temp path so parallel tests don't collide
fn temp_path(name: &str, ext: &str) -> PathBuf {
    let unique_id = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!(
        "docblock_test_{}_{}_{}.{}",
        name,
        std::process::id(),
        unique_id,
        ext
    ))
}

/// Run docblock on fixture files, from inside the fixtures directory
fn run(fixtures: &[&str], args: &[&str]) -> Output {
    let mut cmd = Command::new(docblock_binary());
    cmd.current_dir(fixtures_dir());
    for name in fixtures {
        cmd.arg(fixtures_dir().join(format!("{}.txt", name)));
    }
    cmd.args(args);
    cmd.output().expect("Failed to run docblock")
}

fn stdout_of(fixtures: &[&str], args: &[&str]) -> String {
    let output = run(fixtures, args);
    assert!(
        output.status.success(),
        "docblock failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("Invalid UTF-8")
}

#[test]
fn test_text_output() {
    let output = stdout_of(&["docblock"], &[]);
    insta::assert_snapshot!(output, @r"
    short: the heading
    long: the body
    param: string $foo - The foo parameter
    param: int $bar - Number of bars
    @return: null
    ");
}

#[test]
fn test_json_output() {
    let output = stdout_of(&["var_only"], &["-f", "json"]);
    let value: serde_json::Value = serde_json::from_str(&output).expect("Invalid JSON");
    assert_eq!(value["short_description"], "");
    assert_eq!(value["long_description"], "");
    assert_eq!(value["tags"], serde_json::json!(["@var string"]));
}

#[test]
fn test_compact_json_is_single_line() {
    let output = stdout_of(&["docblock"], &["-f", "json", "--compact"]);
    assert_eq!(output.lines().count(), 1);
}

#[test]
fn test_tag_query() {
    assert_eq!(stdout_of(&["docblock"], &["-t", "return"]), "null\n");
    assert_eq!(stdout_of(&["var_only"], &["--tag", "var"]), "string\n");
    assert_eq!(
        stdout_of(&["throws"], &["-t", "throws"]),
        "SomeException The description\nAnotherException The other description\n"
    );
}

#[test]
fn test_missing_tag_fails() {
    let output = run(&["docblock"], &["-t", "author"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No @author tag found"), "stderr: {}", stderr);
}

#[test]
fn test_unknown_tag_fails() {
    let output = run(&["docblock"], &["-t", "unknownthing"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown tag name"), "stderr: {}", stderr);
}

#[test]
fn test_check_rejects_malformed_param() {
    assert!(run(&["malformed_param"], &[]).status.success());

    let output = run(&["malformed_param"], &["--check"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Malformed @param tag"), "stderr: {}", stderr);
}

#[test]
fn test_multiple_inputs_keep_order() {
    let output = stdout_of(&["var_only", "docblock", "throws"], &[]);
    let headers: Vec<_> = output
        .lines()
        .filter(|line| line.starts_with("==> "))
        .map(|line| line.contains("var_only"))
        .collect();
    assert_eq!(headers, vec![true, false, false]);
    let docblock_pos = output.find("docblock.txt").unwrap();
    let throws_pos = output.find("throws.txt").unwrap();
    assert!(docblock_pos < throws_pos);
}

#[test]
fn test_one_failure_fails_run() {
    let output = run(&["docblock"], &["does_not_exist.txt"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("short: the heading"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does_not_exist.txt"));
}

#[test]
fn test_stdin_input() {
    let mut child = Command::new(docblock_binary())
        .current_dir(fixtures_dir())
        .args(["-", "-t", "var"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to run docblock");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"/**\n * @var int\n */")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "int\n");
}

#[test]
fn test_config_file() {
    let config = temp_path("config", "toml");
    fs::write(&config, "[output]\nformat = \"json\"\npretty = false\n").unwrap();

    let output = stdout_of(&["var_only"], &["--config", config.to_str().unwrap()]);
    let _ = fs::remove_file(&config);

    assert_eq!(
        output,
        "{\"short_description\":\"\",\"long_description\":\"\",\"param_tags\":[],\"tags\":[\"@var string\"]}\n"
    );
}

#[test]
fn test_init_config() {
    let output_file = temp_path("init", "toml");

    let status = Command::new(docblock_binary())
        .arg("init")
        .arg("-o")
        .arg(&output_file)
        .status()
        .expect("Failed to run docblock init");
    assert!(status.success(), "docblock init failed");

    let content = fs::read_to_string(&output_file).expect("Failed to read config file");

    // A second init must not overwrite
    let status = Command::new(docblock_binary())
        .arg("init")
        .arg("-o")
        .arg(&output_file)
        .status()
        .expect("Failed to run docblock init");
    let _ = fs::remove_file(&output_file);

    assert!(!status.success());
    assert!(content.starts_with("#:schema "));
    assert!(content.contains("[output]"));
    assert!(content.contains("format = \"text\""));
    assert!(content.contains("[check]"));
}

#[test]
fn test_init_schema() {
    let output = Command::new(docblock_binary())
        .arg("init")
        .arg("--schema")
        .output()
        .expect("Failed to run docblock init --schema");

    assert!(output.status.success(), "docblock init --schema failed");

    let schema: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Invalid schema JSON");
    assert_eq!(schema["title"], "Config");
}
