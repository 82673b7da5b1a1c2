use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_log-lens")
}

fn write_file(path: &Path, content: &str) {
    fs::write(path, content).expect("failed to write test file");
}

fn run(args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("LOG_LENS_CONFIG")
        .output()
        .expect("command should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const SAMPLE: &str = "\
2024-03-01 10:00:00 INFO service started
2024-03-01 10:00:01 ERROR database <primary> unreachable
2024-03-01 10:00:02 WARN retrying in 5s
2024-03-01 10:00:03 ERROR cache & queue unavailable
";

#[test]
fn test_export_prints_raw_filtered_lines() {
    let dir = tempdir().expect("temp dir");
    let log = dir.path().join("app.log");
    write_file(&log, SAMPLE);

    let output = run(&[
        "export",
        log.to_str().expect("utf8 path"),
        "-r",
        "include:error",
        "-r",
        "exclude:cache",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "2024-03-01 10:00:01 ERROR database <primary> unreachable\n"
    );
}

#[test]
fn test_view_json_reports_counts() {
    let dir = tempdir().expect("temp dir");
    let log = dir.path().join("app.log");
    write_file(&log, SAMPLE);

    let output = run(&[
        "-F",
        "json",
        "view",
        log.to_str().expect("utf8 path"),
        "-r",
        "regex:ERROR|WARN",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    assert_eq!(value["total_lines"], 4);
    assert_eq!(value["filtered_lines"], 3);
    assert_eq!(value["total_pages"], 1);
    assert_eq!(value["lines"][0]["line_number"], 2);
    assert_eq!(value["lines"][0]["level"], "ERROR");
}

#[test]
fn test_html_output_written_to_file_is_escaped() {
    let dir = tempdir().expect("temp dir");
    let log = dir.path().join("app.log");
    let out = dir.path().join("page.html");
    write_file(&log, SAMPLE);

    let output = run(&[
        "-F",
        "html",
        "-o",
        out.to_str().expect("utf8 path"),
        "view",
        log.to_str().expect("utf8 path"),
        "-r",
        "include:primary",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());

    let html = fs::read_to_string(&out).expect("output file should exist");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("&lt;<mark>primary</mark>&gt;"));
    assert!(!html.contains("<primary>"));
}

#[test]
fn test_only_invalid_regex_fails_with_no_lines() {
    let dir = tempdir().expect("temp dir");
    let log = dir.path().join("app.log");
    write_file(&log, SAMPLE);

    let output = run(&[
        "--color",
        "never",
        "view",
        log.to_str().expect("utf8 path"),
        "-r",
        "regex:(unclosed",
    ]);

    assert!(!output.status.success());
    assert!(stdout(&output).contains("No matches"));
    assert!(stderr(&output).contains("Regex error in '(unclosed'"));
}

#[test]
fn test_invalid_regex_next_to_valid_rule_still_filters() {
    let dir = tempdir().expect("temp dir");
    let log = dir.path().join("app.log");
    write_file(&log, SAMPLE);

    let output = run(&[
        "export",
        log.to_str().expect("utf8 path"),
        "-r",
        "include:warn",
        "-r",
        "or:regex:[",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "2024-03-01 10:00:02 WARN retrying in 5s\n");
}

#[test]
fn test_page_flag_is_clamped() {
    let dir = tempdir().expect("temp dir");
    let log = dir.path().join("big.log");
    let content: String = (1..=4500).map(|i| format!("entry {i}\n")).collect();
    write_file(&log, &content);

    let output = run(&[
        "export",
        log.to_str().expect("utf8 path"),
        "--page",
        "999",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert_eq!(text.lines().count(), 100);
    assert_eq!(text.lines().next(), Some("entry 4401"));
}

#[test]
fn test_config_rules_and_page_size() {
    let dir = tempdir().expect("temp dir");
    let log = dir.path().join("big.log");
    let config = dir.path().join("lens.toml");
    let content: String = (1..=3000).map(|i| format!("entry {i}\n")).collect();
    write_file(&log, &content);
    write_file(
        &config,
        "[pagination]\npage_size = 10\n\n[[rules]]\nkind = \"starts_with\"\npattern = \"entry 1\"\n",
    );

    let output = run(&[
        "--config",
        config.to_str().expect("utf8 path"),
        "-F",
        "json",
        "view",
        log.to_str().expect("utf8 path"),
        "--page",
        "2",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    assert_eq!(value["page"], 2);
    assert_eq!(value["page_size"], 10);
    assert_eq!(value["lines"].as_array().map(Vec::len), Some(10));
    assert_eq!(value["lines"][0]["display_index"], 11);
}

#[test]
fn test_stats_json_counts_levels() {
    let dir = tempdir().expect("temp dir");
    let log = dir.path().join("app.log");
    write_file(&log, SAMPLE);

    let output = run(&["-F", "json", "stats", log.to_str().expect("utf8 path")]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    assert_eq!(value["levels"]["ERROR"], 2);
    assert_eq!(value["levels"]["INFO"], 1);
    assert_eq!(value["levels"]["WARN"], 1);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempdir().expect("temp dir");
    let missing = dir.path().join("nope.log");

    let output = run(&["view", missing.to_str().expect("utf8 path")]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to load log file"));
}

#[test]
fn test_malformed_rule_is_usage_error() {
    let output = run(&["view", "whatever.log", "-r", "sideways:x"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unusable_page_size_falls_back_to_default() {
    let dir = tempdir().expect("temp dir");
    let log = dir.path().join("big.log");
    let content: String = (1..=2500).map(|i| format!("entry {i}\n")).collect();
    write_file(&log, &content);

    for size in ["0", "-5", "abc"] {
        let output = run(&[
            "-F",
            "json",
            "view",
            log.to_str().expect("utf8 path"),
            "--page-size",
            size,
        ]);

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let value: serde_json::Value =
            serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
        assert_eq!(value["page_size"], 200, "page size {size}");
        assert_eq!(value["total_pages"], 13, "page size {size}");
        assert_eq!(value["lines"].as_array().map(Vec::len), Some(200));
    }
}
