//! File discovery, parallel checking, and report rendering.
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;

use pyident::check::{Checker, CodeSet};
use pyident::{output, runner};
use tempfile::TempDir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn checks_every_python_file_under_a_directory() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write_file(&root.join("a.py"), "x = 2 is 2\n");
    write_file(&root.join("pkg/b.py"), "y = [] is [1]\n");
    write_file(&root.join("notes.txt"), "2 is 2\n");

    let checker = Checker::new(CodeSet::all());
    let report = runner::run(&[root.to_path_buf()], &checker);

    assert_eq!(report.files_checked, 2);
    assert!(report.parse_errors.is_empty());
    // a.py: both codes; b.py: literal-comparison only.
    assert_eq!(report.findings.len(), 3);

    // Output order is by file path, then source position.
    let files: Vec<_> = report
        .findings
        .iter()
        .map(|finding| finding.file.clone())
        .collect();
    let mut sorted = files.clone();
    sorted.sort();
    assert_eq!(files, sorted);
}

#[test]
fn single_file_path_is_checked_directly() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("only.py");
    write_file(&file, "z = 'a' is b'a'\n");

    let report = runner::run(&[file.clone()], &Checker::default());
    assert_eq!(report.files_checked, 1);
    assert_eq!(report.findings.len(), 2);
    assert_eq!(report.findings[0].file, file);
}

#[test]
fn unreadable_or_unparsable_files_become_parse_errors() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_file(&root.join("ok.py"), "x = 1\n");
    write_file(&root.join("broken.py"), "def (:\n");

    let report = runner::run(&[root.to_path_buf()], &Checker::default());
    assert_eq!(report.files_checked, 2);
    assert_eq!(report.parse_errors.len(), 1);
    assert!(report.parse_errors[0]
        .file
        .to_string_lossy()
        .ends_with("broken.py"));
    assert!(report.findings.is_empty());
}

#[test]
fn duplicate_paths_are_checked_once() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("dup.py");
    write_file(&file, "x = 2 is 2\n");

    let report = runner::run(&[file.clone(), file], &Checker::default());
    assert_eq!(report.files_checked, 1);
    assert_eq!(report.findings.len(), 2);
}

#[test]
fn text_output_lists_findings_and_summary() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("t.py");
    write_file(&file, "x = 2 is 2\n");
    colored::control::set_override(false);

    let report = runner::run(&[file], &Checker::default());
    let mut buffer = Vec::new();
    output::print_text(&mut buffer, &report).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    assert!(text.contains("t.py:1:4: literal-comparison"), "{text}");
    assert!(text.contains("comparison-of-constants"), "{text}");
    assert!(text.contains("1 file(s) checked, 2 finding(s)"), "{text}");
}

#[test]
fn json_output_is_machine_readable() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("j.py");
    write_file(&file, "x = 2 is 2\n");

    let report = runner::run(&[file], &Checker::default());
    let mut buffer = Vec::new();
    output::print_json(&mut buffer, &report).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

    assert_eq!(value["files_checked"], 1);
    assert_eq!(value["findings"].as_array().unwrap().len(), 2);
    assert_eq!(value["findings"][0]["rule_id"], "literal-comparison");
    assert_eq!(value["findings"][0]["line"], 1);
    assert_eq!(value["parse_errors"].as_array().unwrap().len(), 0);
}
