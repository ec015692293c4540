//! File discovery and parallel per-file checking.
//!
//! Files are independent: one `Checker` is shared read-only across worker
//! threads and each file gets its own traversal and constant tables, so the
//! whole run is embarrassingly parallel.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::Serialize;

use crate::check::{Checker, Finding};

/// A file that could not be read or parsed.
#[derive(Debug, Clone, Serialize)]
pub struct ParseError {
    /// The offending file.
    pub file: PathBuf,
    /// Human-readable reason.
    pub error: String,
}

/// Aggregated result of one run.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    /// All findings, ordered by file then source position.
    pub findings: Vec<Finding>,
    /// Files that failed to read or parse.
    pub parse_errors: Vec<ParseError>,
    /// Number of Python files checked.
    pub files_checked: usize,
}

/// Checks every Python file reachable from `paths`.
#[must_use]
pub fn run(paths: &[PathBuf], checker: &Checker) -> RunReport {
    let mut files = collect_python_files(paths);
    files.sort();
    files.dedup();

    let mut per_file: Vec<(PathBuf, Vec<Finding>, Option<String>)> = files
        .par_iter()
        .map(|file| match fs::read_to_string(file) {
            Ok(source) => {
                let report = checker.check_source(&source, file);
                (file.clone(), report.findings, report.parse_error)
            }
            Err(e) => (file.clone(), Vec::new(), Some(format!("Failed to read file: {e}"))),
        })
        .collect();
    // Deterministic output order regardless of worker scheduling.
    per_file.sort_by(|a, b| a.0.cmp(&b.0));

    let mut report = RunReport {
        files_checked: files.len(),
        ..RunReport::default()
    };
    for (file, findings, parse_error) in per_file {
        report.findings.extend(findings);
        if let Some(error) = parse_error {
            report.parse_errors.push(ParseError { file, error });
        }
    }
    report
}

fn collect_python_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            if is_python_file(path) {
                files.push(path.clone());
            }
            continue;
        }
        for entry in WalkBuilder::new(path).build().flatten() {
            let entry_path = entry.path();
            if entry_path.is_file() && is_python_file(entry_path) {
                files.push(entry_path.to_path_buf());
            }
        }
    }
    files
}

fn is_python_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "py")
}
