//! Rendering of run reports: plain text for humans, JSON for tooling.

use std::io::Write;

use colored::Colorize;

use crate::runner::RunReport;

/// Prints findings and parse errors in `file:line:col` form, followed by a
/// one-line summary.
pub fn print_text(writer: &mut impl Write, report: &RunReport) -> std::io::Result<()> {
    for finding in &report.findings {
        writeln!(
            writer,
            "{}:{}:{}: {} {}",
            finding.file.display(),
            finding.line,
            finding.col,
            finding.rule_id.yellow().bold(),
            finding.message
        )?;
    }

    for parse_error in &report.parse_errors {
        writeln!(
            writer,
            "{}: {} {}",
            parse_error.file.display(),
            "parse-error".red().bold(),
            parse_error.error
        )?;
    }

    let summary = format!(
        "{} file(s) checked, {} finding(s), {} parse error(s)",
        report.files_checked,
        report.findings.len(),
        report.parse_errors.len()
    );
    if report.findings.is_empty() && report.parse_errors.is_empty() {
        writeln!(writer, "{}", summary.green())
    } else {
        writeln!(writer, "{}", summary.bold())
    }
}

/// Prints the full report as pretty JSON.
pub fn print_json(writer: &mut impl Write, report: &RunReport) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}
