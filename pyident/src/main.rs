//! Command line entry point for the pyident checker.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use pyident::check::Checker;
use pyident::cli::Cli;
use pyident::config::Config;
use pyident::{output, runner};

fn main() -> ExitCode {
    match run() {
        Ok(clean) => {
            if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("pyident: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(true)` when no findings or parse errors were reported.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    if cli.no_color || cli.json {
        colored::control::set_override(false);
    }

    let config_root = cli
        .paths
        .first()
        .map_or_else(|| std::path::PathBuf::from("."), Clone::clone);
    let config = Config::load_from_path(&config_root);
    let (codes, unknown) = config.code_set(&cli.disable);
    for code in unknown {
        eprintln!("pyident: warning: unknown diagnostic code '{code}'");
    }

    let checker = Checker::new(codes);
    let report = runner::run(&cli.paths, &checker);

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    if cli.json {
        output::print_json(&mut writer, &report)?;
    } else {
        output::print_text(&mut writer, &report)?;
    }
    writer.flush()?;

    Ok(report.findings.is_empty() && report.parse_errors.is_empty())
}
