//! Command line interface definition.

use clap::Parser;
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.pyident.toml or [tool.pyident] in pyproject.toml):

  [pyident]
  # Diagnostic codes to disable
  disable = [\"comparison-of-constants\"]

Findings on lines with a '# pragma: no pyident' comment are suppressed.
";

/// Command line interface configuration using `clap`.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "pyident - flags 'is' / 'is not' comparisons against literal values in Python code",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    /// Paths to check (files or directories).
    /// Defaults to the current directory when no paths are provided.
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Output raw JSON.
    #[arg(long)]
    pub json: bool,

    /// Disable a diagnostic code (repeatable).
    #[arg(long, value_name = "CODE")]
    pub disable: Vec<String>,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}
