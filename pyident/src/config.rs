//! Configuration loading.
//!
//! Settings come from a `.pyident.toml` in the project root or a
//! `[tool.pyident]` table in `pyproject.toml`, discovered by walking up from
//! the analysis root. The only setting is the list of disabled diagnostic
//! codes; everything else the checker needs is passed explicitly.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::check::{CodeSet, DiagnosticCode};

/// Project-local configuration file name.
pub const CONFIG_FILENAME: &str = ".pyident.toml";
/// Standard Python project manifest that may carry a `[tool.pyident]` table.
pub const PYPROJECT_FILENAME: &str = "pyproject.toml";

/// Top-level configuration struct.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// The main configuration section.
    #[serde(default)]
    pub pyident: PyidentConfig,
    /// The path of the configuration file this was loaded from.
    /// `None` when using defaults.
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

/// Configuration options for the checker.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct PyidentConfig {
    /// Diagnostic codes to disable (`literal-comparison`,
    /// `comparison-of-constants`).
    pub disable: Option<Vec<String>>,
}

impl Config {
    /// Loads configuration by walking up from `path` until a config file is
    /// found, falling back to defaults.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            let pyident_toml = current.join(CONFIG_FILENAME);
            if pyident_toml.exists() {
                if let Ok(content) = fs::read_to_string(&pyident_toml) {
                    if let Ok(mut config) = toml::from_str::<Config>(&content) {
                        config.config_file_path = Some(pyident_toml);
                        return config;
                    }
                }
            }

            let pyproject_toml = current.join(PYPROJECT_FILENAME);
            if pyproject_toml.exists() {
                if let Ok(content) = fs::read_to_string(&pyproject_toml) {
                    if let Ok(pyproject) = toml::from_str::<PyProject>(&content) {
                        return Config {
                            pyident: pyproject.tool.pyident,
                            config_file_path: Some(pyproject_toml),
                        };
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }

    /// Builds the analyzer's code enablement set from the config plus any
    /// extra codes disabled on the command line. Returns the set and the
    /// disable entries that did not name a known code.
    #[must_use]
    pub fn code_set(&self, cli_disable: &[String]) -> (CodeSet, Vec<String>) {
        let mut codes = CodeSet::all();
        let mut unknown = Vec::new();
        let config_disable = self.pyident.disable.iter().flatten();
        for entry in config_disable.chain(cli_disable) {
            match DiagnosticCode::parse(entry) {
                Some(code) => codes = codes.without(code),
                None => unknown.push(entry.clone()),
            }
        }
        (codes, unknown)
    }
}

#[derive(Debug, Deserialize, Clone)]
struct PyProject {
    tool: ToolConfig,
}

#[derive(Debug, Deserialize, Clone)]
struct ToolConfig {
    pyident: PyidentConfig,
}
