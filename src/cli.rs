//! CLI command implementations for monopoly-sim.

pub(crate) mod run;
pub(crate) mod simulate;
pub(crate) mod validate;

mod output;

use clap::ValueEnum;
use monopoly_sim::Settings;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SimulateFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<monopoly_sim::ConfigError> for CliError {
    fn from(e: monopoly_sim::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<monopoly_sim::SetupError> for CliError {
    fn from(e: monopoly_sim::SetupError) -> Self {
        Self::new(format!("invalid configuration: {e}"))
    }
}

impl From<monopoly_sim::SimulationError> for CliError {
    fn from(e: monopoly_sim::SimulationError) -> Self {
        Self::new(e.to_string())
    }
}

/// Load settings from a file, or the defaults when no file is given.
fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    match path {
        Some(path) => Ok(Settings::load(path)?),
        None => Ok(Settings::default()),
    }
}
