//! CLI command implementations for Bastion.

pub(crate) mod batch;
pub(crate) mod check;
pub(crate) mod view;

mod output;

use bastion::config::{Overrides, WorldConfig};
use bastion::{AuditError, LoadError, ResolveError};
use clap::{Args, ValueEnum};
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

/// Config file read when `--config` is not given, if it exists.
const DEFAULT_CONFIG_PATH: &str = "data/config.json";

/// Output format for the `check` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `batch` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum BatchFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// World and catalog options shared by every command.
#[derive(Debug, Clone, Args)]
pub(crate) struct WorldArgs {
    /// World config file (default: data/config.json when present)
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Directory holding one catalog JSON file per building kind
    #[arg(long, default_value = "data/structures")]
    pub(crate) catalog_dir: PathBuf,

    /// Cell size in pixels
    #[arg(long, alias = "cell_size")]
    pub(crate) cell_size: Option<u32>,

    /// Number of grid rows
    #[arg(long, alias = "num_rows")]
    pub(crate) num_rows: Option<u32>,

    /// Number of grid columns
    #[arg(long, alias = "num_cols")]
    pub(crate) num_cols: Option<u32>,

    /// Viewer redraws per second
    #[arg(long, alias = "frame_rate")]
    pub(crate) frame_rate: Option<u32>,
}

impl WorldArgs {
    /// Load the world config and apply the command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit config file cannot be loaded.
    pub(crate) fn load_config(&self) -> Result<WorldConfig, CliError> {
        let config = match &self.config {
            Some(path) => WorldConfig::load(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
                WorldConfig::load(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => {
                tracing::debug!("no world config found, using defaults");
                WorldConfig::default()
            }
        };

        Ok(config.with_overrides(Overrides {
            cell_size: self.cell_size,
            num_rows: self.num_rows,
            num_cols: self.num_cols,
            frame_rate: self.frame_rate,
        }))
    }
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

impl From<LoadError> for CliError {
    fn from(e: LoadError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ResolveError> for CliError {
    fn from(e: ResolveError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<AuditError> for CliError {
    fn from(e: AuditError) -> Self {
        Self::new(e.to_string())
    }
}

/// Display name of a snapshot path.
pub(crate) fn village_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string())
}
