//! Path resolution for the config file and data directory.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_data_dir};
use crate::constants::ENV_CONFIG;
use crate::errors::CliError;

/// Resolve the config file path, checking VITALS_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(ENV_CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the data directory from `--data-dir` / GARMIN_DATA_DIR or the
/// default locations.
pub fn resolve_data_dir(cli: &Cli) -> anyhow::Result<PathBuf> {
    match &cli.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => default_data_dir(),
    }
}

/// Error for a report whose backing file has not been exported yet.
pub fn missing_data_error(what: &str, path: &Path) -> anyhow::Error {
    CliError::not_found(
        format!("No {} found at {}", what, path.display()),
        "Hint: Run `vitals export` first.",
    )
    .into()
}
