//! Path resolution for config and state files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_state_path, SeedVaultConfig};

/// Resolve the config file path: `--config` (or `SEEDVAULT_CONFIG`), then the
/// XDG default.
pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(value) = cli.config.as_deref() {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the state file path: `--state` (or `SEEDVAULT_STATE`), then the
/// config file, then the XDG default.
pub fn resolve_state_path(cli: &Cli, config: &SeedVaultConfig) -> anyhow::Result<PathBuf> {
    if let Some(value) = cli.state.as_deref() {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    if let Some(path) = config.state.path.as_deref() {
        return Ok(PathBuf::from(path));
    }
    default_state_path()
}

/// Error message when an input file is missing.
pub fn missing_file_message(what: &str, path: &Path) -> String {
    format!("No {} found at {}", what, path.display())
}
