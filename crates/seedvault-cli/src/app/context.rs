//! Application context for the SeedVault CLI.
//!
//! Provides a unified context that combines CLI arguments with the
//! lazily-loaded config file.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use seedvault_core::{FileStore, SeedVault, SystemClock, VaultContext, WordSet};

use crate::cli::Cli;
use crate::config::{read_config, SeedVaultConfig};
use crate::errors::CliError;
use crate::ui::UiContext;

use super::resolver::{missing_file_message, resolve_config_path, resolve_state_path};

pub type Vault = SeedVault<FileStore, SystemClock>;

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<SeedVaultConfig>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Get the CLI arguments.
    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Check if quiet mode is enabled, by flag or config.
    pub fn quiet(&self) -> bool {
        self.cli.quiet || self.config().map(|c| c.ui.quiet).unwrap_or(false)
    }

    /// Get the config, loading it lazily. A missing file yields defaults.
    pub fn config(&self) -> anyhow::Result<&SeedVaultConfig> {
        self.config.get_or_try_init(|| {
            let path = resolve_config_path(self.cli)?;
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                read_config(&path)
            } else {
                Ok(SeedVaultConfig::default())
            }
        })
    }

    /// Get the UI context for rendering.
    pub fn ui_context(&self, json_flag: bool) -> UiContext {
        UiContext::from_env(json_flag)
    }

    pub fn config_path(&self) -> anyhow::Result<PathBuf> {
        resolve_config_path(self.cli)
    }

    pub fn state_path(&self) -> anyhow::Result<PathBuf> {
        resolve_state_path(self.cli, self.config()?)
    }

    /// Load the configured word list, or the embedded English list.
    pub fn word_set(&self) -> anyhow::Result<WordSet> {
        let Some(path) = self.config()?.wordlist.path.as_deref() else {
            return Ok(WordSet::english());
        };
        let path = PathBuf::from(path);
        let file = std::fs::File::open(&path).map_err(|_| {
            CliError::not_found(
                missing_file_message("word list", &path),
                "Hint: Fix [wordlist] path in the config, or remove it to use the English list.",
            )
        })?;
        Ok(WordSet::from_reader(std::io::BufReader::new(file))?)
    }

    /// Open the vault backed by the state file.
    pub fn open_vault(&self) -> anyhow::Result<Vault> {
        let state_path = self.state_path()?;
        tracing::debug!(path = %state_path.display(), "opening state");
        let store = FileStore::open(&state_path)?;
        let ctx = VaultContext::new(store, SystemClock);
        Ok(SeedVault::with_parts(
            ctx,
            seedvault_core::CipherEngine::default(),
            self.word_set()?,
        ))
    }
}
