use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::APP_DIR;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SeedVaultConfig {
    #[serde(default)]
    pub state: StateSection,
    #[serde(default)]
    pub wordlist: WordlistSection,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StateSection {
    /// Location of the persisted lockout counters and security log.
    pub path: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WordlistSection {
    /// Newline-separated word list replacing the embedded English list.
    pub path: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UiSection {
    #[serde(default)]
    pub quiet: bool,
}

impl SeedVaultConfig {
    pub fn new(state_path: PathBuf) -> Self {
        Self {
            state: StateSection {
                path: Some(state_path.to_string_lossy().to_string()),
            },
            wordlist: WordlistSection::default(),
            ui: UiSection::default(),
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_state_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("state.json"))
}

pub fn read_config(path: &Path) -> anyhow::Result<SeedVaultConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &SeedVaultConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join(APP_DIR));
        }
    }
    Ok(home_dir()?.join(".config").join(APP_DIR))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join(APP_DIR));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join(APP_DIR))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = SeedVaultConfig::new(PathBuf::from("/tmp/state.json"));

        write_config(&path, &config).unwrap();
        let loaded = read_config(&path).unwrap();
        assert_eq!(loaded.state.path.as_deref(), Some("/tmp/state.json"));
        assert!(loaded.wordlist.path.is_none());
        assert!(!loaded.ui.quiet);
    }

    #[test]
    fn test_sections_are_optional() {
        let config: SeedVaultConfig = toml::from_str("[ui]\nquiet = true\n").unwrap();
        assert!(config.ui.quiet);
        assert!(config.state.path.is_none());
    }
}
