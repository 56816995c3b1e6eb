//! JSON-file store.
//!
//! The whole store is one JSON object. Every mutation rewrites the file
//! through [`crate::fs::write_atomic`], so a crash leaves either the old or
//! the new contents on disk, never a torn file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::traits::KeyValueStore;
use crate::error::{Result, SeedVaultError};

/// A store persisted as a JSON object at `path`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; the file
    /// is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                SeedVaultError::Storage(format!(
                    "State file {} is not a JSON object of strings: {}",
                    path.display(),
                    e
                ))
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(SeedVaultError::Storage(format!(
                    "Failed to read state file {}: {}",
                    path.display(),
                    err
                )))
            }
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let contents = serde_json::to_vec_pretty(&self.values)?;
        crate::fs::write_atomic(&self.path, &contents).map_err(|e| {
            SeedVaultError::Storage(format!(
                "Failed to write state file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("state.json")).unwrap();
        assert_eq!(store.get("decrypt_attempts").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("decrypt_attempts", "2").unwrap();
        store.set("last_attempt_time", "1700000000000").unwrap();
        store.remove("last_attempt_time").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("decrypt_attempts").unwrap().as_deref(), Some("2"));
        assert_eq!(reopened.get("last_attempt_time").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, SeedVaultError::Storage(_)));
    }
}
