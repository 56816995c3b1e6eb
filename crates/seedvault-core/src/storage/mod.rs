//! Persistence for lockout counters and the security log.
//!
//! The core talks to storage only through [`KeyValueStore`]. Two backends
//! ship with the crate: [`MemoryStore`] for tests and embedding, and
//! [`FileStore`] for the CLI.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;

/// Store key holding the consecutive failed decryption count.
pub const KEY_DECRYPT_ATTEMPTS: &str = "decrypt_attempts";

/// Store key holding the epoch-millis time of the last failed decryption.
pub const KEY_LAST_ATTEMPT_TIME: &str = "last_attempt_time";

/// Store key holding the JSON-encoded security log.
pub const KEY_SECURITY_LOGS: &str = "security_logs";

#[cfg(test)]
pub(crate) mod testing {
    use super::{KeyValueStore, MemoryStore, KEY_DECRYPT_ATTEMPTS, KEY_LAST_ATTEMPT_TIME};
    use crate::error::{Result, SeedVaultError};

    /// A store whose lockout counter writes always fail.
    #[derive(Debug, Default)]
    pub struct CounterWritesFail {
        pub inner: MemoryStore,
    }

    impl KeyValueStore for CounterWritesFail {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            if key == KEY_DECRYPT_ATTEMPTS || key == KEY_LAST_ATTEMPT_TIME {
                return Err(SeedVaultError::Storage("disk full".to_string()));
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }
}
