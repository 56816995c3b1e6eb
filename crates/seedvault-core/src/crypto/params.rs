//! Fixed protocol constants.
//!
//! These values define the envelope format and the brute-force policy.
//! They are not user-tunable: changing any of them breaks compatibility
//! with envelopes produced earlier.

use std::time::Duration;

/// PBKDF2-HMAC-SHA256 iteration count for the encryption key.
pub const KDF_ITERATIONS: u32 = 310_000;

/// Length of the per-envelope random salt in bytes.
pub const SALT_LEN: usize = 32;

/// Length of the per-envelope random IV in bytes.
pub const IV_LEN: usize = 16;

/// Length of the derived encryption key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Length of the HMAC-SHA256 tag in bytes.
pub const TAG_LEN: usize = 32;

/// Bytes every envelope carries in addition to the ciphertext.
pub const ENVELOPE_OVERHEAD: usize = SALT_LEN + IV_LEN + TAG_LEN;

/// Domain suffix appended to the password to form the MAC key.
pub const MAC_KEY_SUFFIX: &[u8] = b"hmac";

/// Attempts allowed for a fallible cryptographic operation.
pub const MAX_CRYPTO_RETRIES: u32 = 3;

/// Base delay between crypto retries; attempt `n` waits `n * base`.
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(100);

/// Failed decryptions tolerated before the lockout engages.
pub const MAX_DECRYPT_ATTEMPTS: u32 = 5;

/// Cooldown once the lockout engages, in milliseconds.
pub const LOCKOUT_DURATION_MS: u64 = 300_000;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Safety-net delay before tracked secret buffers are wiped automatically.
pub const DEFAULT_WIPE_DELAY: Duration = Duration::from_millis(5_000);

/// Maximum number of records kept in the security log.
pub const SECURITY_LOG_CAPACITY: usize = 50;

/// Key derivation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: KDF_ITERATIONS,
        }
    }
}
