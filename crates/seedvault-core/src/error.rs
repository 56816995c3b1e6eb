//! Error types for SeedVault core operations.
//!
//! Every failure the envelope protocol can produce is a variant of
//! [`SeedVaultError`]. Variants are grouped into the coarse [`ErrorKind`]
//! taxonomy that callers (and the security log) act on; the CLI layer maps
//! kinds to user-facing messages and exit codes.

use std::fmt;

use thiserror::Error;

/// Result type alias for SeedVault operations.
pub type Result<T> = std::result::Result<T, SeedVaultError>;

/// Core error type for SeedVault operations.
#[derive(Debug, Error)]
pub enum SeedVaultError {
    /// Seed or password rejected before any cryptography runs
    #[error("Validation error: {0}")]
    Validation(String),

    /// Envelope text is malformed or too short to hold the fixed fields
    #[error("Corrupted data: {0}")]
    Format(String),

    /// MAC verification failed. Deliberately does not say which input was wrong.
    #[error("Wrong password or corrupted data")]
    Authentication,

    /// A single cryptographic primitive failed (retryable)
    #[error("Cryptographic failure: {0}")]
    Crypto(String),

    /// A cryptographic operation kept failing until the retry budget ran out
    #[error("{operation} failed after {attempts} attempts: {cause}")]
    RetriesExhausted {
        operation: &'static str,
        attempts: u32,
        cause: String,
    },

    /// Decryption refused while the lockout window is active
    #[error("Too many failed attempts; try again in {} seconds", .remaining_ms.div_ceil(1000))]
    Locked { remaining_ms: u64 },

    /// Key/value store backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// Coarse classification of [`SeedVaultError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Format,
    Authentication,
    Crypto,
    Lockout,
    Storage,
}

impl ErrorKind {
    /// Stable lowercase name, used in security log context and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Format => "format",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Crypto => "crypto",
            ErrorKind::Lockout => "lockout",
            ErrorKind::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SeedVaultError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SeedVaultError::Validation(_) => ErrorKind::Validation,
            SeedVaultError::Format(_) => ErrorKind::Format,
            SeedVaultError::Authentication => ErrorKind::Authentication,
            SeedVaultError::Crypto(_) | SeedVaultError::RetriesExhausted { .. } => {
                ErrorKind::Crypto
            }
            SeedVaultError::Locked { .. } => ErrorKind::Lockout,
            SeedVaultError::Storage(_) | SeedVaultError::Io { .. } | SeedVaultError::Json { .. } => {
                ErrorKind::Storage
            }
        }
    }

    /// Only single primitive failures are worth retrying; everything else is
    /// deterministic or already terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SeedVaultError::Crypto(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_message_is_generic() {
        let msg = SeedVaultError::Authentication.to_string();
        assert_eq!(msg, "Wrong password or corrupted data");
    }

    #[test]
    fn test_locked_message_rounds_up_seconds() {
        let err = SeedVaultError::Locked { remaining_ms: 1_001 };
        assert!(err.to_string().contains("2 seconds"));
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            SeedVaultError::Validation("x".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(SeedVaultError::Format("x".into()).kind(), ErrorKind::Format);
        assert_eq!(
            SeedVaultError::RetriesExhausted {
                operation: "encrypt",
                attempts: 3,
                cause: "boom".into(),
            }
            .kind(),
            ErrorKind::Crypto
        );
        assert_eq!(
            SeedVaultError::Locked { remaining_ms: 5 }.kind(),
            ErrorKind::Lockout
        );
    }

    #[test]
    fn test_only_primitive_failures_retry() {
        assert!(SeedVaultError::Crypto("x".into()).is_retryable());
        assert!(!SeedVaultError::Authentication.is_retryable());
        assert!(!SeedVaultError::Format("x".into()).is_retryable());
        assert!(!SeedVaultError::RetriesExhausted {
            operation: "decrypt",
            attempts: 3,
            cause: "x".into(),
        }
        .is_retryable());
    }
}
