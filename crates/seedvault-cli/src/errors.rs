//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

use seedvault_core::{ErrorKind, SeedVaultError};

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, envelope file, etc.)
    NotFound { message: String, hint: String },

    /// Authentication failed (wrong password or corrupted data)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// Envelope is malformed
    Integrity(String),

    /// Lockout active
    Locked { remaining_secs: u64 },

    /// Anything else (storage, crypto primitives)
    General(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::Integrity(message) => write!(f, "{}", message),
            CliError::General(message) => write!(f, "{}", message),
            CliError::Locked { remaining_secs } => write!(
                f,
                "Too many failed attempts; try again in {} seconds",
                remaining_secs
            ),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::Integrity(_) => exit_codes::INTEGRITY_FAILED,
            CliError::Locked { .. } => exit_codes::LOCKED,
            CliError::General(_) => exit_codes::GENERAL,
        }
    }
}

impl From<SeedVaultError> for CliError {
    fn from(err: SeedVaultError) -> Self {
        match err {
            SeedVaultError::Locked { remaining_ms } => CliError::Locked {
                remaining_secs: remaining_ms.div_ceil(1000),
            },
            SeedVaultError::Authentication => CliError::auth_failed_with_hint(
                SeedVaultError::Authentication.to_string(),
                "Hint: Check the password, or run `seedvault status` to see remaining attempts.",
            ),
            other => match other.kind() {
                ErrorKind::Validation => CliError::InvalidInput(other.to_string()),
                ErrorKind::Format => CliError::Integrity(other.to_string()),
                _ => CliError::General(other.to_string()),
            },
        }
    }
}

/// Exit code for an error surfaced from a command.
///
/// Typed [`CliError`]s and core errors map to their codes; anything else is 1.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    if let Some(core_err) = err.downcast_ref::<SeedVaultError>() {
        return match core_err.kind() {
            ErrorKind::Validation => exit_codes::INVALID_INPUT,
            ErrorKind::Format => exit_codes::INTEGRITY_FAILED,
            ErrorKind::Authentication => exit_codes::AUTH_FAILED,
            ErrorKind::Lockout => exit_codes::LOCKED,
            ErrorKind::Crypto | ErrorKind::Storage => exit_codes::GENERAL,
        };
    }
    exit_codes::GENERAL
}
