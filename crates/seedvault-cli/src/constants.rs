//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, and clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Unclassified failure (storage, crypto primitives).
    pub const GENERAL: i32 = 1;

    /// Resource not found (config, envelope file, word list).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments (seed phrase, password policy).
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong password or corrupted data).
    pub const AUTH_FAILED: i32 = 5;

    /// Envelope could not be decoded.
    pub const INTEGRITY_FAILED: i32 = 6;

    /// Decryption refused by the lockout.
    pub const LOCKED: i32 = 7;
}

/// Environment variables read by the CLI.
pub mod env {
    pub const PASSWORD: &str = "SEEDVAULT_PASSWORD";
    pub const CONFIG: &str = "SEEDVAULT_CONFIG";
    pub const STATE: &str = "SEEDVAULT_STATE";
    pub const LOG: &str = "SEEDVAULT_LOG";
}

/// Directory name under the XDG config and data homes.
pub const APP_DIR: &str = "seedvault";
