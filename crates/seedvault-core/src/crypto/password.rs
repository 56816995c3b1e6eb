//! Password validation.
//!
//! Enforces minimum security requirements for passwords used to protect a
//! seed. Decryption does not re-apply the policy: a password that opened an
//! envelope once keeps opening it.

use std::fmt;

use super::params::MIN_PASSWORD_LENGTH;
use crate::error::{Result, SeedVaultError};

/// Rough strength estimate of a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Fair,
    Strong,
}

impl PasswordStrength {
    /// Score one point per character class present (lowercase, uppercase,
    /// digit, symbol) plus one for a length of 16 or more.
    pub fn of(password: &str) -> Self {
        let mut score = 0;
        if password.chars().any(|c| c.is_lowercase()) {
            score += 1;
        }
        if password.chars().any(|c| c.is_uppercase()) {
            score += 1;
        }
        if password.chars().any(|c| c.is_ascii_digit()) {
            score += 1;
        }
        if password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
        {
            score += 1;
        }
        if password.chars().count() >= 16 {
            score += 1;
        }

        match score {
            0..=2 => PasswordStrength::Weak,
            3 => PasswordStrength::Fair,
            _ => PasswordStrength::Strong,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordStrength::Weak => "weak",
            PasswordStrength::Fair => "fair",
            PasswordStrength::Strong => "strong",
        }
    }
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a password meets minimum security requirements.
///
/// # Requirements
///
/// - Not empty or only whitespace
/// - At least 12 characters long
/// - Strength of at least [`PasswordStrength::Fair`]
///
/// # Examples
///
/// ```
/// use seedvault_core::crypto::validate_password;
///
/// assert!(validate_password("Tr0ub4dor&3xyz!").is_ok());
/// assert!(validate_password("short").is_err());
/// ```
pub fn validate_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(SeedVaultError::Validation(
            "Password cannot be empty".to_string(),
        ));
    }

    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(SeedVaultError::Validation(format!(
            "Password must be at least {} characters (got {})",
            MIN_PASSWORD_LENGTH, length
        )));
    }

    if PasswordStrength::of(password) < PasswordStrength::Fair {
        return Err(SeedVaultError::Validation(
            "Password is too weak; mix upper and lower case letters, digits and symbols"
                .to_string(),
        ));
    }

    Ok(())
}

/// Check a password supplied for decryption.
pub fn require_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(SeedVaultError::Validation(
            "Password cannot be empty".to_string(),
        ));
    }
    Ok(())
}
