//! Input handling helpers for password, seed and envelope reading.

use std::io::{self, IsTerminal, Read};
use std::path::Path;

use dialoguer::Password;
use secrecy::SecretString;
use zeroize::Zeroizing;

use seedvault_core::crypto::{validate_password, PasswordStrength};

use crate::constants::env;
use crate::errors::CliError;

use crate::app::missing_file_message;

fn password_from_env() -> Option<SecretString> {
    match std::env::var(env::PASSWORD) {
        Ok(value) if !value.is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

/// Prompt for a password, or read it from `SEEDVAULT_PASSWORD`.
pub fn prompt_password(interactive: bool) -> anyhow::Result<SecretString> {
    if let Some(value) = password_from_env() {
        return Ok(value);
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No password provided and no TTY available. Set {}.",
            env::PASSWORD
        ))
        .into());
    }
    let value = Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
    Ok(SecretString::from(value))
}

/// Prompt for a new password with confirmation, or read it from
/// `SEEDVAULT_PASSWORD`. Interactive entry loops until the policy passes.
pub fn prompt_new_password(interactive: bool) -> anyhow::Result<SecretString> {
    if let Some(value) = password_from_env() {
        return Ok(value);
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No password provided and no TTY available. Set {}.",
            env::PASSWORD
        ))
        .into());
    }
    loop {
        let password = Zeroizing::new(
            Password::new()
                .with_prompt("New password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()
                .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?,
        );
        if let Err(err) = validate_password(&password) {
            eprintln!("Password does not meet requirements: {}", err);
            continue;
        }
        if PasswordStrength::of(&password) == PasswordStrength::Fair {
            eprintln!("Password strength: fair. A longer password is stronger.");
        }
        return Ok(SecretString::from(password.to_string()));
    }
}

/// Read the seed phrase from `--seed`, stdin, or a hidden prompt.
pub fn read_seed(seed: Option<String>, interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = seed {
        return Ok(Zeroizing::new(value));
    }

    if !io::stdin().is_terminal() {
        let mut buffer = Zeroizing::new(String::new());
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        if buffer.trim().is_empty() {
            return Err(CliError::invalid_input("No seed phrase provided on stdin").into());
        }
        return Ok(buffer);
    }

    if !interactive {
        return Err(CliError::invalid_input(
            "No seed phrase provided. Use --seed or pipe it on stdin.",
        )
        .into());
    }

    let value = Password::new()
        .with_prompt("Recovery phrase (hidden)")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read recovery phrase: {}", e))?;
    Ok(Zeroizing::new(value))
}

/// Read envelope text from the argument, a file, or stdin.
pub fn read_envelope(envelope: Option<String>, input: Option<&str>) -> anyhow::Result<String> {
    if let Some(value) = envelope {
        return Ok(value);
    }

    if let Some(path) = input {
        let path = Path::new(path);
        return std::fs::read_to_string(path).map_err(|_| {
            anyhow::Error::from(CliError::not_found(
                missing_file_message("envelope file", path),
                "Hint: Pass the envelope text directly, or pipe it on stdin.",
            ))
        });
    }

    if io::stdin().is_terminal() {
        return Err(CliError::invalid_input(
            "No envelope provided. Pass it as an argument, use --input, or pipe it on stdin.",
        )
        .into());
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    if buffer.trim().is_empty() {
        return Err(CliError::invalid_input("No envelope provided on stdin").into());
    }
    Ok(buffer)
}

/// Write `contents` to `path` atomically with owner-only permissions.
pub fn write_private_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    seedvault_core::fs::write_atomic(path, contents.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))
}
