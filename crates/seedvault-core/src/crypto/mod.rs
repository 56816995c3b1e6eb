//! Cryptographic operations for SeedVault.
//!
//! Provides password-based key derivation, ciphertext authentication, the
//! envelope cipher engine with bounded retry, and the password policy.

pub mod cipher;
pub mod kdf;
pub mod mac;
pub mod params;
pub mod password;
pub mod retry;

pub use cipher::CipherEngine;
pub use kdf::{derive_encryption_key, derive_mac_key, DerivedKey, MacKey};
pub use mac::{compute_tag, verify_tag};
pub use params::KdfParams;
pub use password::{require_password, validate_password, PasswordStrength};
pub use retry::RetryPolicy;
