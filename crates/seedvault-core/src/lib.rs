//! # SeedVault Core
//!
//! Core library for SeedVault: password-protected envelopes for BIP39
//! recovery phrases.
//!
//! A phrase is sealed into a self-contained envelope
//! (`salt ∥ iv ∥ ciphertext ∥ tag`, base64 text) that can be printed as a QR
//! code or saved to a file, and opened again with the same password.
//!
//! ## Architecture
//!
//! - **crypto**: key derivation, MAC, cipher engine, retry and password policy
//! - **envelope**: fixed binary layout and text encoding
//! - **secure**: tracking and zeroing of transient secret buffers
//! - **lockout**: failed-attempt bookkeeping and cooldown
//! - **security_log**: bounded audit trail of outcomes
//! - **mnemonic**: word lists and seed phrase validation
//! - **storage**: key/value store contract and backends
//! - **context** / **vault**: the explicit state object and the facade over it

pub mod clock;
pub mod context;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod fs;
pub mod lockout;
pub mod mnemonic;
pub mod secure;
pub mod security_log;
pub mod storage;
pub mod vault;

pub use clock::{Clock, ManualClock, SystemClock};
pub use context::VaultContext;
pub use crypto::{CipherEngine, KdfParams, PasswordStrength, RetryPolicy};
pub use envelope::Envelope;
pub use error::{ErrorKind, Result, SeedVaultError};
pub use lockout::{LockoutManager, LockoutPolicy, LockoutState, LockoutStatus};
pub use mnemonic::{SeedPhrase, WordSet};
pub use secure::{SecretBuffer, SecureBufferRegistry};
pub use security_log::{SecurityEvent, SecurityEventType, SecurityLog};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use vault::SeedVault;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
