//! Key derivation.
//!
//! Two keys come out of one password:
//!
//! - the **encryption key**, stretched with PBKDF2-HMAC-SHA256 over the
//!   per-envelope salt, so every envelope gets a fresh key;
//! - the **MAC key**, which is the password bytes followed by a fixed
//!   domain suffix, used directly with no salt and no iteration.
//!
//! The MAC key is therefore identical for every envelope sealed with the same
//! password and is far cheaper to guess than the encryption key. That is the
//! established envelope format and is kept as is; a salted, stretched MAC key
//! would be the conventional alternative.

use hmac::Hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::params::{KdfParams, KEY_LEN, MAC_KEY_SUFFIX};
use crate::error::{Result, SeedVaultError};

/// A 256-bit encryption key derived from a password.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LEN],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// HMAC key derived deterministically from the password alone.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MacKey {
    key: Vec<u8>,
}

impl MacKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }
}

impl std::fmt::Debug for MacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MacKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive the encryption key from the password bytes and a salt.
///
/// Deterministic for a given `(password, salt, iterations)` and deliberately
/// slow. Fails only if the PBKDF2 primitive rejects its inputs.
///
/// # Examples
///
/// ```
/// use seedvault_core::crypto::{derive_encryption_key, KdfParams};
///
/// let salt = [7u8; 32];
/// let key = derive_encryption_key(b"my-passphrase", &salt, KdfParams { iterations: 1_000 }).unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_encryption_key(password: &[u8], salt: &[u8], params: KdfParams) -> Result<DerivedKey> {
    if params.iterations == 0 {
        return Err(SeedVaultError::Crypto(
            "PBKDF2 iteration count must be positive".to_string(),
        ));
    }

    let mut key_bytes = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, params.iterations, &mut *key_bytes)
        .map_err(|e| SeedVaultError::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(DerivedKey::from_bytes(*key_bytes))
}

/// Derive the MAC key: `password ∥ "hmac"`, used verbatim.
pub fn derive_mac_key(password: &[u8]) -> MacKey {
    let mut key = Vec::with_capacity(password.len() + MAC_KEY_SUFFIX.len());
    key.extend_from_slice(password);
    key.extend_from_slice(MAC_KEY_SUFFIX);
    MacKey { key }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: KdfParams = KdfParams { iterations: 1_000 };

    #[test]
    fn test_key_derivation_deterministic() {
        let salt = [0x11u8; 32];

        let key1 = derive_encryption_key(b"test-passphrase", &salt, FAST).unwrap();
        let key2 = derive_encryption_key(b"test-passphrase", &salt, FAST).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_encryption_key(b"test-passphrase", &[1u8; 32], FAST).unwrap();
        let key2 = derive_encryption_key(b"test-passphrase", &[2u8; 32], FAST).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_passphrase_different_key() {
        let salt = [0x22u8; 32];
        let key1 = derive_encryption_key(b"passphrase-one", &salt, FAST).unwrap();
        let key2 = derive_encryption_key(b"passphrase-two", &salt, FAST).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let result = derive_encryption_key(b"pw", &[0u8; 32], KdfParams { iterations: 0 });
        assert!(matches!(result, Err(SeedVaultError::Crypto(_))));
    }

    #[test]
    fn test_pbkdf2_sha256_known_answer() {
        // RFC 7914 section 11 PBKDF2-HMAC-SHA256 vector, first 32 bytes.
        let key = derive_encryption_key(b"passwd", b"salt", KdfParams { iterations: 1 }).unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc"
        );
    }

    #[test]
    fn test_mac_key_is_password_plus_suffix() {
        let key = derive_mac_key(b"Tr0ub4dor&3xyz!");
        assert_eq!(key.as_bytes(), b"Tr0ub4dor&3xyz!hmac");
    }

    #[test]
    fn test_mac_key_ignores_salt_and_is_stable() {
        assert_eq!(derive_mac_key(b"same-password"), derive_mac_key(b"same-password"));
        assert_ne!(derive_mac_key(b"password-a"), derive_mac_key(b"password-b"));
    }

    #[test]
    fn test_derived_key_debug_redacts() {
        let key = derive_encryption_key(b"test-passphrase", &[3u8; 32], FAST).unwrap();
        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));

        let mac = derive_mac_key(b"secret-password");
        assert!(!format!("{:?}", mac).contains("secret"));
    }
}
