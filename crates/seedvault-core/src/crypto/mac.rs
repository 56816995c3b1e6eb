//! HMAC-SHA256 tags over envelope ciphertext.
//!
//! The tag covers only the ciphertext (encrypt-then-MAC). Salt and IV are
//! outside the tag: a tampered salt or IV yields a different key or
//! keystream, which the cipher engine catches when the recovered plaintext
//! fails to decode.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::kdf::MacKey;
use super::params::TAG_LEN;
use crate::error::{Result, SeedVaultError};

type HmacSha256 = Hmac<Sha256>;

/// Compute the tag for `ciphertext`.
pub fn compute_tag(key: &MacKey, ciphertext: &[u8]) -> Result<[u8; TAG_LEN]> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| SeedVaultError::Crypto(format!("HMAC-SHA256 key init failed: {}", e)))?;
    mac.update(ciphertext);

    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    Ok(tag)
}

/// Recompute the tag for `ciphertext` and compare it to `expected` in
/// constant time.
///
/// A mismatch is [`SeedVaultError::Authentication`]; key setup failures stay
/// [`SeedVaultError::Crypto`] so the caller may retry them.
pub fn verify_tag(key: &MacKey, ciphertext: &[u8], expected: &[u8; TAG_LEN]) -> Result<()> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| SeedVaultError::Crypto(format!("HMAC-SHA256 key init failed: {}", e)))?;
    mac.update(ciphertext);
    mac.verify_slice(expected)
        .map_err(|_| SeedVaultError::Authentication)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::derive_mac_key;

    #[test]
    fn test_tag_round_trip() {
        let key = derive_mac_key(b"correct-password");
        let tag = compute_tag(&key, b"ciphertext bytes").unwrap();
        verify_tag(&key, b"ciphertext bytes", &tag).unwrap();
    }

    #[test]
    fn test_wrong_key_is_authentication_error() {
        let tag = compute_tag(&derive_mac_key(b"password-one"), b"data").unwrap();
        let result = verify_tag(&derive_mac_key(b"password-two"), b"data", &tag);
        assert!(matches!(result, Err(SeedVaultError::Authentication)));
    }

    #[test]
    fn test_tampered_tag_fails() {
        let key = derive_mac_key(b"password");
        let mut tag = compute_tag(&key, b"data").unwrap();
        tag[31] ^= 0x01;
        assert!(matches!(
            verify_tag(&key, b"data", &tag),
            Err(SeedVaultError::Authentication)
        ));
    }

    #[test]
    fn test_empty_ciphertext_has_tag() {
        let key = derive_mac_key(b"password");
        let tag = compute_tag(&key, b"").unwrap();
        assert_ne!(tag, [0u8; TAG_LEN]);
        verify_tag(&key, b"", &tag).unwrap();
    }
}
