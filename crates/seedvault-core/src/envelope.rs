//! Envelope binary layout and text encoding.
//!
//! ```text
//! offset 0        32       48                 len-32      len
//!        | salt   | iv     | ciphertext (n)   | tag       |
//! ```
//!
//! The concatenation is carried as standard padded base64. That string is the
//! only wire format: it is what gets rendered into a QR code or written to a
//! backup file, and what scanning or reading one hands back.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::crypto::params::{ENVELOPE_OVERHEAD, IV_LEN, SALT_LEN, TAG_LEN};
use crate::error::{Result, SeedVaultError};

/// A decoded envelope. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    salt: [u8; SALT_LEN],
    iv: [u8; IV_LEN],
    ciphertext: Vec<u8>,
    tag: [u8; TAG_LEN],
}

impl Envelope {
    pub fn new(
        salt: [u8; SALT_LEN],
        iv: [u8; IV_LEN],
        ciphertext: Vec<u8>,
        tag: [u8; TAG_LEN],
    ) -> Self {
        Self {
            salt,
            iv,
            ciphertext,
            tag,
        }
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn tag(&self) -> &[u8; TAG_LEN] {
        &self.tag
    }

    /// Length of the binary form: ciphertext plus the fixed 80 bytes.
    pub fn encoded_len(&self) -> usize {
        self.ciphertext.len() + ENVELOPE_OVERHEAD
    }

    /// `salt ∥ iv ∥ ciphertext ∥ tag`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.iv);
        bytes.extend_from_slice(&self.ciphertext);
        bytes.extend_from_slice(&self.tag);
        bytes
    }

    /// Split a binary envelope at the fixed offsets.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ENVELOPE_OVERHEAD {
            return Err(SeedVaultError::Format(format!(
                "envelope is {} bytes; at least {} required",
                bytes.len(),
                ENVELOPE_OVERHEAD
            )));
        }

        let (salt, rest) = bytes.split_at(SALT_LEN);
        let (iv, rest) = rest.split_at(IV_LEN);
        let (ciphertext, tag) = rest.split_at(rest.len() - TAG_LEN);

        Ok(Self {
            salt: fixed(salt)?,
            iv: fixed(iv)?,
            ciphertext: ciphertext.to_vec(),
            tag: fixed(tag)?,
        })
    }

    /// Encode to the text form.
    pub fn encode(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Parse the text form. Surrounding whitespace is ignored.
    pub fn decode(text: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(text.trim())
            .map_err(|e| SeedVaultError::Format(format!("envelope is not valid base64: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}

/// Encode the four fields directly.
pub fn encode(
    salt: &[u8; SALT_LEN],
    iv: &[u8; IV_LEN],
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
) -> String {
    Envelope::new(*salt, *iv, ciphertext.to_vec(), *tag).encode()
}

/// Decode text into its four fields.
pub fn decode(text: &str) -> Result<Envelope> {
    Envelope::decode(text)
}

fn fixed<const N: usize>(slice: &[u8]) -> Result<[u8; N]> {
    slice
        .try_into()
        .map_err(|_| SeedVaultError::Format(format!("expected {} bytes, got {}", N, slice.len())))
}
