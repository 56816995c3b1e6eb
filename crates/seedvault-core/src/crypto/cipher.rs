//! Envelope sealing and opening.
//!
//! Sealing: fresh salt and IV, PBKDF2 encryption key, AES-256-CTR over the
//! plaintext, then HMAC-SHA256 over the ciphertext. Opening checks the tag
//! first and only derives the encryption key once the tag matches.
//!
//! CTR keeps the ciphertext exactly as long as the plaintext, so an envelope
//! is always `plaintext + 80` bytes. Integrity of the ciphertext comes from
//! the tag; a tampered salt or IV is caught by the plaintext checks in
//! [`CipherEngine::decrypt`].

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;
use zeroize::Zeroizing;

use super::kdf::{derive_encryption_key, derive_mac_key, DerivedKey};
use super::mac::{compute_tag, verify_tag};
use super::params::{KdfParams, DEFAULT_WIPE_DELAY, IV_LEN, SALT_LEN};
use super::retry::RetryPolicy;
use crate::clock::Clock;
use crate::context::VaultContext;
use crate::envelope::{self, Envelope};
use crate::error::{Result, SeedVaultError};
use crate::mnemonic::{SeedPhrase, WordSet};
use crate::secure::{SecretBuffer, SecureBufferRegistry};
use crate::storage::KeyValueStore;

type Aes256Ctr = Ctr128BE<Aes256>;

/// Encrypts and decrypts envelopes with bounded retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherEngine {
    kdf: KdfParams,
    retry: RetryPolicy,
}

impl Default for CipherEngine {
    fn default() -> Self {
        Self::new(KdfParams::default(), RetryPolicy::default())
    }
}

impl CipherEngine {
    pub fn new(kdf: KdfParams, retry: RetryPolicy) -> Self {
        Self { kdf, retry }
    }

    /// Seal `plaintext` under `password` and return the envelope text.
    ///
    /// Retryable failures are retried per the engine's [`RetryPolicy`]. The
    /// password and plaintext byte copies are wiped before returning, on
    /// every path.
    pub async fn encrypt<S: KeyValueStore, C: Clock>(
        &self,
        ctx: &VaultContext<S, C>,
        plaintext: &str,
        password: &str,
    ) -> Result<String> {
        let registry = ctx.registry();
        self.retry
            .run("encrypt", |attempt| {
                tracing::debug!(attempt, "sealing envelope");
                self.encrypt_once(registry, plaintext, password)
            })
            .await
    }

    /// Open an envelope and return the seed phrase it holds.
    ///
    /// The tag covers the ciphertext only, so an altered salt or IV yields
    /// wrong plaintext rather than a tag mismatch. Plaintext that is not a
    /// phrase over `words` is therefore reported as
    /// [`SeedVaultError::Format`] and never returned.
    ///
    /// Every outcome is recorded with the context's lockout manager. A
    /// failure to persist that record is logged and does not replace the
    /// outcome. The lockout gate itself is not checked here.
    pub async fn decrypt<S: KeyValueStore, C: Clock>(
        &self,
        ctx: &mut VaultContext<S, C>,
        envelope_text: &str,
        password: &str,
        words: &WordSet,
    ) -> Result<SeedPhrase> {
        let outcome = match self.open(ctx.registry(), envelope_text, password).await {
            Ok(plaintext) => decode_plaintext(&plaintext, words),
            Err(err) => Err(err),
        };

        match &outcome {
            Ok(_) => {
                if let Err(err) = ctx.lockout().record_success() {
                    tracing::warn!(error = %err, "failed to reset lockout counters");
                }
            }
            Err(err) => match ctx.lockout().record_failure() {
                Ok(state) => {
                    tracing::debug!(kind = %err.kind(), attempts = state.attempts, "decryption failed");
                }
                Err(store_err) => {
                    tracing::warn!(kind = %err.kind(), error = %store_err, "failed to record failed decryption");
                }
            },
        }
        outcome
    }

    async fn open(
        &self,
        registry: &SecureBufferRegistry,
        envelope_text: &str,
        password: &str,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let envelope = envelope::decode(envelope_text)?;
        self.retry
            .run("decrypt", |attempt| {
                tracing::debug!(attempt, "opening envelope");
                self.decrypt_once(registry, &envelope, password)
            })
            .await
    }

    async fn encrypt_once(
        &self,
        registry: &SecureBufferRegistry,
        plaintext: &str,
        password: &str,
    ) -> Result<String> {
        let password_buf = registry.secret(password.as_bytes().to_vec());
        let plaintext_buf = registry.secret(plaintext.as_bytes().to_vec());

        let result = self.seal(registry, &password_buf, &plaintext_buf).await;

        registry.wipe(&password_buf);
        registry.wipe(&plaintext_buf);
        result
    }

    async fn seal(
        &self,
        registry: &SecureBufferRegistry,
        password: &SecretBuffer,
        plaintext: &SecretBuffer,
    ) -> Result<String> {
        let salt: [u8; SALT_LEN] = random_bytes()?;
        let iv: [u8; IV_LEN] = random_bytes()?;
        let salt_buf = SecretBuffer::from_slice(&salt);
        let iv_buf = SecretBuffer::from_slice(&iv);
        registry.track_with_delayed_wipe(&salt_buf, DEFAULT_WIPE_DELAY);
        registry.track_with_delayed_wipe(&iv_buf, DEFAULT_WIPE_DELAY);

        let result = async {
            let key = self.derive_key(password, &salt).await?;
            let mac_key = password.with_bytes(derive_mac_key);

            let mut ciphertext = Zeroizing::new(plaintext.with_bytes(|bytes| bytes.to_vec()));
            apply_keystream(&key, &iv, &mut ciphertext)?;
            let tag = compute_tag(&mac_key, &ciphertext)?;

            Ok::<_, SeedVaultError>(envelope::encode(&salt, &iv, &ciphertext, &tag))
        }
        .await;

        registry.wipe(&salt_buf);
        registry.wipe(&iv_buf);
        result
    }

    async fn decrypt_once(
        &self,
        registry: &SecureBufferRegistry,
        envelope: &Envelope,
        password: &str,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let password_buf = registry.secret(password.as_bytes().to_vec());

        let result = async {
            let mac_key = password_buf.with_bytes(derive_mac_key);
            verify_tag(&mac_key, envelope.ciphertext(), envelope.tag())?;

            let key = self.derive_key(&password_buf, envelope.salt()).await?;
            let mut plaintext = Zeroizing::new(envelope.ciphertext().to_vec());
            apply_keystream(&key, envelope.iv(), &mut plaintext)?;
            Ok::<_, SeedVaultError>(plaintext)
        }
        .await;

        registry.wipe(&password_buf);
        result
    }

    async fn derive_key(&self, password: &SecretBuffer, salt: &[u8]) -> Result<DerivedKey> {
        // Let other tasks run before the slow derivation.
        tokio::task::yield_now().await;
        tracing::debug!(iterations = self.kdf.iterations, "deriving encryption key");
        password.with_bytes(|bytes| derive_encryption_key(bytes, salt, self.kdf))
    }
}

fn decode_plaintext(plaintext: &[u8], words: &WordSet) -> Result<SeedPhrase> {
    let text = std::str::from_utf8(plaintext).map_err(|_| {
        SeedVaultError::Format("decrypted data is not valid text".to_string())
    })?;
    SeedPhrase::parse(text, words).map_err(|err| match err {
        SeedVaultError::Validation(_) => {
            SeedVaultError::Format("decrypted data is not a valid seed phrase".to_string())
        }
        other => other,
    })
}

fn apply_keystream(key: &DerivedKey, iv: &[u8], data: &mut [u8]) -> Result<()> {
    let mut cipher = Aes256Ctr::new_from_slices(key.as_bytes(), iv)
        .map_err(|e| SeedVaultError::Crypto(format!("AES-256-CTR init failed: {}", e)))?;
    cipher
        .try_apply_keystream(data)
        .map_err(|e| SeedVaultError::Crypto(format!("AES-256-CTR keystream failed: {}", e)))
}

fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| SeedVaultError::Crypto(format!("Random number generation failed: {}", e)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::crypto::params::ENVELOPE_OVERHEAD;
    use crate::storage::testing::CounterWritesFail;
    use crate::storage::MemoryStore;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    const FAST: KdfParams = KdfParams { iterations: 1_000 };
    const SEED_12: &str =
        "abandon ability able about above absent absorb abstract absurd abuse access accident";
    const PASSWORD: &str = "Tr0ub4dor&3xyz!";

    fn engine() -> CipherEngine {
        CipherEngine::new(FAST, RetryPolicy::default())
    }

    fn context() -> VaultContext<MemoryStore, ManualClock> {
        VaultContext::new(MemoryStore::new(), ManualClock::new(1_700_000_000_000))
    }

    fn flip(text: &str, index: usize) -> String {
        let mut bytes = STANDARD.decode(text).unwrap();
        bytes[index] ^= 0x01;
        STANDARD.encode(&bytes)
    }

    #[tokio::test]
    async fn test_round_trip_and_length() {
        let mut ctx = context();
        let engine = engine();
        let words = WordSet::english();

        let text = engine.encrypt(&ctx, SEED_12, PASSWORD).await.unwrap();
        let decoded = STANDARD.decode(&text).unwrap();
        assert_eq!(decoded.len(), SEED_12.len() + ENVELOPE_OVERHEAD);

        let phrase = engine.decrypt(&mut ctx, &text, PASSWORD, &words).await.unwrap();
        assert_eq!(phrase.as_str(), SEED_12);
        assert_eq!(ctx.lockout_state().unwrap().attempts, 0);
    }

    #[tokio::test]
    async fn test_wrong_password_is_authentication_and_counts() {
        let mut ctx = context();
        let engine = engine();
        let text = engine.encrypt(&ctx, SEED_12, PASSWORD).await.unwrap();

        let err = engine
            .decrypt(&mut ctx, &text, "wrongpass123456", &WordSet::english())
            .await
            .unwrap_err();
        assert!(matches!(err, SeedVaultError::Authentication));
        assert_eq!(ctx.lockout_state().unwrap().attempts, 1);
    }

    #[tokio::test]
    async fn test_malformed_text_is_format_and_counts() {
        let mut ctx = context();
        let err = engine()
            .decrypt(&mut ctx, "not base64!!", PASSWORD, &WordSet::english())
            .await
            .unwrap_err();
        assert!(matches!(err, SeedVaultError::Format(_)));
        assert_eq!(ctx.lockout_state().unwrap().attempts, 1);
    }

    #[tokio::test]
    async fn test_altered_salt_or_iv_never_decrypts() {
        let engine = engine();
        let words = WordSet::english();

        for plaintext in ["a", SEED_12] {
            for index in [0, SALT_LEN - 1, SALT_LEN, SALT_LEN + IV_LEN - 1] {
                for _ in 0..10 {
                    let mut ctx = context();
                    let text = engine.encrypt(&ctx, plaintext, PASSWORD).await.unwrap();
                    let tampered = flip(&text, index);

                    let err = engine
                        .decrypt(&mut ctx, &tampered, PASSWORD, &words)
                        .await
                        .unwrap_err();
                    assert!(
                        matches!(err, SeedVaultError::Format(_)),
                        "byte {index}: unexpected error {err}"
                    );
                    assert_eq!(ctx.lockout_state().unwrap().attempts, 1);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_altered_envelope_does_not_reset_attempts() {
        let mut ctx = context();
        let engine = engine();
        let words = WordSet::english();
        let text = engine.encrypt(&ctx, "a", PASSWORD).await.unwrap();

        engine
            .decrypt(&mut ctx, &text, "wrongpass123456", &words)
            .await
            .unwrap_err();
        engine
            .decrypt(&mut ctx, &flip(&text, 0), PASSWORD, &words)
            .await
            .unwrap_err();
        assert_eq!(ctx.lockout_state().unwrap().attempts, 2);
    }

    #[tokio::test]
    async fn test_counter_write_failure_keeps_outcome() {
        let mut ctx = VaultContext::new(
            CounterWritesFail::default(),
            ManualClock::new(1_700_000_000_000),
        );
        let engine = engine();
        let words = WordSet::english();
        let text = engine.encrypt(&ctx, SEED_12, PASSWORD).await.unwrap();

        let phrase = engine.decrypt(&mut ctx, &text, PASSWORD, &words).await.unwrap();
        assert_eq!(phrase.as_str(), SEED_12);

        let err = engine
            .decrypt(&mut ctx, &text, "wrongpass123456", &words)
            .await
            .unwrap_err();
        assert!(matches!(err, SeedVaultError::Authentication));
    }

    #[tokio::test]
    async fn test_buffers_wiped_after_calls() {
        let mut ctx = context();
        let engine = engine();
        let text = engine.encrypt(&ctx, SEED_12, PASSWORD).await.unwrap();
        engine
            .decrypt(&mut ctx, &text, PASSWORD, &WordSet::english())
            .await
            .unwrap();
        assert_eq!(ctx.registry().tracked_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_iterations_exhausts_retries() {
        let ctx = context();
        let engine = CipherEngine::new(KdfParams { iterations: 0 }, RetryPolicy::default());

        let err = engine.encrypt(&ctx, "secret", PASSWORD).await.unwrap_err();
        match err {
            SeedVaultError::RetriesExhausted {
                operation,
                attempts,
                ..
            } => {
                assert_eq!(operation, "encrypt");
                assert_eq!(attempts, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(ctx.registry().tracked_count(), 0);
    }
}
