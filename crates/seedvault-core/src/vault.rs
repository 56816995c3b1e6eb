//! The seed protection facade.
//!
//! [`SeedVault`] is what a front end talks to. It validates inputs, enforces
//! the lockout gate before any decryption, and writes every outcome to the
//! security log. The cryptography itself is [`CipherEngine`]'s.

use crate::clock::Clock;
use crate::context::VaultContext;
use crate::crypto::{require_password, validate_password, CipherEngine};
use crate::error::{Result, SeedVaultError};
use crate::lockout::LockoutStatus;
use crate::mnemonic::{SeedPhrase, WordSet};
use crate::security_log::{SecurityEvent, SecurityEventType};
use crate::storage::KeyValueStore;

pub struct SeedVault<S: KeyValueStore, C: Clock> {
    ctx: VaultContext<S, C>,
    engine: CipherEngine,
    words: WordSet,
}

impl<S: KeyValueStore, C: Clock> SeedVault<S, C> {
    /// A vault with the default engine and the English word list.
    pub fn new(ctx: VaultContext<S, C>) -> Self {
        Self::with_parts(ctx, CipherEngine::default(), WordSet::english())
    }

    pub fn with_parts(ctx: VaultContext<S, C>, engine: CipherEngine, words: WordSet) -> Self {
        Self { ctx, engine, words }
    }

    pub fn context(&self) -> &VaultContext<S, C> {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut VaultContext<S, C> {
        &mut self.ctx
    }

    pub fn words(&self) -> &WordSet {
        &self.words
    }

    /// Validate a seed phrase and password, then seal the normalized phrase.
    pub async fn protect(&mut self, seed_input: &str, password: &str) -> Result<String> {
        let checked = SeedPhrase::parse(seed_input, &self.words)
            .and_then(|phrase| validate_password(password).map(|()| phrase));
        let phrase = match checked {
            Ok(phrase) => phrase,
            Err(err) => {
                self.log(SecurityEventType::ValidationFailure, "operation=encrypt");
                return Err(err);
            }
        };

        let result = self
            .engine
            .encrypt(&self.ctx, phrase.as_str(), password)
            .await;
        match &result {
            Ok(_) => self.log(
                SecurityEventType::EncryptSuccess,
                format!("words={}", phrase.word_count()),
            ),
            Err(err) => self.log(
                SecurityEventType::EncryptFailure,
                format!("kind={}", err.kind()),
            ),
        }
        result
    }

    /// Refuse with [`SeedVaultError::Locked`] while the lockout is active.
    ///
    /// A refusal is logged but does not count as an attempt. Front ends can
    /// call this before asking for a password.
    pub fn check_lockout(&mut self) -> Result<()> {
        let status = match self.ctx.lockout_status() {
            Ok(status) => status,
            Err(err) => {
                self.log(
                    SecurityEventType::DecryptFailure,
                    format!("kind={}", err.kind()),
                );
                return Err(err);
            }
        };
        if status.locked {
            self.log(
                SecurityEventType::LockoutRejected,
                format!("remaining_ms={}", status.remaining_ms),
            );
            return Err(SeedVaultError::Locked {
                remaining_ms: status.remaining_ms,
            });
        }
        Ok(())
    }

    /// Open an envelope and return the recovered seed phrase.
    ///
    /// Refused with [`SeedVaultError::Locked`] while the lockout is active;
    /// a refused call does not count as an attempt.
    pub async fn recover(&mut self, envelope_text: &str, password: &str) -> Result<SeedPhrase> {
        if let Err(err) = require_password(password) {
            self.log(SecurityEventType::ValidationFailure, "operation=decrypt");
            return Err(err);
        }
        self.check_lockout()?;

        let result = self
            .engine
            .decrypt(&mut self.ctx, envelope_text, password, &self.words)
            .await;

        match &result {
            Ok(phrase) => self.log(
                SecurityEventType::DecryptSuccess,
                format!("words={}", phrase.word_count()),
            ),
            Err(err) => match self.ctx.lockout_status() {
                Ok(status) => {
                    self.log(
                        SecurityEventType::DecryptFailure,
                        format!("kind={} attempts={}", err.kind(), status.attempts),
                    );
                    if status.locked {
                        self.log(
                            SecurityEventType::LockoutEngaged,
                            format!("attempts={}", status.attempts),
                        );
                    }
                }
                Err(store_err) => {
                    tracing::warn!(error = %store_err, "failed to read lockout state");
                    self.log(
                        SecurityEventType::DecryptFailure,
                        format!("kind={}", err.kind()),
                    );
                }
            },
        }
        result
    }

    pub fn lockout_status(&self) -> Result<LockoutStatus> {
        self.ctx.lockout_status()
    }

    pub fn security_events(&self) -> Result<Vec<SecurityEvent>> {
        self.ctx.security_events()
    }

    pub fn clear_security_log(&mut self) -> Result<()> {
        self.ctx.security_log().clear()
    }

    /// Wipe every secret buffer still tracked. Returns how many were wiped.
    pub fn shutdown(&self) -> usize {
        let wiped = self.ctx.registry().wipe_all();
        tracing::debug!(wiped, "wiped tracked buffers on shutdown");
        wiped
    }

    // A failed audit write must not mask the outcome being reported.
    fn log(&mut self, event_type: SecurityEventType, context: impl Into<String>) {
        if let Err(err) = self.ctx.record_event(event_type, context) {
            tracing::warn!(event = %event_type, error = %err, "failed to write security log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::crypto::{KdfParams, RetryPolicy};
    use crate::storage::testing::CounterWritesFail;
    use crate::storage::MemoryStore;

    const SEED_12: &str =
        "abandon ability able about above absent absorb abstract absurd abuse access accident";

    fn vault() -> SeedVault<MemoryStore, ManualClock> {
        let ctx = VaultContext::new(MemoryStore::new(), ManualClock::new(1_700_000_000_000));
        let engine = CipherEngine::new(KdfParams { iterations: 1_000 }, RetryPolicy::default());
        SeedVault::with_parts(ctx, engine, WordSet::english())
    }

    #[tokio::test]
    async fn test_protect_rejects_invalid_input() {
        let mut vault = vault();

        let err = vault.protect("abandon ability", "Tr0ub4dor&3xyz!").await.unwrap_err();
        assert!(matches!(err, SeedVaultError::Validation(_)));
        let err = vault.protect(SEED_12, "short").await.unwrap_err();
        assert!(matches!(err, SeedVaultError::Validation(_)));

        let events = vault.security_events().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .all(|e| e.event_type == SecurityEventType::ValidationFailure));
    }

    #[tokio::test]
    async fn test_protect_normalizes_before_sealing() {
        let mut vault = vault();
        let text = vault
            .protect(&SEED_12.to_uppercase(), "Tr0ub4dor&3xyz!")
            .await
            .unwrap();
        let phrase = vault.recover(&text, "Tr0ub4dor&3xyz!").await.unwrap();
        assert_eq!(phrase.as_str(), SEED_12);
    }

    #[tokio::test]
    async fn test_recover_rejects_empty_password_without_counting() {
        let mut vault = vault();
        let err = vault.recover("AAAA", "").await.unwrap_err();
        assert!(matches!(err, SeedVaultError::Validation(_)));
        assert_eq!(vault.lockout_status().unwrap().attempts, 0);
    }

    #[tokio::test]
    async fn test_security_log_never_holds_secrets() {
        let mut vault = vault();
        let text = vault.protect(SEED_12, "Tr0ub4dor&3xyz!").await.unwrap();
        let _ = vault.recover(&text, "wrongpass123456").await;
        vault.recover(&text, "Tr0ub4dor&3xyz!").await.unwrap();

        let dump = serde_json::to_string(&vault.security_events().unwrap()).unwrap();
        assert!(!dump.contains("abandon"));
        assert!(!dump.contains("Tr0ub4dor"));
        assert!(!dump.contains("wrongpass"));

        vault.clear_security_log().unwrap();
        assert!(vault.security_events().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_counter_write_failure_still_logs_outcome() {
        let ctx = VaultContext::new(
            CounterWritesFail::default(),
            ManualClock::new(1_700_000_000_000),
        );
        let engine = CipherEngine::new(KdfParams { iterations: 1_000 }, RetryPolicy::default());
        let mut vault = SeedVault::with_parts(ctx, engine, WordSet::english());
        let text = vault.protect(SEED_12, "Tr0ub4dor&3xyz!").await.unwrap();

        let err = vault.recover(&text, "wrongpass123456").await.unwrap_err();
        assert!(matches!(err, SeedVaultError::Authentication));
        let phrase = vault.recover(&text, "Tr0ub4dor&3xyz!").await.unwrap();
        assert_eq!(phrase.as_str(), SEED_12);

        let kinds: Vec<SecurityEventType> = vault
            .security_events()
            .unwrap()
            .iter()
            .map(|e| e.event_type)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SecurityEventType::EncryptSuccess,
                SecurityEventType::DecryptFailure,
                SecurityEventType::DecryptSuccess,
            ]
        );
    }

    #[tokio::test]
    async fn test_check_lockout_refuses_without_counting() {
        let mut vault = vault();
        for _ in 0..5 {
            vault.context_mut().lockout().record_failure().unwrap();
        }

        let err = vault.check_lockout().unwrap_err();
        assert!(matches!(err, SeedVaultError::Locked { remaining_ms: 300_000 }));
        assert_eq!(vault.lockout_status().unwrap().attempts, 5);
        let events = vault.security_events().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, SecurityEventType::LockoutRejected);
    }

    #[tokio::test]
    async fn test_shutdown_wipes_tracked_buffers() {
        let vault = vault();
        let buffer = vault.context().registry().secret(b"leftover".to_vec());
        assert_eq!(vault.shutdown(), 1);
        assert!(buffer.is_wiped());
    }
}
