//! Brute-force lockout for decryption.
//!
//! Failed decryptions are counted in the key/value store. Once the count
//! reaches the policy limit, decryption is refused until the cooldown since
//! the last failure has elapsed. Only a successful decryption clears the
//! count, so a failure right after the cooldown re-arms the full window.
//!
//! The gate is advisory: [`CipherEngine`](crate::crypto::CipherEngine) never
//! consults it. Callers check [`LockoutManager::is_locked`] before decrypting.

use serde::Serialize;

use crate::clock::Clock;
use crate::crypto::params::{LOCKOUT_DURATION_MS, MAX_DECRYPT_ATTEMPTS};
use crate::error::Result;
use crate::storage::{KeyValueStore, KEY_DECRYPT_ATTEMPTS, KEY_LAST_ATTEMPT_TIME};

/// Lockout thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub max_attempts: u32,
    pub duration_ms: u64,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_DECRYPT_ATTEMPTS,
            duration_ms: LOCKOUT_DURATION_MS,
        }
    }
}

/// Persisted attempt counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LockoutState {
    pub attempts: u32,
    pub last_attempt_time: u64,
}

impl LockoutState {
    /// Read the counters from `store`. Missing or unparsable values count as 0.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self> {
        Ok(Self {
            attempts: read_counter(store, KEY_DECRYPT_ATTEMPTS)?,
            last_attempt_time: read_counter(store, KEY_LAST_ATTEMPT_TIME)?,
        })
    }

    fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        store.set(KEY_DECRYPT_ATTEMPTS, &self.attempts.to_string())?;
        store.set(KEY_LAST_ATTEMPT_TIME, &self.last_attempt_time.to_string())
    }
}

fn read_counter<S, T>(store: &S, key: &str) -> Result<T>
where
    S: KeyValueStore + ?Sized,
    T: std::str::FromStr + Default,
{
    match store.get(key)? {
        None => Ok(T::default()),
        Some(raw) => Ok(raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, "unparsable lockout counter; treating as 0");
            T::default()
        })),
    }
}

/// Snapshot of the lockout state for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockoutStatus {
    pub attempts: u32,
    pub locked: bool,
    pub remaining_ms: u64,
    pub attempts_remaining: u32,
}

impl LockoutPolicy {
    /// Whether `state` is locked at time `now`.
    pub fn is_locked(&self, state: &LockoutState, now: u64) -> bool {
        state.attempts >= self.max_attempts
            && now.saturating_sub(state.last_attempt_time) < self.duration_ms
    }

    /// Time left in the cooldown window, 0 when it has elapsed.
    ///
    /// Computed from the last failure regardless of the attempt count.
    pub fn remaining_millis(&self, state: &LockoutState, now: u64) -> u64 {
        self.duration_ms
            .saturating_sub(now.saturating_sub(state.last_attempt_time))
    }

    pub fn status(&self, state: &LockoutState, now: u64) -> LockoutStatus {
        let locked = self.is_locked(state, now);
        LockoutStatus {
            attempts: state.attempts,
            locked,
            remaining_ms: if locked {
                self.remaining_millis(state, now)
            } else {
                0
            },
            attempts_remaining: self.max_attempts.saturating_sub(state.attempts),
        }
    }
}

/// Records decryption outcomes against a store.
pub struct LockoutManager<'a, S: KeyValueStore + ?Sized, C: Clock + ?Sized> {
    store: &'a mut S,
    clock: &'a C,
    policy: LockoutPolicy,
}

impl<'a, S: KeyValueStore + ?Sized, C: Clock + ?Sized> LockoutManager<'a, S, C> {
    pub fn new(store: &'a mut S, clock: &'a C, policy: LockoutPolicy) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    pub fn state(&self) -> Result<LockoutState> {
        LockoutState::load(&*self.store)
    }

    /// Count a failed decryption and stamp it with the current time.
    pub fn record_failure(&mut self) -> Result<LockoutState> {
        let mut state = self.state()?;
        state.attempts = state.attempts.saturating_add(1);
        state.last_attempt_time = self.clock.now_millis();
        state.save(&mut *self.store)?;

        tracing::debug!(attempts = state.attempts, "recorded failed decryption");
        if state.attempts == self.policy.max_attempts {
            tracing::info!(
                attempts = state.attempts,
                duration_ms = self.policy.duration_ms,
                "decryption lockout engaged"
            );
        }
        Ok(state)
    }

    /// Clear the counters after a successful decryption.
    pub fn record_success(&mut self) -> Result<()> {
        let state = LockoutState::default();
        state.save(&mut *self.store)
    }

    pub fn is_locked(&self) -> Result<bool> {
        Ok(self
            .policy
            .is_locked(&self.state()?, self.clock.now_millis()))
    }

    pub fn remaining_lockout_millis(&self) -> Result<u64> {
        Ok(self
            .policy
            .remaining_millis(&self.state()?, self.clock.now_millis()))
    }

    pub fn status(&self) -> Result<LockoutStatus> {
        Ok(self.policy.status(&self.state()?, self.clock.now_millis()))
    }
}
