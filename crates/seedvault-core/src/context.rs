//! The explicit state every core call runs against.
//!
//! Lockout counters and the security log live in the store; live secret
//! buffers live in the registry. Nothing is global: two contexts never share
//! state unless they share a store.

use chrono::{DateTime, TimeZone, Utc};

use crate::clock::Clock;
use crate::error::Result;
use crate::lockout::{LockoutManager, LockoutPolicy, LockoutState, LockoutStatus};
use crate::secure::SecureBufferRegistry;
use crate::security_log::{self, SecurityEvent, SecurityEventType, SecurityLog};
use crate::storage::KeyValueStore;

pub struct VaultContext<S: KeyValueStore, C: Clock> {
    store: S,
    clock: C,
    registry: SecureBufferRegistry,
    lockout_policy: LockoutPolicy,
}

impl<S: KeyValueStore, C: Clock> VaultContext<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            registry: SecureBufferRegistry::new(),
            lockout_policy: LockoutPolicy::default(),
        }
    }

    pub fn with_lockout_policy(mut self, policy: LockoutPolicy) -> Self {
        self.lockout_policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn registry(&self) -> &SecureBufferRegistry {
        &self.registry
    }

    pub fn lockout_policy(&self) -> LockoutPolicy {
        self.lockout_policy
    }

    /// Current time as a UTC timestamp.
    pub fn now(&self) -> DateTime<Utc> {
        let millis = i64::try_from(self.clock.now_millis()).unwrap_or(i64::MAX);
        Utc.timestamp_millis_opt(millis)
            .single()
            .unwrap_or_else(Utc::now)
    }

    pub fn lockout(&mut self) -> LockoutManager<'_, S, C> {
        LockoutManager::new(&mut self.store, &self.clock, self.lockout_policy)
    }

    pub fn lockout_state(&self) -> Result<LockoutState> {
        LockoutState::load(&self.store)
    }

    pub fn lockout_status(&self) -> Result<LockoutStatus> {
        let state = self.lockout_state()?;
        Ok(self.lockout_policy.status(&state, self.clock.now_millis()))
    }

    pub fn security_log(&mut self) -> SecurityLog<'_, S> {
        SecurityLog::new(&mut self.store)
    }

    pub fn security_events(&self) -> Result<Vec<SecurityEvent>> {
        security_log::load_events(&self.store)
    }

    /// Append an event stamped with the context clock.
    pub fn record_event(
        &mut self,
        event_type: SecurityEventType,
        context: impl Into<String>,
    ) -> Result<()> {
        let event = SecurityEvent::new(self.now(), event_type, context);
        self.security_log().append(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;

    #[test]
    fn test_views_share_one_store() {
        let clock = ManualClock::new(1_700_000_000_000);
        let mut ctx = VaultContext::new(MemoryStore::new(), clock.clone());

        ctx.lockout().record_failure().unwrap();
        ctx.record_event(SecurityEventType::DecryptFailure, "kind=authentication")
            .unwrap();

        assert_eq!(ctx.lockout_state().unwrap().attempts, 1);
        let events = ctx.security_events().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(ctx.store().len(), 3);
    }

    #[test]
    fn test_custom_lockout_policy() {
        let policy = LockoutPolicy {
            max_attempts: 2,
            duration_ms: 1_000,
        };
        let mut ctx =
            VaultContext::new(MemoryStore::new(), ManualClock::new(0)).with_lockout_policy(policy);
        ctx.lockout().record_failure().unwrap();
        ctx.lockout().record_failure().unwrap();

        let status = ctx.lockout_status().unwrap();
        assert!(status.locked);
        assert_eq!(status.remaining_ms, 1_000);
    }
}
