//! Bounded audit trail of protect/recover outcomes.
//!
//! Entries live as a JSON array under the `security_logs` key and hold only
//! event kinds, error kinds and counters. The oldest entries are evicted once
//! the log grows past its capacity.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::params::SECURITY_LOG_CAPACITY;
use crate::error::Result;
use crate::storage::{KeyValueStore, KEY_SECURITY_LOGS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityEventType {
    EncryptSuccess,
    EncryptFailure,
    DecryptSuccess,
    DecryptFailure,
    LockoutEngaged,
    LockoutRejected,
    ValidationFailure,
}

impl SecurityEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityEventType::EncryptSuccess => "encrypt_success",
            SecurityEventType::EncryptFailure => "encrypt_failure",
            SecurityEventType::DecryptSuccess => "decrypt_success",
            SecurityEventType::DecryptFailure => "decrypt_failure",
            SecurityEventType::LockoutEngaged => "lockout_engaged",
            SecurityEventType::LockoutRejected => "lockout_rejected",
            SecurityEventType::ValidationFailure => "validation_failure",
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(
            self,
            SecurityEventType::EncryptSuccess | SecurityEventType::DecryptSuccess
        )
    }
}

impl fmt::Display for SecurityEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: SecurityEventType,
    pub context: String,
}

impl SecurityEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        event_type: SecurityEventType,
        context: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            event_type,
            context: context.into(),
        }
    }
}

/// Read the persisted log, oldest first. A corrupt log reads as empty.
pub fn load_events<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<SecurityEvent>> {
    let Some(raw) = store.get(KEY_SECURITY_LOGS)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&raw) {
        Ok(events) => Ok(events),
        Err(err) => {
            tracing::warn!(error = %err, "discarding unreadable security log");
            Ok(Vec::new())
        }
    }
}

/// Append/clear access to the log in a store.
pub struct SecurityLog<'a, S: KeyValueStore + ?Sized> {
    store: &'a mut S,
    capacity: usize,
}

impl<'a, S: KeyValueStore + ?Sized> SecurityLog<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self::with_capacity(store, SECURITY_LOG_CAPACITY)
    }

    pub fn with_capacity(store: &'a mut S, capacity: usize) -> Self {
        Self {
            store,
            capacity: capacity.max(1),
        }
    }

    pub fn entries(&self) -> Result<Vec<SecurityEvent>> {
        load_events(&*self.store)
    }

    /// Append `event`, evicting the oldest entries beyond capacity.
    pub fn append(&mut self, event: SecurityEvent) -> Result<()> {
        let mut events = self.entries()?;
        events.push(event);
        if events.len() > self.capacity {
            let excess = events.len() - self.capacity;
            events.drain(..excess);
        }
        let encoded = serde_json::to_string(&events)?;
        self.store.set(KEY_SECURITY_LOGS, &encoded)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(KEY_SECURITY_LOGS)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::storage::MemoryStore;

    fn event(n: i64, event_type: SecurityEventType) -> SecurityEvent {
        let timestamp = Utc.timestamp_millis_opt(1_700_000_000_000 + n).unwrap();
        SecurityEvent::new(timestamp, event_type, format!("n={}", n))
    }

    #[test]
    fn test_append_and_read_back() {
        let mut store = MemoryStore::new();
        let mut log = SecurityLog::new(&mut store);
        log.append(event(1, SecurityEventType::EncryptSuccess)).unwrap();
        log.append(event(2, SecurityEventType::DecryptFailure)).unwrap();

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event_type, SecurityEventType::EncryptSuccess);
        assert_eq!(entries[1].context, "n=2");
    }

    #[test]
    fn test_evicts_oldest_beyond_capacity() {
        let mut store = MemoryStore::new();
        let mut log = SecurityLog::new(&mut store);
        for n in 0..55 {
            log.append(event(n, SecurityEventType::DecryptFailure)).unwrap();
        }

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 50);
        assert_eq!(entries[0].context, "n=5");
        assert_eq!(entries[49].context, "n=54");
    }

    #[test]
    fn test_clear_removes_key() {
        let mut store = MemoryStore::new();
        let mut log = SecurityLog::new(&mut store);
        log.append(event(1, SecurityEventType::LockoutEngaged)).unwrap();
        log.clear().unwrap();
        assert!(log.entries().unwrap().is_empty());
        drop(log);
        assert_eq!(store.get(KEY_SECURITY_LOGS).unwrap(), None);
    }

    #[test]
    fn test_corrupt_log_restarts() {
        let mut store = MemoryStore::new();
        store.set(KEY_SECURITY_LOGS, "{not json").unwrap();

        let mut log = SecurityLog::new(&mut store);
        assert!(log.entries().unwrap().is_empty());
        log.append(event(1, SecurityEventType::ValidationFailure)).unwrap();
        assert_eq!(log.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_only_successes_are_not_failures() {
        assert!(!SecurityEventType::EncryptSuccess.is_failure());
        assert!(!SecurityEventType::DecryptSuccess.is_failure());
        assert!(SecurityEventType::DecryptFailure.is_failure());
        assert!(SecurityEventType::LockoutRejected.is_failure());
        assert!(SecurityEventType::ValidationFailure.is_failure());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(event(0, SecurityEventType::LockoutRejected)).unwrap();
        assert_eq!(json["event_type"], "lockout_rejected");
        assert!(json["timestamp"].as_str().unwrap().starts_with("2023-11-14"));
    }
}
