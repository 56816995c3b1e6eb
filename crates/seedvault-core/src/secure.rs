//! Tracking and zeroing of transient secret buffers.
//!
//! Password encodings, plaintext encodings, salts and IVs live in
//! [`SecretBuffer`]s for the duration of one encrypt/decrypt call. The
//! [`SecureBufferRegistry`] remembers which buffers are still live so they
//! can be wiped explicitly, on a delayed safety-net timer, or all at once on
//! shutdown.
//!
//! Wiping is best effort: it zeroes the bytes owned by the buffer and nothing
//! else. Copies taken earlier (for example the `&str` a password was encoded
//! from) are out of reach.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use zeroize::{Zeroize, Zeroizing};

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// A heap byte buffer holding secret material.
///
/// Clones share the same bytes, so wiping through any handle (or through the
/// registry) zeroes them for every holder. The bytes are zeroed again when the
/// last handle is dropped.
#[derive(Clone)]
pub struct SecretBuffer {
    id: u64,
    bytes: Arc<Mutex<Zeroizing<Vec<u8>>>>,
}

impl SecretBuffer {
    /// Take ownership of `bytes` as secret material.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            id: NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed),
            bytes: Arc::new(Mutex::new(Zeroizing::new(bytes))),
        }
    }

    /// Copy `bytes` into a new secret buffer.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }

    /// Number of bytes held. Wiping does not change the length.
    pub fn len(&self) -> usize {
        lock(&self.bytes).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when every byte is zero.
    pub fn is_wiped(&self) -> bool {
        lock(&self.bytes).iter().all(|b| *b == 0)
    }

    /// Borrow the bytes for the duration of `f`.
    ///
    /// Do not copy the bytes out of the closure into unmanaged storage.
    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        let guard = lock(&self.bytes);
        f(guard.as_slice())
    }

    fn zero(&self) {
        lock(&self.bytes).as_mut_slice().zeroize();
    }
}

impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBuffer")
            .field("id", &self.id)
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Registry of live secret buffers.
///
/// Cloning the registry yields another handle to the same tracked set.
#[derive(Clone, Default)]
pub struct SecureBufferRegistry {
    tracked: Arc<Mutex<HashMap<u64, SecretBuffer>>>,
}

impl SecureBufferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer from `bytes` and track it.
    pub fn secret(&self, bytes: Vec<u8>) -> SecretBuffer {
        let buffer = SecretBuffer::new(bytes);
        self.track(&buffer);
        buffer
    }

    /// Register a buffer for eventual zeroing.
    pub fn track(&self, buffer: &SecretBuffer) {
        lock(&self.tracked).insert(buffer.id, buffer.clone());
    }

    /// Zero every byte of `buffer` now and stop tracking it.
    ///
    /// Idempotent: wiping an already-wiped or untracked buffer is a no-op
    /// apart from re-zeroing.
    pub fn wipe(&self, buffer: &SecretBuffer) {
        buffer.zero();
        lock(&self.tracked).remove(&buffer.id);
    }

    /// Wipe `buffer` if there is one.
    pub fn wipe_opt(&self, buffer: Option<&SecretBuffer>) {
        if let Some(buffer) = buffer {
            self.wipe(buffer);
        }
    }

    /// Track `buffer` and schedule an automatic wipe after `delay`.
    ///
    /// This is a safety net for callers that forget to wipe. It needs a tokio
    /// runtime; without one the buffer stays tracked until [`wipe`] or
    /// [`wipe_all`] runs and `None` is returned.
    ///
    /// [`wipe`]: SecureBufferRegistry::wipe
    /// [`wipe_all`]: SecureBufferRegistry::wipe_all
    pub fn track_with_delayed_wipe(
        &self,
        buffer: &SecretBuffer,
        delay: Duration,
    ) -> Option<JoinHandle<()>> {
        self.track(buffer);
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(
                    buffer_id = buffer.id,
                    "no async runtime; delayed wipe not scheduled"
                );
                return None;
            }
        };
        let registry = self.clone();
        let buffer = buffer.clone();
        Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            registry.wipe(&buffer);
        }))
    }

    /// Whether `buffer` is currently tracked.
    pub fn is_tracked(&self, buffer: &SecretBuffer) -> bool {
        lock(&self.tracked).contains_key(&buffer.id)
    }

    /// Number of buffers currently tracked.
    pub fn tracked_count(&self) -> usize {
        lock(&self.tracked).len()
    }

    /// Wipe and untrack every tracked buffer. Returns how many were wiped.
    pub fn wipe_all(&self) -> usize {
        let drained: Vec<SecretBuffer> = lock(&self.tracked).drain().map(|(_, b)| b).collect();
        for buffer in &drained {
            buffer.zero();
        }
        drained.len()
    }
}

impl fmt::Debug for SecureBufferRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureBufferRegistry")
            .field("tracked", &self.tracked_count())
            .finish()
    }
}

// A panic while a buffer was locked must not stop later wipes.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("secure buffer lock poisoned; continuing");
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wipe_zeroes_in_place_and_untracks() {
        let registry = SecureBufferRegistry::new();
        let buffer = registry.secret(b"correct horse".to_vec());
        assert!(registry.is_tracked(&buffer));
        assert!(!buffer.is_wiped());

        registry.wipe(&buffer);

        assert!(buffer.is_wiped());
        assert_eq!(buffer.len(), 13);
        assert!(!registry.is_tracked(&buffer));
    }

    #[test]
    fn test_wipe_is_idempotent() {
        let registry = SecureBufferRegistry::new();
        let buffer = registry.secret(vec![7u8; 8]);
        registry.wipe(&buffer);
        registry.wipe(&buffer);
        registry.wipe_opt(None);
        assert!(buffer.is_wiped());
        assert_eq!(registry.tracked_count(), 0);
    }

    #[test]
    fn test_clones_share_bytes() {
        let registry = SecureBufferRegistry::new();
        let buffer = registry.secret(vec![1, 2, 3]);
        let alias = buffer.clone();
        registry.wipe(&alias);
        assert!(buffer.is_wiped());
    }

    #[test]
    fn test_wipe_all_clears_registry() {
        let registry = SecureBufferRegistry::new();
        let a = registry.secret(vec![1; 4]);
        let b = registry.secret(vec![2; 4]);
        assert_eq!(registry.wipe_all(), 2);
        assert!(a.is_wiped());
        assert!(b.is_wiped());
        assert_eq!(registry.tracked_count(), 0);
    }

    #[test]
    fn test_debug_redacts_bytes() {
        let buffer = SecretBuffer::from_slice(b"hunter2hunter2");
        let debug_output = format!("{:?}", buffer);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("hunter2"));
    }

    #[test]
    fn test_delayed_wipe_without_runtime_keeps_tracking() {
        let registry = SecureBufferRegistry::new();
        let buffer = SecretBuffer::new(vec![9; 4]);
        let handle = registry.track_with_delayed_wipe(&buffer, Duration::from_millis(10));
        assert!(handle.is_none());
        assert!(registry.is_tracked(&buffer));
        assert!(!buffer.is_wiped());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_wipe_fires_after_delay() {
        let registry = SecureBufferRegistry::new();
        let buffer = SecretBuffer::new(vec![9; 4]);
        let handle = registry
            .track_with_delayed_wipe(&buffer, Duration::from_millis(5_000))
            .expect("runtime available");

        tokio::time::sleep(Duration::from_millis(4_999)).await;
        assert!(!buffer.is_wiped());

        handle.await.expect("wipe task");
        assert!(buffer.is_wiped());
        assert!(!registry.is_tracked(&buffer));
    }
}
