//! Mutex-guarded relay status.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::quality::FixQuality;
use crate::core::TransportCloser;

#[derive(Default)]
struct StatusInner {
    connected: bool,
    last_position: String,
    byte_counter: u64,
    retry_count: u32,
    closer: Option<Box<dyn TransportCloser>>,
}

/// Status shared by the relay loop, serial ingest, health monitor and any
/// reporter.
///
/// Construct once, wrap in an `Arc`, and hand a clone to every task. The
/// lock is held only to copy a value in or out; no method performs I/O
/// while holding it.
#[derive(Default)]
pub struct SharedStatus {
    inner: Mutex<StatusInner>,
}

impl SharedStatus {
    /// Create a disconnected status with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking writer leaves plain values behind, so the data is still
    // meaningful after poisoning.
    fn lock(&self) -> MutexGuard<'_, StatusInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of every reportable field.
    pub fn snapshot(&self) -> StatusSnapshot {
        let inner = self.lock();
        StatusSnapshot {
            connected: inner.connected,
            last_position: inner.last_position.clone(),
            byte_counter: inner.byte_counter,
            retry_count: inner.retry_count,
        }
    }

    /// Whether the relay is marked as streaming.
    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }

    /// Most recent accepted position sentence (empty until one arrives).
    pub fn last_position(&self) -> String {
        self.lock().last_position.clone()
    }

    /// Replace the last position sentence.
    pub fn set_last_position(&self, sentence: String) {
        self.lock().last_position = sentence;
    }

    /// Total correction bytes relayed since start.
    pub fn byte_counter(&self) -> u64 {
        self.lock().byte_counter
    }

    /// Add relayed bytes; returns the new total.
    pub fn add_relayed_bytes(&self, bytes: usize) -> u64 {
        let mut inner = self.lock();
        inner.byte_counter = inner.byte_counter.saturating_add(bytes as u64);
        inner.byte_counter
    }

    /// Consecutive failed connection attempts.
    pub fn retry_count(&self) -> u32 {
        self.lock().retry_count
    }

    /// Count a failed attempt; returns the new count.
    pub fn record_retry(&self) -> u32 {
        let mut inner = self.lock();
        inner.retry_count = inner.retry_count.saturating_add(1);
        inner.retry_count
    }

    /// Reset the retry counter after a successful connect.
    pub fn reset_retries(&self) {
        self.lock().retry_count = 0;
    }

    /// Mark the relay as streaming and register how to close its transport.
    pub fn mark_streaming(&self, closer: Option<Box<dyn TransportCloser>>) {
        let mut inner = self.lock();
        inner.connected = true;
        inner.closer = closer;
    }

    /// Mark the relay as disconnected after the relay loop saw its transport
    /// fail. Returns whether it was marked connected before.
    pub fn mark_disconnected(&self) -> bool {
        let mut inner = self.lock();
        inner.closer = None;
        std::mem::replace(&mut inner.connected, false)
    }

    /// Force a disconnect from outside the relay loop.
    ///
    /// Only acts when the status is marked connected, so repeated calls
    /// close the transport at most once per connection. The transport is
    /// closed after the lock is released.
    pub fn force_disconnect(&self) -> bool {
        let closer = {
            let mut inner = self.lock();
            if !inner.connected {
                return false;
            }
            inner.connected = false;
            inner.closer.take()
        };

        match closer {
            Some(closer) => closer.close(),
            None => debug!("forced disconnect without a registered transport"),
        }
        true
    }
}

impl fmt::Debug for SharedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedStatus").field(&self.snapshot()).finish()
    }
}

/// Point-in-time copy of [`SharedStatus`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Whether the relay is streaming.
    pub connected: bool,
    /// Most recent accepted position sentence.
    pub last_position: String,
    /// Total correction bytes relayed.
    pub byte_counter: u64,
    /// Consecutive failed connection attempts.
    pub retry_count: u32,
}

impl StatusSnapshot {
    /// Fix quality of the last position sentence.
    pub fn fix_quality(&self) -> FixQuality {
        FixQuality::from_sentence(&self.last_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingCloser(Arc<AtomicUsize>);

    impl TransportCloser for CountingCloser {
        fn close(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_initial_snapshot() {
        let status = SharedStatus::new();
        assert_eq!(status.snapshot(), StatusSnapshot::default());
        assert_eq!(status.snapshot().fix_quality(), FixQuality::Unknown);
    }

    #[test]
    fn test_byte_counter_accumulates() {
        let status = SharedStatus::new();
        assert_eq!(status.add_relayed_bytes(128), 128);
        assert_eq!(status.add_relayed_bytes(0), 128);
        assert_eq!(status.add_relayed_bytes(72), 200);
        assert_eq!(status.byte_counter(), 200);
    }

    #[test]
    fn test_byte_counter_survives_reconnects() {
        let status = SharedStatus::new();
        status.mark_streaming(None);
        status.add_relayed_bytes(10);
        status.mark_disconnected();
        status.mark_streaming(None);
        status.add_relayed_bytes(5);
        assert_eq!(status.byte_counter(), 15);
    }

    #[test]
    fn test_retry_counter() {
        let status = SharedStatus::new();
        assert_eq!(status.record_retry(), 1);
        assert_eq!(status.record_retry(), 2);
        status.reset_retries();
        assert_eq!(status.retry_count(), 0);
    }

    #[test]
    fn test_force_disconnect_closes_once() {
        let closes = Arc::new(AtomicUsize::new(0));
        let status = SharedStatus::new();
        status.mark_streaming(Some(Box::new(CountingCloser(closes.clone()))));

        assert!(status.force_disconnect());
        assert!(!status.is_connected());
        for _ in 0..5 {
            assert!(!status.force_disconnect());
        }
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_mark_disconnected_drops_closer() {
        let closes = Arc::new(AtomicUsize::new(0));
        let status = SharedStatus::new();
        status.mark_streaming(Some(Box::new(CountingCloser(closes.clone()))));

        assert!(status.mark_disconnected());
        assert!(!status.mark_disconnected());
        assert!(!status.force_disconnect());
        assert_eq!(closes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_concurrent_writers() {
        let status = Arc::new(SharedStatus::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let status = Arc::clone(&status);
                std::thread::spawn(move || {
                    for n in 0..1000 {
                        status.add_relayed_bytes(1);
                        status.set_last_position(format!("$GPGGA,{i},{n}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = status.snapshot();
        assert_eq!(snapshot.byte_counter, 4000);
        assert!(snapshot.last_position.ends_with(",999"));
    }
}
