//! Dispatch metrics
//!
//! Atomic counters for the dispatcher. Relaxed ordering; values are
//! eventually consistent.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one dispatcher
///
/// Shared across dispatcher generations so counts survive a routing reload.
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Routing results passed to `dispatch()`
    dispatches: AtomicU64,

    /// Destination sends that succeeded
    sends_success: AtomicU64,

    /// Destination sends that failed (unregistered, closed, rejected)
    sends_failed: AtomicU64,

    /// Leaf records delivered to sinks
    records_sent: AtomicU64,

    /// Dispatch errors logged and dropped under `error_mode = ignore`
    errors_ignored: AtomicU64,

    /// Dispatches abandoned by cancellation
    cancelled: AtomicU64,
}

impl DispatchMetrics {
    #[inline]
    pub const fn new() -> Self {
        Self {
            dispatches: AtomicU64::new(0),
            sends_success: AtomicU64::new(0),
            sends_failed: AtomicU64::new(0),
            records_sent: AtomicU64::new(0),
            errors_ignored: AtomicU64::new(0),
            cancelled: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_dispatch(&self) {
        self.dispatches.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_send_success(&self, records: usize) {
        self.sends_success.fetch_add(1, Ordering::Relaxed);
        self.records_sent
            .fetch_add(records as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_send_failed(&self) {
        self.sends_failed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_error_ignored(&self) {
        self.errors_ignored.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> DispatchSnapshot {
        DispatchSnapshot {
            dispatches: self.dispatches.load(Ordering::Relaxed),
            sends_success: self.sends_success.load(Ordering::Relaxed),
            sends_failed: self.sends_failed.load(Ordering::Relaxed),
            records_sent: self.records_sent.load(Ordering::Relaxed),
            errors_ignored: self.errors_ignored.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of `DispatchMetrics`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSnapshot {
    pub dispatches: u64,
    pub sends_success: u64,
    pub sends_failed: u64,
    pub records_sent: u64,
    pub errors_ignored: u64,
    pub cancelled: u64,
}

impl DispatchSnapshot {
    /// Fraction of sends that succeeded, 1.0 when nothing was sent
    pub fn success_rate(&self) -> f64 {
        let total = self.sends_success + self.sends_failed;
        if total == 0 {
            return 1.0;
        }
        self.sends_success as f64 / total as f64
    }
}
