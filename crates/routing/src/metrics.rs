//! Routing metrics
//!
//! Atomic counters shared between a `SignalRouter` and whoever reports on
//! it. Relaxed ordering throughout; values are eventually consistent.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one signal router
#[derive(Debug, Default)]
pub struct RoutingMetrics {
    /// Requests passed to `route()`
    requests_routed: AtomicU64,

    /// Leaf records assigned by a matching route
    records_matched: AtomicU64,

    /// Leaf records sent to the default pipelines
    records_defaulted: AtomicU64,

    /// Leaf records no route matched and no default took
    records_dropped: AtomicU64,

    /// Predicate evaluation failures counted under `error_mode = ignore`
    predicate_errors: AtomicU64,
}

impl RoutingMetrics {
    #[inline]
    pub const fn new() -> Self {
        Self {
            requests_routed: AtomicU64::new(0),
            records_matched: AtomicU64::new(0),
            records_defaulted: AtomicU64::new(0),
            records_dropped: AtomicU64::new(0),
            predicate_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_request(&self) {
        self.requests_routed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_matched(&self, records: usize) {
        self.records_matched
            .fetch_add(records as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_defaulted(&self, records: usize) {
        self.records_defaulted
            .fetch_add(records as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_dropped(&self, records: usize) {
        self.records_dropped
            .fetch_add(records as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_predicate_error(&self) {
        self.predicate_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> RoutingSnapshot {
        RoutingSnapshot {
            requests_routed: self.requests_routed.load(Ordering::Relaxed),
            records_matched: self.records_matched.load(Ordering::Relaxed),
            records_defaulted: self.records_defaulted.load(Ordering::Relaxed),
            records_dropped: self.records_dropped.load(Ordering::Relaxed),
            predicate_errors: self.predicate_errors.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of `RoutingMetrics`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutingSnapshot {
    pub requests_routed: u64,
    pub records_matched: u64,
    pub records_defaulted: u64,
    pub records_dropped: u64,
    pub predicate_errors: u64,
}
