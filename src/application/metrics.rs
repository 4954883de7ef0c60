//! Observability counters for the suppressor.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters describing suppressor behavior.
///
/// All counters use relaxed atomics. Clones share the same counters, so the
/// handle returned by `DuplicateReplySuppressor::metrics` stays live.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    replies_allowed: AtomicU64,
    replies_suppressed: AtomicU64,
    /// Wholesale resets caused by window expiry
    windows_expired: AtomicU64,
    /// Administrative unlocks
    unlocks: AtomicU64,
    /// Entries dropped to respect `max_entries`
    entries_evicted: AtomicU64,
    /// Checks that failed open because the similarity oracle panicked
    oracle_failures: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    pub(crate) fn record_allowed(&self) {
        self.inner.replies_allowed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_suppressed(&self) {
        self.inner.replies_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_expiry(&self) {
        self.inner.windows_expired.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unlock(&self) {
        self.inner.unlocks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.inner.entries_evicted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_oracle_failure(&self) {
        self.inner.oracle_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Total replies allowed.
    pub fn replies_allowed(&self) -> u64 {
        self.inner.replies_allowed.load(Ordering::Relaxed)
    }

    /// Total replies suppressed.
    pub fn replies_suppressed(&self) -> u64 {
        self.inner.replies_suppressed.load(Ordering::Relaxed)
    }

    /// Total windows discarded because they expired.
    pub fn windows_expired(&self) -> u64 {
        self.inner.windows_expired.load(Ordering::Relaxed)
    }

    /// Total administrative unlocks.
    pub fn unlocks(&self) -> u64 {
        self.inner.unlocks.load(Ordering::Relaxed)
    }

    /// Total entries evicted by the `max_entries` cap.
    pub fn entries_evicted(&self) -> u64 {
        self.inner.entries_evicted.load(Ordering::Relaxed)
    }

    /// Total checks that failed open.
    pub fn oracle_failures(&self) -> u64 {
        self.inner.oracle_failures.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            replies_allowed: self.replies_allowed(),
            replies_suppressed: self.replies_suppressed(),
            windows_expired: self.windows_expired(),
            unlocks: self.unlocks(),
            entries_evicted: self.entries_evicted(),
            oracle_failures: self.oracle_failures(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub replies_allowed: u64,
    pub replies_suppressed: u64,
    pub windows_expired: u64,
    pub unlocks: u64,
    pub entries_evicted: u64,
    pub oracle_failures: u64,
}

impl MetricsSnapshot {
    /// Ratio of suppressed replies to all checked replies (0.0 to 1.0).
    ///
    /// Returns 0.0 if nothing has been checked.
    pub fn suppression_rate(&self) -> f64 {
        let total = self.total_checked();
        if total == 0 {
            0.0
        } else {
            self.replies_suppressed as f64 / total as f64
        }
    }

    /// Replies checked (allowed + suppressed).
    pub fn total_checked(&self) -> u64 {
        self.replies_allowed.saturating_add(self.replies_suppressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initial_state() {
        let metrics = Metrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_snapshot() {
        let metrics = Metrics::new();
        metrics.record_allowed();
        metrics.record_allowed();
        metrics.record_suppressed();
        metrics.record_expiry();
        metrics.record_unlock();
        metrics.record_eviction();
        metrics.record_oracle_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.replies_allowed, 2);
        assert_eq!(snapshot.replies_suppressed, 1);
        assert_eq!(snapshot.windows_expired, 1);
        assert_eq!(snapshot.unlocks, 1);
        assert_eq!(snapshot.entries_evicted, 1);
        assert_eq!(snapshot.oracle_failures, 1);
        assert_eq!(snapshot.total_checked(), 3);
    }

    #[test]
    fn test_suppression_rate() {
        let metrics = Metrics::new();
        assert_eq!(metrics.snapshot().suppression_rate(), 0.0);

        metrics.record_allowed();
        metrics.record_suppressed();
        assert!((metrics.snapshot().suppression_rate() - 0.5).abs() < f64::EPSILON);

        metrics.record_suppressed();
        metrics.record_suppressed();
        assert!((metrics.snapshot().suppression_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics1 = Metrics::new();
        metrics1.record_allowed();

        let metrics2 = metrics1.clone();
        metrics2.record_allowed();

        assert_eq!(metrics1.replies_allowed(), 2);
        assert_eq!(metrics2.replies_allowed(), 2);
    }
}
