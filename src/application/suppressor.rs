//! Duplicate-reply suppression.
//!
//! The suppressor remembers which replies were sent for which queries during
//! the current window and withholds a candidate reply when the same reply was
//! already sent for a near-identical query.

use crate::application::config::{BuildError, SuppressorConfig};
use crate::application::metrics::Metrics;
use crate::application::ports::{Clock, SimilarityOracle};
use crate::domain::{
    decision::SuppressionDecision,
    entry::ReplyEntry,
    window::{Insertion, SuppressionWindow, WindowState},
};

use std::panic;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Gate deciding whether a computed reply should be withheld.
///
/// Construct one per process and share it (`Arc`) with every request
/// handler. All operations take `&self`; the window is guarded by a single
/// mutex so concurrent handlers are serialized.
///
/// # Example
/// ```
/// use reply_throttle::DuplicateReplySuppressor;
///
/// let suppressor = DuplicateReplySuppressor::new_default();
///
/// assert!(!suppressor.should_suppress("光炮 1", "10分鐘"));
/// // Same answer to a query one character away: withheld.
/// assert!(suppressor.should_suppress("光炮1", "10分鐘"));
/// // A different answer is never withheld.
/// assert!(!suppressor.should_suppress("光炮1", "11分鐘"));
/// ```
#[derive(Debug)]
pub struct DuplicateReplySuppressor {
    window: Mutex<SuppressionWindow>,
    config: SuppressorConfig,
    clock: Arc<dyn Clock>,
    oracle: Arc<dyn SimilarityOracle>,
    metrics: Metrics,
}

impl DuplicateReplySuppressor {
    /// Create a suppressor from explicit parts.
    ///
    /// The first window starts at `clock.now()`.
    ///
    /// # Errors
    /// Returns `BuildError` if the configuration is invalid.
    pub fn new(
        config: SuppressorConfig,
        clock: Arc<dyn Clock>,
        oracle: Arc<dyn SimilarityOracle>,
    ) -> Result<Self, BuildError> {
        config.validate()?;
        Ok(Self::from_parts_unchecked(config, clock, oracle))
    }

    pub(crate) fn from_parts_unchecked(
        config: SuppressorConfig,
        clock: Arc<dyn Clock>,
        oracle: Arc<dyn SimilarityOracle>,
    ) -> Self {
        let window = SuppressionWindow::new(clock.now());
        Self {
            window: Mutex::new(window),
            config,
            clock,
            oracle,
            metrics: Metrics::new(),
        }
    }

    /// Decide whether `candidate_reply` to `query` should be withheld.
    ///
    /// Returns `true` to suppress. On `false` the pair has been remembered
    /// and the caller is expected to deliver the reply.
    pub fn should_suppress(&self, query: &str, candidate_reply: &str) -> bool {
        self.check(query, candidate_reply).is_suppress()
    }

    /// Same as `should_suppress`, returning a `SuppressionDecision`.
    ///
    /// # Fail-Safe Behavior
    /// This never fails. If the similarity oracle panics the reply is
    /// allowed, nothing is recorded and the failure is counted.
    pub fn check(&self, query: &str, candidate_reply: &str) -> SuppressionDecision {
        let now = self.clock.now();
        let mut window = self.lock_window();

        if window.refresh(now, self.config.expiry) {
            self.metrics.record_expiry();
            info!(
                expiry_secs = self.config.expiry.as_secs(),
                "Suppression window expired, starting a new one"
            );
        }

        let exempt = candidate_reply.is_empty() && !self.config.suppress_empty_replies;
        if !exempt {
            let oracle = &self.oracle;
            let threshold = self.config.similarity_threshold;
            let scan = panic::catch_unwind(panic::AssertUnwindSafe(|| {
                window
                    .find_match(|entry| {
                        entry.reply == candidate_reply
                            && oracle.is_similar(&entry.query, query, threshold)
                    })
                    .map(|entry| entry.query.clone())
            }));

            match scan {
                Ok(Some(matched_query)) => {
                    self.metrics.record_suppressed();
                    debug!(
                        query = %query,
                        matched_query = %matched_query,
                        "Suppressing duplicate reply"
                    );
                    return SuppressionDecision::Suppress;
                }
                Ok(None) => {}
                Err(_) => {
                    self.metrics.record_oracle_failure();
                    self.metrics.record_allowed();
                    warn!(query = %query, "Similarity check panicked, allowing reply");
                    return SuppressionDecision::Allow;
                }
            }
        }

        if !candidate_reply.is_empty() || self.config.record_empty_replies {
            let entry = ReplyEntry::new(query, candidate_reply);
            if let Insertion::Evicted(old) = window.insert(entry, self.config.max_entries) {
                self.metrics.record_eviction();
                debug!(evicted = %old, "Window full, evicted oldest reply");
            }
        }

        self.metrics.record_allowed();
        debug!(query = %query, entries = window.len(), "Reply allowed");
        SuppressionDecision::Allow
    }

    /// Forget every remembered reply right away.
    ///
    /// The window keeps its creation instant, so it still expires on its
    /// original schedule. Returns the number of entries cleared.
    pub fn force_unlock(&self) -> usize {
        let cleared = self.lock_window().clear();
        self.metrics.record_unlock();
        info!(cleared, "Suppression window unlocked");
        cleared
    }

    /// Number of remembered replies in the current window.
    ///
    /// An expired window is only replaced by the next check, so this may
    /// count entries of a window that is already expired.
    pub fn len(&self) -> usize {
        self.lock_window().len()
    }

    /// Whether the current window is empty.
    pub fn is_empty(&self) -> bool {
        self.lock_window().is_empty()
    }

    /// Creation instant of the current window.
    pub fn created_at(&self) -> Instant {
        self.lock_window().created_at()
    }

    /// Fresh/Expired state of the current window right now.
    pub fn state(&self) -> WindowState {
        let now = self.clock.now();
        self.lock_window().state(now, self.config.expiry)
    }

    /// Copy of the remembered entries, oldest first.
    pub fn entries(&self) -> Vec<ReplyEntry> {
        self.lock_window().iter().cloned().collect()
    }

    /// Active configuration.
    pub fn config(&self) -> &SuppressorConfig {
        &self.config
    }

    /// Metrics handle.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    // A panic while the lock is held cannot leave the window half-updated,
    // so a poisoned lock is simply taken over.
    fn lock_window(&self) -> MutexGuard<'_, SuppressionWindow> {
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
