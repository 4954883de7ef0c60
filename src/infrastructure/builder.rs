//! Builder wiring the suppressor to its default adapters.

use crate::application::{
    config::{BuildError, SuppressorConfig},
    ports::{Clock, SimilarityOracle},
    suppressor::DuplicateReplySuppressor,
};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::similarity::DamerauLevenshtein;

use std::sync::Arc;
use std::time::Duration;

/// Builder for constructing a `DuplicateReplySuppressor`.
///
/// Unset adapters default to `SystemClock` and `DamerauLevenshtein`.
///
/// # Example
/// ```
/// use reply_throttle::DuplicateReplySuppressor;
/// use std::time::Duration;
///
/// let suppressor = DuplicateReplySuppressor::builder()
///     .with_expiry(Duration::from_secs(60))
///     .with_similarity_threshold(0.75)
///     .with_max_entries(1_000)
///     .build()
///     .unwrap();
///
/// assert_eq!(suppressor.config().expiry, Duration::from_secs(60));
/// ```
#[derive(Debug, Default)]
pub struct SuppressorBuilder {
    config: SuppressorConfig,
    clock: Option<Arc<dyn Clock>>,
    oracle: Option<Arc<dyn SimilarityOracle>>,
}

impl SuppressorBuilder {
    /// Replace every tunable at once, e.g. with a section loaded from YAML.
    pub fn with_config(mut self, config: SuppressorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set how long a window lives before it is discarded.
    ///
    /// Must be a non-zero whole number of seconds. The value is validated when `build()` is called.
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.config.expiry = expiry;
        self
    }

    /// Set the near-duplicate threshold on normalized distance.
    ///
    /// The value is validated when `build()` is called.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Allow empty candidate replies to be suppressed.
    ///
    /// Default: `false`, empty replies are never suppressed.
    pub fn with_suppress_empty_replies(mut self, enabled: bool) -> Self {
        self.config.suppress_empty_replies = enabled;
        self
    }

    /// Remember allowed empty replies in the window.
    ///
    /// Default: `true`.
    pub fn with_record_empty_replies(mut self, enabled: bool) -> Self {
        self.config.record_empty_replies = enabled;
        self
    }

    /// Cap the number of entries per window, evicting the oldest first.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.config.max_entries = Some(max_entries);
        self
    }

    /// Let a window grow until it expires. This is the default.
    pub fn with_unlimited_entries(mut self) -> Self {
        self.config.max_entries = None;
        self
    }

    /// Set a custom clock (mainly for testing and replays).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set a custom similarity oracle.
    pub fn with_oracle(mut self, oracle: Arc<dyn SimilarityOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Build the suppressor.
    ///
    /// # Errors
    /// Returns `BuildError` if the configuration is invalid.
    pub fn build(self) -> Result<DuplicateReplySuppressor, BuildError> {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        let oracle = self.oracle.unwrap_or_else(|| Arc::new(DamerauLevenshtein));
        DuplicateReplySuppressor::new(self.config, clock, oracle)
    }
}

impl DuplicateReplySuppressor {
    /// Start building a suppressor.
    pub fn builder() -> SuppressorBuilder {
        SuppressorBuilder::default()
    }

    /// Suppressor with the default configuration and adapters.
    pub fn new_default() -> Self {
        Self::from_parts_unchecked(
            SuppressorConfig::default(),
            Arc::new(SystemClock::new()),
            Arc::new(DamerauLevenshtein),
        )
    }
}
