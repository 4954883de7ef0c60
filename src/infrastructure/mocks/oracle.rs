//! Similarity oracles with scripted behavior.

use crate::application::ports::SimilarityOracle;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Oracle that panics on every comparison.
///
/// Used to verify that the suppressor fails open.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanickingOracle;

impl SimilarityOracle for PanickingOracle {
    fn distance(&self, a: &str, b: &str) -> f64 {
        panic!("PanickingOracle asked to compare {a:?} with {b:?}");
    }
}

/// Oracle returning a fixed distance and counting its calls.
///
/// Clones share the call counter.
#[derive(Debug, Clone)]
pub struct FixedOracle {
    distance: f64,
    calls: Arc<AtomicUsize>,
}

impl FixedOracle {
    /// Create an oracle that always answers `distance`.
    pub fn new(distance: f64) -> Self {
        Self {
            distance,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of comparisons made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl SimilarityOracle for FixedOracle {
    fn distance(&self, _a: &str, _b: &str) -> f64 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.distance
    }
}
