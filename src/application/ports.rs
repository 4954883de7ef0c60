//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use std::fmt::Debug;
use std::time::Instant;

/// Port for obtaining current time.
///
/// This abstraction allows the suppressor to age its window without
/// depending on the system clock. Infrastructure provides concrete
/// implementations (SystemClock, ReplayClock, MockClock).
pub trait Clock: Send + Sync + Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// Port for fuzzy string comparison.
///
/// Implementations return a normalized distance in `[0, 1]`: `0.0` for
/// identical strings, growing with dissimilarity. Two queries are
/// near-duplicates when their distance is strictly below the configured
/// threshold.
pub trait SimilarityOracle: Send + Sync + Debug {
    /// Normalized distance between `a` and `b`.
    fn distance(&self, a: &str, b: &str) -> f64;

    /// Whether `a` and `b` are near-duplicates under `threshold`.
    fn is_similar(&self, a: &str, b: &str, threshold: f64) -> bool {
        self.distance(a, b) < threshold
    }
}
