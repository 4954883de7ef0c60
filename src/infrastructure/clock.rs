//! Clock adapters for time operations.
//!
//! `SystemClock` is what a running bot uses. `ReplayClock` follows the
//! timestamps of a recorded transcript so a replay ages windows the same way
//! the live conversation did.
//!
//! # Testing
//!
//! See `MockClock` (in `crate::infrastructure::mocks`) for a controllable test clock.
//! Available with the `test-helpers` feature or in test builds.

use crate::application::ports::Clock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// System clock implementation using `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock positioned at an offset, in milliseconds, from a fixed origin.
///
/// The offset never moves backwards: seeking to an earlier point keeps the
/// current time. Offsets are capped at `ReplayClock::MAX_OFFSET`.
#[derive(Debug)]
pub struct ReplayClock {
    origin: Instant,
    offset_millis: AtomicU64,
}

impl ReplayClock {
    /// Largest offset the clock can be moved to: 100 years.
    pub const MAX_OFFSET: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

    /// Create a replay clock at offset zero.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_millis: AtomicU64::new(0),
        }
    }

    /// Move the clock to `offset` after the origin, clamped to `MAX_OFFSET`.
    pub fn seek(&self, offset: Duration) {
        let offset = offset.min(Self::MAX_OFFSET);
        let millis = u64::try_from(offset.as_millis()).unwrap_or(u64::MAX);
        self.offset_millis.fetch_max(millis, Ordering::AcqRel);
    }

    /// Current offset from the origin.
    pub fn offset(&self) -> Duration {
        Duration::from_millis(self.offset_millis.load(Ordering::Acquire))
    }
}

impl Default for ReplayClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ReplayClock {
    fn now(&self) -> Instant {
        self.origin + self.offset()
    }
}
