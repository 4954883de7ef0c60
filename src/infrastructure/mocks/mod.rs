//! Mock implementations for testing.
//!
//! This module provides test doubles for the clock and similarity ports,
//! enabling deterministic testing of window expiry and fail-open behavior.

pub mod clock;
pub mod oracle;

pub use clock::MockClock;
pub use oracle::{FixedOracle, PanickingOracle};
