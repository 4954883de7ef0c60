//! Infrastructure layer - external adapters and integrations.
//!
//! This layer provides adapters for:
//! - Clock abstraction (system time, replay time, mock)
//! - Similarity oracles (edit distance, exact match)
//! - Builder wiring, YAML configuration files and subscriber setup
//! - Transcript replay

pub mod builder;
pub mod clock;
pub mod config_file;
pub mod logging;
pub mod replay;
pub mod similarity;

/// Mock implementations for testing.
///
/// This module is only available when the `test-helpers` feature is enabled,
/// or during test builds. It provides controllable test doubles for the
/// clock and similarity ports.
///
/// To use these mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// reply-throttle = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
