//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain logic and manages the runtime behavior:
//! - Duplicate-reply suppressor (decision making over the shared window)
//! - Command parsing and the reply gate (allow-lists, unlock routing)
//! - Configuration validation and metrics
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod command;
pub mod config;
pub mod gate;
pub mod metrics;
pub mod ports;
pub mod suppressor;
