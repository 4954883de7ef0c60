//! Domain layer - pure suppression logic with no external dependencies.
//!
//! This layer contains the core concepts of duplicate-reply suppression:
//! - Remembered `(query, reply)` pairs
//! - The time window that holds them and its Fresh/Expired lifecycle
//! - The allow/suppress decision
//!
//! All types in this layer take time as an argument and are easily testable.

pub mod decision;
pub mod entry;
pub mod window;
