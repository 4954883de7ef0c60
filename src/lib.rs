//! # reply-throttle
//!
//! Duplicate-reply suppression for chat bots.
//!
//! A bot that answers lookups in group chats tends to flood the conversation
//! when several people ask the same thing. This crate decides, for an
//! already-computed reply, whether it should be withheld because the same
//! reply to a near-identical query was sent recently.
//!
//! ## Quick Start
//!
//! ```rust
//! use reply_throttle::DuplicateReplySuppressor;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! // Build once, share with every request handler
//! let suppressor = Arc::new(
//!     DuplicateReplySuppressor::builder()
//!         .with_expiry(Duration::from_secs(3600))
//!         .with_similarity_threshold(0.5)
//!         .build()
//!         .unwrap(),
//! );
//!
//! let query = "光炮 1";
//! let reply = "10分鐘";
//! if !suppressor.should_suppress(query, reply) {
//!     // send the reply
//! }
//! ```
//!
//! ## How It Works
//!
//! The suppressor keeps one **window**: the set of `(query, reply)` pairs
//! sent since the window was created. A candidate reply is withheld when
//! some remembered pair has exactly the same reply and a query whose
//! normalized edit distance to the new query is below the threshold.
//! Otherwise the pair is remembered and the reply goes out.
//!
//! Windows expire wholesale: the first check after `expiry` has elapsed
//! discards every remembered pair and starts over. There is no per-entry
//! TTL.
//!
//! ```rust
//! use reply_throttle::{DamerauLevenshtein, SimilarityOracle};
//!
//! // "光炮 1" and "光炮1" are one edit apart out of four characters
//! assert!(DamerauLevenshtein.is_similar("光炮 1", "光炮1", 0.5));
//! assert!(!DamerauLevenshtein.is_similar("光炮 1", "光炮1", 0.1));
//! ```
//!
//! ## Empty Replies
//!
//! An empty reply means the bot had nothing to say. By default it is never
//! suppressed but is still remembered. Both behaviours are configurable
//! through `with_suppress_empty_replies` and `with_record_empty_replies`.
//!
//! ## Reply Gate
//!
//! [`ReplyGate`] sits in front of the suppressor for a message dispatcher.
//! It parses commands, lets admins clear the window with the unlock command
//! and only consults the suppressor for checked group conversations.
//!
//! ```rust
//! use reply_throttle::{BotConfig, DamerauLevenshtein, Delivery, IncomingMessage, MessageSource, SystemClock};
//! use std::sync::Arc;
//!
//! let config = BotConfig::from_yaml_str("gate:\n  admins: [boss]\n  checked_groups: [lobby]\n").unwrap();
//! let gate = config
//!     .build_gate(Arc::new(SystemClock::new()), Arc::new(DamerauLevenshtein))
//!     .unwrap();
//!
//! let ask = IncomingMessage::new(
//!     MessageSource::Group { group_id: "lobby".into(), user_id: "u1".into() },
//!     "貓 光炮 1",
//! );
//! assert_eq!(gate.gate_reply(&ask, "光炮 1", "10分鐘"), Delivery::Deliver);
//! assert_eq!(gate.gate_reply(&ask, "光炮 1", "10分鐘"), Delivery::Suppressed);
//!
//! let unlock = IncomingMessage::new(MessageSource::User { user_id: "boss".into() }, "解鎖");
//! assert!(gate.handle_admin(&unlock).is_some());
//! assert_eq!(gate.gate_reply(&ask, "光炮 1", "10分鐘"), Delivery::Deliver);
//! ```
//!
//! ## Fail-Safe Operation
//!
//! Checks never fail. If the similarity oracle panics, the reply is allowed,
//! nothing is remembered, and `oracle_failures` is incremented in the
//! metrics.
//!
//! ## Observability
//!
//! ```rust
//! # use reply_throttle::DuplicateReplySuppressor;
//! # let suppressor = DuplicateReplySuppressor::new_default();
//! let snapshot = suppressor.metrics().snapshot();
//! println!("Suppression rate: {:.2}%", snapshot.suppression_rate() * 100.0);
//! ```
//!
//! Decisions are logged with `tracing` at `debug`, window resets and unlocks
//! at `info`, oracle failures at `warn`.

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    decision::SuppressionDecision,
    entry::ReplyEntry,
    window::{Insertion, SuppressionWindow, WindowState},
};

pub use application::{
    command::{Command, CommandParser},
    config::{BuildError, SuppressorConfig},
    gate::{AccessPolicy, AdminAction, Delivery, IncomingMessage, MessageSource, ReplyGate},
    metrics::{Metrics, MetricsSnapshot},
    ports::{Clock, SimilarityOracle},
    suppressor::DuplicateReplySuppressor,
};

pub use infrastructure::{
    builder::SuppressorBuilder,
    clock::{ReplayClock, SystemClock},
    config_file::{BotConfig, ConfigError, GateConfig},
    logging::init_tracing,
    replay::{read_transcript, ReplayOutcome, Replayer, TranscriptError, TranscriptLine},
    similarity::{DamerauLevenshtein, ExactMatch},
};
