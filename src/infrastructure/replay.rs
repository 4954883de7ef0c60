//! Replaying recorded conversations through a gate.
//!
//! A transcript is JSON lines, one message per line:
//!
//! ```text
//! {"at_secs": 0, "source": {"type": "group", "group_id": "g", "user_id": "u"}, "text": "貓 光炮 1", "reply": "10分鐘"}
//! {"at_secs": 5, "source": {"type": "user", "user_id": "admin"}, "text": "解鎖"}
//! ```
//!
//! `at_secs` is the offset from the start of the recording. `reply` is what
//! the bot computed for the message and may be left out when there was
//! none.

use crate::application::command::Command;
use crate::application::gate::{AdminAction, Delivery, IncomingMessage, MessageSource, ReplyGate};
use crate::infrastructure::clock::ReplayClock;

use serde::Deserialize;
use std::fmt;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// One recorded message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptLine {
    pub at_secs: f64,
    pub source: MessageSource,
    pub text: String,
    #[serde(default)]
    pub reply: Option<String>,
}

impl TranscriptLine {
    /// `at_secs` as an offset a `ReplayClock` can reach.
    ///
    /// `None` for negative, non-finite or out-of-range timestamps.
    pub fn offset(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.at_secs)
            .ok()
            .filter(|offset| *offset <= ReplayClock::MAX_OFFSET)
    }
}

/// Error reading a transcript.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("reading transcript line {line}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed transcript line {line}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("transcript line {line} has an invalid timestamp: {at_secs}")]
    InvalidTimestamp { line: usize, at_secs: f64 },
}

/// What happened to one transcript line.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayOutcome {
    /// An admin cleared the window
    Unlocked { cleared: usize },
    /// Unlock command from someone who is not an admin
    UnlockDenied,
    /// A reply went through the gate
    Reply { query: String, delivery: Delivery },
    /// The bot was addressed but the transcript recorded no reply
    NoReply { query: String },
    /// Not addressed to the bot
    Ignored,
}

impl fmt::Display for ReplayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayOutcome::Unlocked { cleared } => write!(f, "unlocked ({cleared} cleared)"),
            ReplayOutcome::UnlockDenied => write!(f, "unlock denied"),
            ReplayOutcome::Reply { query, delivery } => {
                let label = match delivery {
                    Delivery::Deliver => "deliver",
                    Delivery::Suppressed => "suppressed",
                    Delivery::Empty => "empty",
                    Delivery::Skipped => "unchecked",
                };
                write!(f, "{label} {query:?}")
            }
            ReplayOutcome::NoReply { query } => write!(f, "no reply {query:?}"),
            ReplayOutcome::Ignored => write!(f, "ignored"),
        }
    }
}

/// Parse every non-blank line of a transcript.
///
/// # Errors
/// Stops at the first unreadable or malformed line, or the first timestamp
/// a `ReplayClock` cannot reach, reporting its 1-based line number.
pub fn read_transcript(reader: impl BufRead) -> Result<Vec<TranscriptLine>, TranscriptError> {
    let mut lines = Vec::new();
    for (index, raw) in reader.lines().enumerate() {
        let line = index + 1;
        let raw = raw.map_err(|source| TranscriptError::Io { line, source })?;
        if raw.trim().is_empty() {
            continue;
        }
        let parsed: TranscriptLine = serde_json::from_str(&raw)
            .map_err(|source| TranscriptError::Malformed { line, source })?;
        if parsed.offset().is_none() {
            return Err(TranscriptError::InvalidTimestamp {
                line,
                at_secs: parsed.at_secs,
            });
        }
        lines.push(parsed);
    }
    Ok(lines)
}

/// Drives a gate with a `ReplayClock` following the transcript timestamps.
#[derive(Debug)]
pub struct Replayer {
    gate: ReplyGate,
    clock: Arc<ReplayClock>,
}

impl Replayer {
    /// The gate's suppressor must have been built on `clock`.
    pub fn new(gate: ReplyGate, clock: Arc<ReplayClock>) -> Self {
        Self { gate, clock }
    }

    /// Feed one message.
    ///
    /// A line with an unusable timestamp is replayed without moving the
    /// clock.
    pub fn step(&self, line: &TranscriptLine) -> ReplayOutcome {
        if let Some(offset) = line.offset() {
            self.clock.seek(offset);
        }
        let message = IncomingMessage::new(line.source.clone(), line.text.clone());

        if let Some(AdminAction::Unlocked { cleared }) = self.gate.handle_admin(&message) {
            return ReplayOutcome::Unlocked { cleared };
        }

        match self.gate.command(&message) {
            Command::Unlock => ReplayOutcome::UnlockDenied,
            Command::Invoke { query } => match &line.reply {
                Some(reply) => {
                    let delivery = self.gate.gate_reply(&message, &query, reply);
                    ReplayOutcome::Reply { query, delivery }
                }
                None => ReplayOutcome::NoReply { query },
            },
            Command::Ignore => ReplayOutcome::Ignored,
        }
    }

    pub fn gate(&self) -> &ReplyGate {
        &self.gate
    }
}
