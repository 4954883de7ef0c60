//! Per-message routing between the bot and the suppressor.
//!
//! The gate applies the static allow-lists: who may unlock, which group
//! conversations are checked for duplicates, and which users bypass the
//! check.

use crate::application::command::{Command, CommandParser};
use crate::application::suppressor::DuplicateReplySuppressor;
use crate::domain::decision::SuppressionDecision;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Where a message was posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageSource {
    /// One-to-one chat with the bot
    User { user_id: String },
    /// Group conversation
    Group { group_id: String, user_id: String },
}

impl MessageSource {
    /// Sender of the message.
    pub fn user_id(&self) -> &str {
        match self {
            MessageSource::User { user_id } | MessageSource::Group { user_id, .. } => user_id,
        }
    }

    /// Group the message was posted in, if any.
    pub fn group_id(&self) -> Option<&str> {
        match self {
            MessageSource::User { .. } => None,
            MessageSource::Group { group_id, .. } => Some(group_id),
        }
    }
}

/// A text message received from the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub source: MessageSource,
    pub text: String,
}

impl IncomingMessage {
    pub fn new(source: MessageSource, text: impl Into<String>) -> Self {
        Self {
            source,
            text: text.into(),
        }
    }
}

/// Static ID allow-lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPolicy {
    /// Users allowed to run administrative commands anywhere
    pub admins: BTreeSet<String>,
    /// Group whose members may all run administrative commands
    pub manage_group: Option<String>,
    /// Groups where duplicate replies are suppressed
    pub checked_groups: BTreeSet<String>,
    /// Users whose requests are never suppressed
    pub exempt_users: BTreeSet<String>,
}

impl AccessPolicy {
    /// Whether the sender may run administrative commands.
    pub fn is_admin(&self, source: &MessageSource) -> bool {
        self.admins.contains(source.user_id())
            || matches!(
                (source.group_id(), self.manage_group.as_deref()),
                (Some(group), Some(manage)) if group == manage
            )
    }

    /// Whether a reply to this message goes through the suppressor.
    ///
    /// Direct chats are never checked.
    pub fn requires_check(&self, source: &MessageSource) -> bool {
        match source.group_id() {
            Some(group) => {
                self.checked_groups.contains(group) && !self.exempt_users.contains(source.user_id())
            }
            None => false,
        }
    }
}

/// Result of an administrative command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    /// The suppression window was cleared
    Unlocked { cleared: usize },
}

/// What to do with a computed reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Send it
    Deliver,
    /// Withhold it, a near-duplicate was sent recently
    Suppressed,
    /// Allowed, but there is nothing to send
    Empty,
    /// The conversation is not checked; send it without consulting the suppressor
    Skipped,
}

impl Delivery {
    /// Whether the caller should send the reply.
    pub fn should_send(&self) -> bool {
        matches!(self, Delivery::Deliver | Delivery::Skipped)
    }
}

/// Front door for the message dispatcher.
///
/// # Example
/// ```
/// use reply_throttle::{
///     AccessPolicy, CommandParser, Delivery, DuplicateReplySuppressor, IncomingMessage,
///     MessageSource, ReplyGate,
/// };
/// use std::sync::Arc;
///
/// let policy = AccessPolicy {
///     checked_groups: ["g1".to_owned()].into(),
///     ..Default::default()
/// };
/// let gate = ReplyGate::new(
///     CommandParser::default(),
///     policy,
///     Arc::new(DuplicateReplySuppressor::new_default()),
/// );
///
/// let message = IncomingMessage::new(
///     MessageSource::Group { group_id: "g1".into(), user_id: "u1".into() },
///     "貓 群規",
/// );
/// assert_eq!(gate.gate_reply(&message, "群規", "Be nice"), Delivery::Deliver);
/// assert_eq!(gate.gate_reply(&message, "群規", "Be nice"), Delivery::Suppressed);
/// ```
#[derive(Debug, Clone)]
pub struct ReplyGate {
    parser: CommandParser,
    policy: AccessPolicy,
    suppressor: Arc<DuplicateReplySuppressor>,
}

impl ReplyGate {
    pub fn new(
        parser: CommandParser,
        policy: AccessPolicy,
        suppressor: Arc<DuplicateReplySuppressor>,
    ) -> Self {
        Self {
            parser,
            policy,
            suppressor,
        }
    }

    /// Parse a message into a command.
    pub fn command(&self, message: &IncomingMessage) -> Command {
        self.parser.parse(&message.text)
    }

    /// Run the administrative command carried by `message`, if the sender
    /// is allowed to.
    pub fn handle_admin(&self, message: &IncomingMessage) -> Option<AdminAction> {
        match self.command(message) {
            Command::Unlock if self.policy.is_admin(&message.source) => {
                let cleared = self.suppressor.force_unlock();
                info!(user_id = %message.source.user_id(), cleared, "Unlock requested");
                Some(AdminAction::Unlocked { cleared })
            }
            Command::Unlock => {
                debug!(user_id = %message.source.user_id(), "Ignoring unlock from non-admin");
                None
            }
            Command::Invoke { .. } | Command::Ignore => None,
        }
    }

    /// Decide what to do with `reply`, computed for `query` in response to
    /// `message`.
    pub fn gate_reply(&self, message: &IncomingMessage, query: &str, reply: &str) -> Delivery {
        if !self.policy.requires_check(&message.source) {
            return if reply.is_empty() {
                Delivery::Empty
            } else {
                Delivery::Skipped
            };
        }

        match self.suppressor.check(query, reply) {
            SuppressionDecision::Suppress => Delivery::Suppressed,
            SuppressionDecision::Allow if reply.is_empty() => Delivery::Empty,
            SuppressionDecision::Allow => Delivery::Deliver,
        }
    }

    /// Access policy in use.
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Command parser in use.
    pub fn parser(&self) -> &CommandParser {
        &self.parser
    }

    /// Shared suppressor.
    pub fn suppressor(&self) -> &Arc<DuplicateReplySuppressor> {
        &self.suppressor
    }
}
