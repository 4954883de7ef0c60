//! Parsing of incoming message text into bot commands.

use serde::{Deserialize, Serialize};

/// Default word that addresses the bot.
pub const DEFAULT_KEYWORD: &str = "貓";

/// Default administrative command that clears remembered replies.
pub const DEFAULT_UNLOCK_COMMAND: &str = "解鎖";

/// What a message asks the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Clear the suppression window (admins only)
    Unlock,
    /// A query addressed to the bot, keyword stripped and whitespace normalized
    Invoke { query: String },
    /// Anything else
    Ignore,
}

/// Splits message text on whitespace to recognize commands.
///
/// # Example
/// ```
/// use reply_throttle::{Command, CommandParser};
///
/// let parser = CommandParser::default();
/// assert_eq!(parser.parse("解鎖"), Command::Unlock);
/// assert_eq!(
///     parser.parse("貓   光炮  21"),
///     Command::Invoke { query: "光炮 21".to_owned() }
/// );
/// assert_eq!(
///     parser.parse("貓 計算經驗\n光炮 1 0 21\n\n守衛  3 20 21"),
///     Command::Invoke { query: "計算經驗\n光炮 1 0 21\n守衛 3 20 21".to_owned() }
/// );
/// assert_eq!(parser.parse("貓貓 光炮"), Command::Ignore);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandParser {
    /// First token that addresses the bot
    pub keyword: String,
    /// Exact text of the unlock command
    pub unlock_command: String,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self {
            keyword: DEFAULT_KEYWORD.to_owned(),
            unlock_command: DEFAULT_UNLOCK_COMMAND.to_owned(),
        }
    }
}

impl CommandParser {
    /// Create a parser with a custom keyword and unlock command.
    pub fn new(keyword: impl Into<String>, unlock_command: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            unlock_command: unlock_command.into(),
        }
    }

    /// Classify `text`.
    pub fn parse(&self, text: &str) -> Command {
        let text = text.trim();
        if text == self.unlock_command {
            return Command::Unlock;
        }

        let mut lines = text.lines();
        let Some(first_line) = lines.next() else {
            return Command::Ignore;
        };
        let mut first_tokens = first_line.split_whitespace();
        if first_tokens.next() != Some(self.keyword.as_str()) {
            return Command::Ignore;
        }

        let head = first_tokens.collect::<Vec<_>>().join(" ");
        let rest = lines.map(normalize_line).filter(|line| !line.is_empty());
        let query = std::iter::once(head)
            .filter(|line| !line.is_empty())
            .chain(rest)
            .collect::<Vec<_>>()
            .join("\n");

        Command::Invoke { query }
    }
}

fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}
