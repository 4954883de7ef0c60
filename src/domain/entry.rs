//! A reply the bot has already sent.

use std::fmt;

/// One remembered `(query, reply)` pair.
///
/// The query is the normalized text the user sent after the bot keyword;
/// the reply is exactly what the bot answered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReplyEntry {
    /// Normalized query text
    pub query: String,
    /// Reply text as delivered
    pub reply: String,
}

impl ReplyEntry {
    /// Create a new entry.
    pub fn new(query: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            reply: reply.into(),
        }
    }

    /// Whether this entry was recorded for an empty reply.
    pub fn has_empty_reply(&self) -> bool {
        self.reply.is_empty()
    }

    /// Check whether this entry is the exact pair `(query, reply)`.
    pub fn is_pair(&self, query: &str, reply: &str) -> bool {
        self.query == query && self.reply == reply
    }
}

impl fmt::Display for ReplyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} -> {:?}", self.query, self.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pair() {
        let entry = ReplyEntry::new("光炮 1", "10分鐘");
        assert!(entry.is_pair("光炮 1", "10分鐘"));
        assert!(!entry.is_pair("光炮1", "10分鐘"));
        assert!(!entry.is_pair("光炮 1", "11分鐘"));
    }

    #[test]
    fn test_empty_reply() {
        assert!(ReplyEntry::new("foo", "").has_empty_reply());
        assert!(!ReplyEntry::new("", "bar").has_empty_reply());
    }

    #[test]
    fn test_display() {
        let entry = ReplyEntry::new("foo", "bar");
        assert_eq!(entry.to_string(), r#""foo" -> "bar""#);
    }
}
