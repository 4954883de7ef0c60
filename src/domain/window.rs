//! The time bucket of remembered replies.
//!
//! A window never expires entry by entry. Once its age exceeds the configured
//! expiry it is thrown away as a whole and a new, empty window starts at the
//! current instant.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::domain::entry::ReplyEntry;

/// Lifecycle state of a window relative to a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Age is at most the expiry; entries are still authoritative
    Fresh,
    /// Age exceeds the expiry; the window must be replaced before use
    Expired,
}

/// Result of recording a pair in the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// The pair was added
    Inserted,
    /// The exact pair was already remembered; nothing changed
    AlreadyPresent,
    /// The pair was added after dropping the oldest entry
    Evicted(ReplyEntry),
}

/// Remembered `(query, reply)` pairs that share one creation instant.
///
/// # Example
/// ```
/// use reply_throttle::{ReplyEntry, SuppressionWindow, WindowState};
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let expiry = Duration::from_secs(60);
/// let mut window = SuppressionWindow::new(start);
/// window.insert(ReplyEntry::new("foo", "bar"), None);
///
/// assert_eq!(window.state(start + Duration::from_secs(60), expiry), WindowState::Fresh);
/// assert_eq!(window.state(start + Duration::from_secs(61), expiry), WindowState::Expired);
///
/// // Refreshing an expired window drops every entry at once.
/// assert!(window.refresh(start + Duration::from_secs(61), expiry));
/// assert!(window.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SuppressionWindow {
    created_at: Instant,
    entries: VecDeque<ReplyEntry>,
}

impl SuppressionWindow {
    /// Create an empty window starting at `created_at`.
    pub fn new(created_at: Instant) -> Self {
        Self {
            created_at,
            entries: VecDeque::new(),
        }
    }

    /// Instant the window was created.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Time elapsed since creation. Zero if `now` is earlier than creation.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    /// Fresh/Expired state at `now`.
    pub fn state(&self, now: Instant, expiry: Duration) -> WindowState {
        if self.age(now) > expiry {
            WindowState::Expired
        } else {
            WindowState::Fresh
        }
    }

    /// Replace the window with an empty one if it has expired at `now`.
    ///
    /// Returns `true` if a reset happened.
    pub fn refresh(&mut self, now: Instant, expiry: Duration) -> bool {
        match self.state(now, expiry) {
            WindowState::Fresh => false,
            WindowState::Expired => {
                *self = Self::new(now);
                true
            }
        }
    }

    /// First remembered entry accepted by `predicate`.
    pub fn find_match<F>(&self, mut predicate: F) -> Option<&ReplyEntry>
    where
        F: FnMut(&ReplyEntry) -> bool,
    {
        self.entries.iter().find(|entry| predicate(entry))
    }

    /// Record an entry.
    ///
    /// Entries form a set: recording a pair that is already present is a
    /// no-op. With `max_entries` set, a full window drops its oldest entry
    /// to make room.
    pub fn insert(&mut self, entry: ReplyEntry, max_entries: Option<usize>) -> Insertion {
        if self.contains(&entry.query, &entry.reply) {
            return Insertion::AlreadyPresent;
        }

        let evicted = match max_entries {
            Some(max) if self.entries.len() >= max => self.entries.pop_front(),
            _ => None,
        };
        self.entries.push_back(entry);

        match evicted {
            Some(old) => Insertion::Evicted(old),
            None => Insertion::Inserted,
        }
    }

    /// Whether the exact pair is remembered.
    pub fn contains(&self, query: &str, reply: &str) -> bool {
        self.entries.iter().any(|e| e.is_pair(query, reply))
    }

    /// Drop every entry, keeping the creation instant.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// Number of remembered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ReplyEntry> {
        self.entries.iter()
    }
}
