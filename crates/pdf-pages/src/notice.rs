//! User-visible notices
//!
//! Every operation outcome the user should hear about (import rejected,
//! transform failed, pages moved to trash) is recorded here and mirrored
//! to the `log` facade.

use crate::constants::MAX_NOTICES;
use chrono::{DateTime, Local};
use log::Level;

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
}

/// Bounded log of notices, oldest first
#[derive(Debug, Clone)]
pub struct NoticeLog {
    entries: Vec<Notice>,
    max_entries: usize,
}

impl Default for NoticeLog {
    fn default() -> Self {
        Self::new(MAX_NOTICES)
    }
}

impl NoticeLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>) {
        let message = message.into();
        log::log!(level, "{}", message);

        self.entries.push(Notice {
            timestamp: Local::now(),
            level,
            message,
        });

        // Keep only the most recent entries
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(0..excess);
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Level::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Level::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Level::Error, message);
    }

    pub fn entries(&self) -> &[Notice] {
        &self.entries
    }

    pub fn latest_message(&self) -> Option<&str> {
        self.entries.last().map(|entry| entry.message.as_str())
    }

    /// Take all pending notices, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_bounded() {
        let mut notices = NoticeLog::new(2);
        notices.info("one");
        notices.warn("two");
        notices.error("three");

        let messages: Vec<_> = notices.entries().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, ["two", "three"]);
        assert_eq!(notices.latest_message(), Some("three"));
    }

    #[test]
    fn test_drain_empties_log() {
        let mut notices = NoticeLog::default();
        notices.info("imported");
        let drained = notices.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].level, Level::Info);
        assert!(notices.entries().is_empty());
    }
}
