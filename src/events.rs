//! Per-game narrative log and bankruptcy records.
//!
//! A game buffers its narrative locally; the simulation runner hands the
//! finished buffer to the writer thread in one piece, so games never contend
//! on shared output.

use std::fmt;

use log::trace;
use serde::Serialize;

/// Buffered narrative of one game, one line per event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    lines: Vec<String>,
    disabled: bool,
}

impl EventLog {
    /// Empty, recording log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log that drops every line (for runs that keep only statistics).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            lines: Vec::new(),
            disabled: true,
        }
    }

    /// Append a line.
    pub fn add(&mut self, line: impl Into<String>) {
        if self.disabled {
            return;
        }
        let line = line.into();
        trace!("{line}");
        self.lines.push(line);
    }

    /// Recorded lines in order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of recorded lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether lines are being recorded.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// All lines joined, each terminated by a newline.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

/// One player going bankrupt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankruptcyRecord {
    /// Game number (1-based within the run).
    pub game: u64,
    /// Player name.
    pub player: String,
    /// Turn on which the bankruptcy happened.
    pub turn: u32,
}

impl fmt::Display for BankruptcyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.game, self.player, self.turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_records_lines() {
        let mut log = EventLog::new();
        log.add("first");
        log.add(format!("second {}", 2));
        assert_eq!(log.len(), 2);
        assert_eq!(log.lines()[1], "second 2");
        assert_eq!(log.to_text(), "first\nsecond 2\n");
    }

    #[test]
    fn test_disabled_log_drops_lines() {
        let mut log = EventLog::disabled();
        log.add("ignored");
        assert!(log.is_empty());
        assert!(!log.is_enabled());
        assert_eq!(log.to_text(), "");
    }

    #[test]
    fn test_bankruptcy_record_format() {
        let record = BankruptcyRecord {
            game: 12,
            player: "Chunk".to_string(),
            turn: 87,
        };
        assert_eq!(record.to_string(), "12\tChunk\t87");
    }
}
