//! Append-only activity log.

use crate::record::HistoryEntry;
use std::collections::VecDeque;

/// Chronological log of entries and exits.
///
/// Entries are only ever appended. When a retention bound is set, the oldest
/// entries are dropped once the bound is exceeded; otherwise the log grows
/// without limit.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    retention: Option<usize>,
}

impl HistoryLog {
    /// Creates an unbounded log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log that keeps at most `retention` entries.
    #[must_use]
    pub fn with_retention(retention: Option<usize>) -> Self {
        Self {
            entries: VecDeque::new(),
            retention,
        }
    }

    /// Appends an entry.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        if let Some(max) = self.retention {
            while self.entries.len() > max {
                self.entries.pop_front();
            }
        }
    }

    /// Returns the last `limit` entries, oldest first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    /// Returns the number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been logged (or everything was dropped).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over retained entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
