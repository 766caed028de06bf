//! Append-only record of past decisions and their outcomes

use crate::protocol::StateSnapshot;

/// One past decision, as shown in the history panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub stage: String,
    pub option: String,
    pub outcome: String,
}

/// Ordered ledger of decisions taken this session
///
/// Entries are appended from the tail of each decision snapshot and never
/// mutated afterwards. The ledger is cleared exactly once, when a new
/// session starts.
#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    entries: Vec<HistoryEntry>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the newest record from a decision snapshot
    ///
    /// A snapshot with an empty history contributes nothing.
    pub fn record_latest(&mut self, state: &StateSnapshot) {
        if let Some(last) = state.history.last() {
            self.entries.push(HistoryEntry {
                stage: last.stage.clone(),
                option: last.option.clone(),
                outcome: last.outcome.clone(),
            });
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in display order, most recent first
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// Entries in the order they were recorded
    pub fn oldest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
