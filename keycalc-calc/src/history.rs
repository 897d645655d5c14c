//! In-memory calculation history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub expression: String,
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Entry stamped with the current time
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        HistoryEntry {
            expression: expression.into(),
            result: result.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Anything a calculator can record completed calculations into
pub trait HistorySink {
    fn add_to_history(&mut self, entry: HistoryEntry);
}

/// Ephemeral history list, most recent first
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_history(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HistorySink for History {
    fn add_to_history(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
    }
}
