//! Reading history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A visited node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub node_id: String,
    pub pov: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(node_id: impl Into<String>, pov: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            pov: pov.into(),
            timestamp: Utc::now(),
        }
    }

    fn same_place(&self, node_id: &str, pov: &str) -> bool {
        self.node_id == node_id && self.pov == pov
    }
}

/// Stack of visited nodes, newest last.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationHistory {
    entries: Vec<HistoryEntry>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a visit. Returns false if it repeats the newest entry.
    pub fn record(&mut self, node_id: &str, pov: &str) -> bool {
        if self
            .entries
            .last()
            .is_some_and(|top| top.same_place(node_id, pov))
        {
            return false;
        }
        self.entries.push(HistoryEntry::new(node_id, pov));
        true
    }

    /// Drop the newest entry and return the one below it.
    ///
    /// Needs at least two entries; the first visit is never popped.
    pub fn step_back(&mut self) -> Option<HistoryEntry> {
        if !self.can_go_back() {
            return None;
        }
        self.entries.pop();
        self.entries.last().cloned()
    }

    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.last()
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

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
