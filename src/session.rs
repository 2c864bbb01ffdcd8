use chrono::{DateTime, Local};

/// A single completed work phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionRecord {
    pub completed_at: DateTime<Local>,
}

impl SessionRecord {
    pub fn new(completed_at: DateTime<Local>) -> Self {
        Self { completed_at }
    }
}

/// Append-only log of completed work phases, in completion order.
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    records: Vec<SessionRecord>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    // Only the timer engine appends; everything else gets a read-only view.
    pub(crate) fn push(&mut self, record: SessionRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&SessionRecord> {
        self.records.last()
    }

    /// Most recent completions first, at most `n` of them.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &SessionRecord> {
        self.records.iter().rev().take(n)
    }
}
