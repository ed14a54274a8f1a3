//! Debounced hand-off of committed pages to the persistence collaborator.
//!
//! The core never merges concurrent writes: a conflict reported by the
//! sink becomes a notification and the local page stays authoritative.

use quire_model::Block;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Write conflict: {0}")]
    Conflict(String),

    #[error("Persistence backend error: {0}")]
    Backend(String),
}

/// Receives `(document id, root list, timestamp)` after edits settle
pub trait PersistenceSink {
    fn persist(&mut self, document_id: &str, roots: &[Block], timestamp: u64) -> Result<(), SyncError>;
}

/// Trailing-edge debounce over the logical clock
#[derive(Debug, Clone, Default)]
pub struct SyncScheduler {
    debounce: u64,
    due: Option<u64>,
}

impl SyncScheduler {
    pub fn new(debounce: u64) -> Self {
        Self { debounce, due: None }
    }

    /// A commit happened at `now`; push the deadline back
    pub fn schedule(&mut self, now: u64) {
        self.due = Some(now.saturating_add(self.debounce));
    }

    /// Consume the pending sync if its deadline has passed
    pub fn take_due(&mut self, now: u64) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    /// Consume the pending sync regardless of its deadline
    pub fn take_pending(&mut self) -> bool {
        self.due.take().is_some()
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }
}
