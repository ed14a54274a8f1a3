//! # Undo/Redo History
//!
//! Snapshot history of a page, driven by a logical clock.
//!
//! ## Design
//!
//! - Each entry is an immutable snapshot of the whole page
//! - `commit` always opens a new undo step (structural edits)
//! - `commit_merged` joins the previous merged commit while the gap between
//!   them stays inside the merge window (continuous typing)
//! - Undo/redo move the present between the past and future stacks
//! - New commits clear the future
//! - The oldest past entry is evicted once `max_entries` is exceeded
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new(page.clone(), &HistoryConfig::default());
//!
//! history.commit_merged(typed_a, 0, "update_content");
//! history.commit_merged(typed_ab, 120, "update_content"); // same step
//! history.commit(split, 200, "split");                     // new step
//!
//! history.undo(); // back to typed_ab
//! history.undo(); // back to page
//! ```

use crate::config::HistoryConfig;
use quire_model::Page;

/// Monotonic millisecond counter advanced explicitly by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalClock {
    now: u64,
}

impl LogicalClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn advance(&mut self, elapsed_ms: u64) -> u64 {
        self.now = self.now.saturating_add(elapsed_ms);
        self.now
    }
}

/// Snapshot of the page after an edit
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub page: Page,

    /// Logical time of the commit
    pub at: u64,

    /// Name of the edit that produced this snapshot
    pub label: Option<&'static str>,
}

#[derive(Debug)]
pub struct History {
    /// Older snapshots (most recent last)
    past: Vec<HistoryEntry>,

    present: HistoryEntry,

    /// Undone snapshots (most recent last)
    future: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_entries: usize,

    merge_window: u64,

    /// Time of the last merged commit while its step is still open
    merging_since: Option<u64>,
}

impl History {
    pub fn new(page: Page, config: &HistoryConfig) -> Self {
        Self::with_limits(page, config.max_entries, config.merge_window_ms)
    }

    pub fn with_limits(page: Page, max_entries: usize, merge_window: u64) -> Self {
        Self {
            past: Vec::new(),
            present: HistoryEntry {
                page,
                at: 0,
                label: None,
            },
            future: Vec::new(),
            max_entries,
            merge_window,
            merging_since: None,
        }
    }

    pub fn present(&self) -> &Page {
        &self.present.page
    }

    /// Record a structural edit as its own undo step
    pub fn commit(&mut self, page: Page, at: u64, label: &'static str) {
        self.push(HistoryEntry {
            page,
            at,
            label: Some(label),
        });
        self.merging_since = None;
    }

    /// Record a typing edit, folding it into the open step when it lands
    /// inside the merge window of the previous one
    pub fn commit_merged(&mut self, page: Page, at: u64, label: &'static str) {
        let entry = HistoryEntry {
            page,
            at,
            label: Some(label),
        };

        match self.merging_since {
            Some(last) if at.saturating_sub(last) <= self.merge_window => {
                self.present = entry;
                self.future.clear();
            }
            _ => self.push(entry),
        }
        self.merging_since = Some(at);
    }

    fn push(&mut self, entry: HistoryEntry) {
        let previous = std::mem::replace(&mut self.present, entry);
        self.past.push(previous);

        // Trim if exceeded max levels
        if self.max_entries > 0 && self.past.len() > self.max_entries {
            let overflow = self.past.len() - self.max_entries;
            self.past.drain(0..overflow);
        }

        // New edit invalidates the future
        self.future.clear();
    }

    /// Step back; `None` when there is nothing to undo
    pub fn undo(&mut self) -> Option<&Page> {
        let entry = self.past.pop()?;
        let current = std::mem::replace(&mut self.present, entry);
        self.future.push(current);
        self.merging_since = None;
        Some(&self.present.page)
    }

    /// Step forward; `None` when there is nothing to redo
    pub fn redo(&mut self) -> Option<&Page> {
        let entry = self.future.pop()?;
        let current = std::mem::replace(&mut self.present, entry);
        self.past.push(current);
        self.merging_since = None;
        Some(&self.present.page)
    }

    /// Drop all history and start over from `page` (document switch)
    pub fn reset(&mut self, page: Page, at: u64) {
        self.past.clear();
        self.future.clear();
        self.present = HistoryEntry {
            page,
            at,
            label: None,
        };
        self.merging_since = None;
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    /// Name of the edit the next undo reverts
    pub fn undo_label(&self) -> Option<&'static str> {
        if self.past.is_empty() {
            return None;
        }
        self.present.label
    }

    /// Name of the edit the next redo reapplies
    pub fn redo_label(&self) -> Option<&'static str> {
        self.future.last().and_then(|entry| entry.label)
    }
}
