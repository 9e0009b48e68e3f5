//! Undo/redo history: bounded snapshot list.
//!
//! Each entry is a full [`Snapshot`] of text, cursor and marks. Entries are
//! recorded *before* a mutating command runs, so undoing restores the state
//! just prior to that command:
//!
//! ```text
//! history.begin(snapshot_before);
//! // run the command
//! history.commit(&text_after);   // kept only if the text changed
//! ```
//!
//! An Insert session is one transaction: `begin` on entering Insert,
//! `commit` on leaving it.
//!
//! # Layout
//!
//! `entries[..index]` are undoable states, oldest first. When the first
//! undo happens at the tail, the live state is appended once so that redo
//! can return to it. A push while not at the tail truncates everything
//! after `index` first (the redo branch is lost). The list holds at most
//! `capacity` undoable entries; the oldest is dropped on overflow.

use std::collections::VecDeque;

use tracing::debug;

use crate::mark::MarkTable;
use crate::options::DEFAULT_HISTORY_CAPACITY;

/// Everything undo restores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub text: String,
    pub cursor: usize,
    pub marks: MarkTable,
}

/// Bounded undo/redo list.
#[derive(Debug)]
pub struct History {
    entries: VecDeque<Snapshot>,
    index: usize,
    capacity: usize,
    pending: Option<Snapshot>,
}

impl History {
    /// Create an empty history holding up to `capacity` undo steps
    /// (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            index: 0,
            capacity: capacity.max(1),
            pending: None,
        }
    }

    /// Append a pre-edit snapshot, discarding any redo branch.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.index);
        self.entries.push_back(snapshot);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.index = self.entries.len();
        debug!(entries = self.entries.len(), "history push");
    }

    /// Start a transaction. If one is already open it is kept: the earliest
    /// snapshot wins, so nested begins collapse into one undo step.
    pub fn begin(&mut self, before: Snapshot) {
        if self.pending.is_none() {
            self.pending = Some(before);
        }
    }

    /// Close the open transaction. It becomes an undo step only if `text`
    /// differs from the snapshot taken at `begin`.
    pub fn commit(&mut self, text: &str) {
        if let Some(before) = self.pending.take() {
            if before.text != text {
                self.push(before);
            }
        }
    }

    /// True while a transaction is open.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Step back one entry. `live` is the current state, recorded so that
    /// a later redo can return to it. Returns the state to restore, or
    /// `None` at the oldest entry.
    pub fn undo(&mut self, live: Snapshot) -> Option<Snapshot> {
        if self.index == 0 {
            return None;
        }
        if self.index == self.entries.len() {
            self.entries.push_back(live);
        }
        self.index -= 1;
        debug!(index = self.index, "undo");
        self.entries.get(self.index).cloned()
    }

    /// Step forward one entry. Returns the state to restore, or `None` when
    /// there is nothing to redo.
    pub fn redo(&mut self) -> Option<Snapshot> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        debug!(index = self.index, "redo");
        self.entries.get(self.index).cloned()
    }

    /// True if [`undo`](Self::undo) would restore something.
    #[must_use]
    pub const fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// True if [`redo`](Self::redo) would restore something.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Number of undo steps available.
    #[must_use]
    pub const fn undo_count(&self) -> usize {
        self.index
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
