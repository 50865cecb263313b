//! Linear undo/redo log of full scene snapshots.
//!
//! Entry 0 is the baseline the session started from; each committed edit
//! appends one entry after the cursor. Recording after an undo discards the
//! entries beyond the cursor (no redo tree).

use serde::{Deserialize, Serialize};

use crate::{Background, Element, Scene};

/// Maximum number of undoable edits retained.
pub const HISTORY_LIMIT: usize = 20;

/// An immutable deep copy of the persisted part of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Every element, in insertion order.
    pub elements: Vec<Element>,
    /// The background layer.
    pub background: Background,
}

impl Snapshot {
    /// Capture a scene.
    #[must_use]
    pub fn capture(scene: &Scene) -> Self {
        Self {
            elements: scene.elements_snapshot(),
            background: scene.background.clone(),
        }
    }

    /// Write this snapshot back into a scene.
    pub fn restore_into(&self, scene: &mut Scene) {
        scene.restore(self.elements.clone(), self.background.clone());
    }
}

/// Append-only, truncating snapshot log with a cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// Start a history at `baseline` with the default limit.
    #[must_use]
    pub fn new(baseline: Snapshot) -> Self {
        Self::with_limit(baseline, HISTORY_LIMIT)
    }

    /// Start a history retaining at most `limit` undoable edits.
    #[must_use]
    pub fn with_limit(baseline: Snapshot, limit: usize) -> Self {
        Self {
            entries: vec![baseline],
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Record the state after a committed edit.
    ///
    /// Entries beyond the cursor are discarded first; the oldest entry is
    /// evicted once more than `limit` edits are retained.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        if self.entries.len() > self.limit + 1 {
            let excess = self.entries.len() - (self.limit + 1);
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;
        tracing::debug!(
            cursor = self.cursor,
            entries = self.entries.len(),
            "history entry recorded"
        );
    }

    /// Step back one entry and return it, or `None` at the beginning.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward one entry and return it, or `None` at the end.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    /// Whether [`History::undo`] would move.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether [`History::redo`] would move.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The snapshot at the cursor.
    #[must_use]
    pub fn current(&self) -> &Snapshot {
        // entries is never empty: it starts with a baseline and eviction keeps limit + 1
        &self.entries[self.cursor]
    }

    /// Cursor position (0 = baseline).
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of retained entries, including the baseline.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a history holds at least its baseline.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry and start again from `baseline`.
    pub fn reset(&mut self, baseline: Snapshot) {
        self.entries.clear();
        self.entries.push(baseline);
        self.cursor = 0;
        tracing::info!("history reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(tag: &str) -> Snapshot {
        Snapshot {
            elements: Vec::new(),
            background: Background::color(tag),
        }
    }

    #[test]
    fn test_undo_redo_walks_entries() {
        let mut history = History::new(snap("#000"));
        history.record(snap("#111"));
        history.record(snap("#222"));

        assert_eq!(history.undo().map(|s| s.background.value.clone()), Some("#111".into()));
        assert_eq!(history.undo().map(|s| s.background.value.clone()), Some("#000".into()));
        assert!(history.undo().is_none());
        assert_eq!(history.redo().map(|s| s.background.value.clone()), Some("#111".into()));
    }

    #[test]
    fn test_record_after_undo_discards_redo() {
        let mut history = History::new(snap("#000"));
        history.record(snap("#111"));
        history.record(snap("#222"));
        history.undo();
        history.record(snap("#333"));

        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(history.current().background.value, "#333");
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut history = History::with_limit(snap("base"), 3);
        for i in 0..5 {
            history.record(snap(&format!("#{i}")));
        }
        assert_eq!(history.len(), 4);
        let mut undone = 0;
        while history.undo().is_some() {
            undone += 1;
        }
        assert_eq!(undone, 3);
        assert_eq!(history.current().background.value, "#1");
    }
}
