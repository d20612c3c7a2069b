//! Linear snapshot history for undo/redo.
//!
//! The history is a flat list of [`DocumentSnapshot`]s with a cursor.
//! Index 0 always holds the pristine document captured at construction,
//! so the cursor is valid at all times. Committing while the cursor is
//! not at the tail discards every later entry (standard linear history,
//! no branching tree). Undo and redo at a boundary are silent no-ops.

use crate::snapshot::DocumentSnapshot;

/// Default cap on retained history entries.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// A single entry in the history list.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    /// Human-readable label describing the committed action.
    pub label: String,
    /// The document state after the action committed.
    pub snapshot: DocumentSnapshot,
    /// When this entry was created.
    pub timestamp: std::time::Instant,
}

/// Flat, linear undo/redo history with a cursor.
pub struct DocumentHistory {
    entries: Vec<HistoryEntry>,
    /// Index of the entry matching the current document state.
    current: usize,
    max_entries: usize,
}

impl DocumentHistory {
    /// Create a history seeded with the pristine document snapshot.
    pub fn new(initial: DocumentSnapshot) -> Self {
        Self::with_max_entries(initial, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_max_entries(initial: DocumentSnapshot, max_entries: usize) -> Self {
        Self {
            entries: vec![HistoryEntry {
                label: "New document".to_string(),
                snapshot: initial,
                timestamp: std::time::Instant::now(),
            }],
            current: 0,
            max_entries: max_entries.max(1),
        }
    }

    /// Record a committed edit. Entries after the cursor (the redo branch)
    /// are discarded first.
    pub fn commit(&mut self, label: &str, snapshot: DocumentSnapshot) {
        self.entries.truncate(self.current + 1);
        self.entries.push(HistoryEntry {
            label: label.to_string(),
            snapshot,
            timestamp: std::time::Instant::now(),
        });

        // Enforce the cap by evicting the oldest entries.
        while self.entries.len() > self.max_entries + 1 {
            self.entries.remove(0);
        }
        self.current = self.entries.len() - 1;

        tracing::debug!(label, undo_depth = self.undo_depth(), "History entry committed");
    }

    /// Step the cursor back and return the snapshot to restore, or `None`
    /// at the start of history.
    pub fn undo(&mut self) -> Option<&DocumentSnapshot> {
        if self.current == 0 {
            tracing::debug!("Undo at history start, ignoring");
            return None;
        }
        self.current -= 1;
        let entry = &self.entries[self.current];
        tracing::debug!(undo_depth = self.current, "Undo");
        Some(&entry.snapshot)
    }

    /// Step the cursor forward and return the snapshot to restore, or
    /// `None` at the end of history.
    pub fn redo(&mut self) -> Option<&DocumentSnapshot> {
        if self.current + 1 >= self.entries.len() {
            tracing::debug!("Redo at history end, ignoring");
            return None;
        }
        self.current += 1;
        let entry = &self.entries[self.current];
        tracing::debug!(redo_depth = self.redo_depth(), "Redo");
        Some(&entry.snapshot)
    }

    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.entries.len()
    }

    /// Number of edits that can currently be undone.
    pub fn undo_depth(&self) -> usize {
        self.current
    }

    /// Number of edits that can currently be redone.
    pub fn redo_depth(&self) -> usize {
        self.entries.len() - 1 - self.current
    }

    /// Label of the action that would be undone next.
    pub fn undo_label(&self) -> Option<&str> {
        if self.current == 0 {
            None
        } else {
            Some(self.entries[self.current].label.as_str())
        }
    }

    /// Label of the action that would be redone next.
    pub fn redo_label(&self) -> Option<&str> {
        self.entries.get(self.current + 1).map(|e| e.label.as_str())
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Lower the cap, trimming the oldest entries if needed. The cursor
    /// is adjusted so it keeps pointing at the same snapshot.
    pub fn set_max_entries(&mut self, max: usize) {
        self.max_entries = max.max(1);
        while self.entries.len() > self.max_entries + 1 {
            self.entries.remove(0);
            self.current = self.current.saturating_sub(1);
        }
    }
}
