use std::collections::VecDeque;

use crate::model::{GlobalStyles, StoreSection};

/// Maximum number of undo entries retained.
pub const MAX_HISTORY: usize = 50;

/// Immutable copy of the undoable part of the design.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryState {
    pub sections: Vec<StoreSection>,
    pub global_styles: GlobalStyles,
    pub theme_preset: String,
}

// ---------------------------------------------------------------------------
// HistoryStack: bounded linear undo/redo
// ---------------------------------------------------------------------------

/// Linear undo/redo buffer.
///
/// Every state change of the builder, including the restoration performed by
/// undo and redo, is reported through [`HistoryStack::push`]. Undo and redo
/// arm a one-shot skip flag so that their own restoration is not recorded as
/// a new action.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<HistoryState>,
    index: usize,
    skip_next: bool,
    capacity: usize,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            index: 0,
            skip_next: false,
            capacity: capacity.max(1),
        }
    }

    /// Record `state` as the newest entry, discarding any redo tail.
    pub fn push(&mut self, state: HistoryState) {
        if self.skip_next {
            self.skip_next = false;
            tracing::trace!("history push skipped after undo/redo");
            return;
        }

        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push_back(state);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.index = self.entries.len() - 1;
    }

    /// Step back one entry. Returns the state to restore, or `None` at the
    /// oldest entry.
    pub fn undo(&mut self) -> Option<HistoryState> {
        if !self.can_undo() {
            return None;
        }
        self.skip_next = true;
        self.index -= 1;
        self.entries.get(self.index).cloned()
    }

    /// Step forward one entry. Returns the state to restore, or `None` at the
    /// newest entry.
    pub fn redo(&mut self) -> Option<HistoryState> {
        if !self.can_redo() {
            return None;
        }
        self.skip_next = true;
        self.index += 1;
        self.entries.get(self.index).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// The entry matching the live state.
    pub fn current(&self) -> Option<&HistoryState> {
        self.entries.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new()
    }
}
