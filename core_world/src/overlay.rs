use std::collections::HashMap;

use bevy::prelude::Resource;

use crate::coords::CellId;

/// A player-caused deviation from baseline content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEntry {
    /// The cell now holds a token of this value (placed or merged).
    Token(u64),
    /// A previously-present cache was picked up; the cell must not
    /// regenerate from baseline.
    Empty,
}

/// Sparse, process-lifetime record of every cell the player has changed.
///
/// Absence of a key means "defer to baseline". Entries are created and
/// updated but never removed: an emptied cell stays `Empty` so that leaving
/// and re-entering the viewport cannot resurrect its cache.
#[derive(Resource, Debug, Clone, Default)]
pub struct MutationOverlay {
    entries: HashMap<CellId, OverlayEntry>,
}

impl MutationOverlay {
    pub fn get(&self, cell: CellId) -> Option<OverlayEntry> {
        self.entries.get(&cell).copied()
    }

    pub fn set_token(&mut self, cell: CellId, value: u64) {
        self.entries.insert(cell, OverlayEntry::Token(value));
    }

    pub fn set_empty(&mut self, cell: CellId) {
        self.entries.insert(cell, OverlayEntry::Empty);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
