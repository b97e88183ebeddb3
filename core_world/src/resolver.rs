//! The single authority on a cell's current content.
//!
//! Every other component asks the resolver instead of re-deriving presence
//! or value itself: an overlay entry is authoritative when present, and the
//! deterministic baseline answers otherwise.

use crate::{
    config::GameConfig,
    coords::CellId,
    overlay::{MutationOverlay, OverlayEntry},
    worldgen,
};

/// Authoritative content of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellContent {
    NoCache,
    Cache(u64),
}

impl CellContent {
    pub fn has_cache(self) -> bool {
        matches!(self, CellContent::Cache(_))
    }

    pub fn value(self) -> Option<u64> {
        match self {
            CellContent::Cache(value) => Some(value),
            CellContent::NoCache => None,
        }
    }
}

pub fn resolve(config: &GameConfig, overlay: &MutationOverlay, cell: CellId) -> CellContent {
    match overlay.get(cell) {
        Some(OverlayEntry::Empty) => CellContent::NoCache,
        Some(OverlayEntry::Token(value)) => CellContent::Cache(value),
        None => match worldgen::baseline(config, cell) {
            Some(value) => CellContent::Cache(value),
            None => CellContent::NoCache,
        },
    }
}
