use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::hash::{BuildHasher, Hasher};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub tick: u64,
    pub cell_count: u32,
    pub hash: u64,
}

impl SnapshotHeader {
    pub fn new(tick: u64, cell_count: usize) -> Self {
        Self {
            tick,
            cell_count: cell_count as u32,
            hash: 0,
        }
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self {
            tick: 0,
            cell_count: 0,
            hash: 0,
        }
    }
}

/// Authoritative view of one materialized cell, ready for the presentation
/// layer. `interactable` already folds in proximity and carry authorization,
/// so clients never re-derive distance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellView {
    pub i: i64,
    pub j: i64,
    pub has_cache: bool,
    pub value: Option<u64>,
    pub interactable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CarryView {
    pub tokens: Vec<u64>,
    /// `None` means the carry bag is unbounded.
    pub capacity_slots: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct VictoryView {
    pub won: bool,
    pub achieved_value: Option<u64>,
    pub achieved_tick: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldSnapshot {
    pub header: SnapshotHeader,
    pub cells: Vec<CellView>,
    pub carry: CarryView,
    pub victory: VictoryView,
}

impl WorldSnapshot {
    pub fn finalize(mut self) -> Self {
        let hash = hash_snapshot(&self);
        let mut header = self.header;
        header.hash = hash;
        self.header = header;
        self
    }
}

pub fn hash_snapshot(snapshot: &WorldSnapshot) -> u64 {
    let mut clone = snapshot.clone();
    clone.header.hash = 0;
    let encoded = bincode::serialize(&clone).expect("snapshot serialization for hashing");
    let mut hasher = RandomState::with_seeds(0, 0, 0, 0).build_hasher();
    hasher.write(&encoded);
    hasher.finish()
}

pub fn encode_snapshot(snapshot: &WorldSnapshot) -> bincode::Result<Vec<u8>> {
    bincode::serialize(snapshot)
}

pub fn decode_snapshot(data: &[u8]) -> bincode::Result<WorldSnapshot> {
    bincode::deserialize(data)
}

pub fn encode_snapshot_json(snapshot: &WorldSnapshot) -> serde_json::Result<String> {
    serde_json::to_string(snapshot)
}

pub fn decode_snapshot_json(data: &str) -> serde_json::Result<WorldSnapshot> {
    serde_json::from_str(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> WorldSnapshot {
        WorldSnapshot {
            header: SnapshotHeader::new(7, 2),
            cells: vec![
                CellView {
                    i: -1,
                    j: 3,
                    has_cache: true,
                    value: Some(2),
                    interactable: true,
                },
                CellView {
                    i: 0,
                    j: 3,
                    has_cache: false,
                    value: None,
                    interactable: false,
                },
            ],
            carry: CarryView {
                tokens: vec![1],
                capacity_slots: Some(1),
            },
            victory: VictoryView::default(),
        }
    }

    #[test]
    fn hash_is_stable_and_ignores_stored_hash() {
        let a = sample_snapshot().finalize();
        let b = sample_snapshot().finalize();
        assert_ne!(a.header.hash, 0);
        assert_eq!(a.header.hash, b.header.hash);
        // Hashing a finalized snapshot reproduces the stored hash.
        assert_eq!(hash_snapshot(&a), a.header.hash);
    }

    #[test]
    fn hash_tracks_content_changes() {
        let base = sample_snapshot().finalize();
        let mut changed = sample_snapshot();
        changed.cells[0].value = Some(4);
        let changed = changed.finalize();
        assert_ne!(base.header.hash, changed.header.hash);
    }

    #[test]
    fn binary_encoding_round_trips() {
        let snapshot = sample_snapshot().finalize();
        let encoded = encode_snapshot(&snapshot).expect("encode");
        let decoded = decode_snapshot(&encoded).expect("decode");
        assert_eq!(snapshot, decoded);
    }
}
