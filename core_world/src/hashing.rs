use std::hash::Hasher;

use crate::coords::CellId;

/// A deterministic FNV-1a 64-bit hasher.
///
/// Used to replace `DefaultHasher` (which is randomized) so that baseline
/// content derived from cell coordinates is identical across process runs.
#[derive(Debug, Default)]
pub struct FnvHasher {
    state: u64,
}

impl FnvHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= byte as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Deterministic per-cell hash stream. Streams with different salts are
/// independent for all practical purposes; the generator relies on this to
/// keep presence and value decisions uncorrelated.
pub fn cell_hash(seed: u64, salt: &str, cell: CellId) -> u64 {
    let mut hasher = FnvHasher::new();
    hasher.write(&seed.to_le_bytes());
    hasher.write(salt.as_bytes());
    hasher.write(&cell.i.to_le_bytes());
    hasher.write(&cell.j.to_le_bytes());
    hasher.finish()
}

/// Map a cell hash onto `[0, 1)` using the top 53 bits, the full precision
/// an f64 mantissa can hold.
pub fn unit_roll(seed: u64, salt: &str, cell: CellId) -> f64 {
    (cell_hash(seed, salt, cell) >> 11) as f64 / (1u64 << 53) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_hash_is_deterministic() {
        let cell = CellId::new(-42, 17);
        assert_eq!(cell_hash(1, "salt", cell), cell_hash(1, "salt", cell));
    }

    #[test]
    fn streams_differ_by_seed_salt_and_cell() {
        let cell = CellId::new(3, 4);
        assert_ne!(cell_hash(1, "a", cell), cell_hash(2, "a", cell));
        assert_ne!(cell_hash(1, "a", cell), cell_hash(1, "b", cell));
        assert_ne!(cell_hash(1, "a", cell), cell_hash(1, "a", CellId::new(4, 3)));
    }

    #[test]
    fn unit_roll_stays_in_half_open_interval() {
        for i in -50..50 {
            for j in -50..50 {
                let roll = unit_roll(99, "probe", CellId::new(i, j));
                assert!((0.0..1.0).contains(&roll), "roll {roll} out of range");
            }
        }
    }
}
